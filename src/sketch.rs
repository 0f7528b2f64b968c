//! Frac-min-hash selection, the sketch set, and the per-genome builder.

use std::hash::BuildHasherDefault;

use hashbrown::HashSet;
use rustc_hash::FxHasher;
use xxhash_rust::xxh3::xxh3_64_with_seed;

use crate::bitset::{KmerBits, KMER_BITSET_WORDS};
use crate::encode::AcgtRun;
use crate::error::Error;
use crate::kmer::Kmer;
use crate::mask;
use crate::window::extract_canonical_kmers;

// Type alias for faster hashing
type FastHashSet<T> = HashSet<T, BuildHasherDefault<FxHasher>>;

/// Fractional min-hash selection: keep a k-mer iff its selection hash is
/// divisible by the denominator, an expected 1-in-denominator sample.
///
/// The selection hash is seeded xxh3 over the same fields the membership
/// hash covers, but the two families are unrelated, so acceptance cannot
/// correlate with bucket placement in the sketch set. The nonce gives
/// independent sketching passes independent hash functions.
#[derive(Clone, Copy, Debug)]
pub struct FracMinHash {
    denominator: u64,
    nonce: u64,
}

impl FracMinHash {
    pub const DEFAULT_DENOMINATOR: u64 = 200;

    pub fn new(denominator: u64, nonce: u64) -> FracMinHash {
        FracMinHash {
            denominator: denominator.max(1),
            nonce,
        }
    }

    #[inline]
    fn selection_hash(&self, kmer: &Kmer) -> u64 {
        let mut buf = [0u8; (2 * KMER_BITSET_WORDS + 1) * 8];
        let mut off = 0;
        for word in kmer.masked_bits.to_words() {
            buf[off..off + 8].copy_from_slice(&word.to_le_bytes());
            off += 8;
        }
        for word in kmer.mask.to_words() {
            buf[off..off + 8].copy_from_slice(&word.to_le_bytes());
            off += 8;
        }
        buf[off..off + 8].copy_from_slice(&(kmer.window_length as u64).to_le_bytes());
        xxh3_64_with_seed(&buf, self.nonce)
    }

    #[inline]
    pub fn accepts(&self, kmer: &Kmer) -> bool {
        self.selection_hash(kmer) % self.denominator == 0
    }
}

/// A genome sketch: the set of retained canonical masked k-mers.
///
/// Immutable once built; safe to share across threads by reference.
#[derive(Clone, Default)]
pub struct SketchSet {
    kmers: FastHashSet<Kmer>,
}

impl SketchSet {
    pub fn new() -> SketchSet {
        SketchSet::default()
    }

    /// Idempotent: a k-mer with the same masked bits and mask is a no-op.
    pub fn insert(&mut self, kmer: Kmer) -> bool {
        self.kmers.insert(kmer)
    }

    pub fn len(&self) -> usize {
        self.kmers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kmers.is_empty()
    }

    /// Number of k-mers present in both sketches. Iterates the smaller set
    /// and probes the larger.
    pub fn intersection_count(&self, other: &SketchSet) -> usize {
        if self.len() < other.len() {
            return other.intersection_count(self);
        }
        other.kmers.iter().filter(|k| self.kmers.contains(*k)).count()
    }
}

/// Sketch every run of one genome: extract canonical k-mers per run, filter
/// them through `keep`, and collect the survivors into a fresh set.
///
/// Empty input is not an error; the result is an empty sketch.
pub fn build_sketch<F>(
    runs: &[AcgtRun],
    mask_bits: &KmerBits,
    window_length: usize,
    keep: &F,
) -> Result<SketchSet, Error>
where
    F: Fn(&Kmer) -> bool,
{
    mask::check_mask_width(mask_bits, window_length)?;

    let mut sketch = SketchSet::new();
    let mut window_kmers: Vec<Kmer> = Vec::new();
    for run in runs {
        window_kmers.clear();
        extract_canonical_kmers(&mut window_kmers, run, mask_bits, window_length, keep);
        for kmer in window_kmers.drain(..) {
            sketch.insert(kmer);
        }
    }
    Ok(sketch)
}
