//! The k-mer value type: raw window bits, the mask applied to them, and the
//! masked result.

use std::hash::{Hash, Hasher};

use crate::bitset::{KmerBits, KMER_BITSET_SIZE, NUCLEOTIDE_BITS};

/// One masked window. `masked_bits` is always `bits & mask`; equality and
/// hashing ignore the raw bits, which only record which strand was kept.
#[derive(Clone, Copy, Debug)]
pub struct Kmer {
    pub window_length: usize,
    pub bits: KmerBits,
    pub mask: KmerBits,
    pub masked_bits: KmerBits,
}

impl Kmer {
    pub fn new(window_length: usize, bits: KmerBits, mask: KmerBits) -> Kmer {
        Kmer {
            window_length,
            bits,
            mask,
            masked_bits: bits & mask,
        }
    }

    /// Reverse complement by full bitset reversal, complementation, and
    /// realignment to the window. The sliding extractor never calls this;
    /// it tracks the complement strand incrementally instead.
    pub fn reverse_complement(&self) -> Kmer {
        let realign = KMER_BITSET_SIZE - self.window_length * NUCLEOTIDE_BITS;
        let rc_bits = (!self.bits.reverse()) >> realign;
        Kmer::new(self.window_length, rc_bits, self.mask)
    }

    /// The strand whose masked value is smaller; ties keep the forward one.
    pub fn canonical(&self) -> Kmer {
        let rc = self.reverse_complement();
        if rc.masked_bits < self.masked_bits {
            rc
        } else {
            *self
        }
    }
}

impl PartialEq for Kmer {
    fn eq(&self, other: &Kmer) -> bool {
        self.masked_bits == other.masked_bits && self.mask == other.mask
    }
}

impl Eq for Kmer {}

impl Hash for Kmer {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.masked_bits.hash(state);
        self.mask.hash(state);
        self.window_length.hash(state);
    }
}
