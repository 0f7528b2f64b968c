//! Seed masks: contiguous k-mers and random spaced seeds.
//!
//! A mask marks the informative nucleotide positions of a window by setting
//! both bits of each selected 2-bit slot. A contiguous seed selects every
//! position; a spaced seed selects a uniform random subset, leaving the rest
//! as don't-cares.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::bitset::{KmerBits, CONTIGUOUS, MAX_KMER_LENGTH, NUCLEOTIDE_BITS};
use crate::error::Error;

/// Mask with all of the low `k` nucleotide positions selected.
pub fn contiguous_mask(k: usize) -> Result<KmerBits, Error> {
    if k > MAX_KMER_LENGTH {
        return Err(Error::WindowTooLarge {
            got: k,
            max: MAX_KMER_LENGTH,
        });
    }
    Ok(CONTIGUOUS[k])
}

/// Uniform random choice of `informative` positions out of `window_size`,
/// drawn with a shuffle seeded deterministically by `seed`.
pub fn random_spaced_mask(
    window_size: usize,
    informative: usize,
    seed: u64,
) -> Result<KmerBits, Error> {
    if informative > window_size || window_size > MAX_KMER_LENGTH {
        return Err(Error::InvalidSeed {
            window_size,
            informative,
        });
    }
    let mut positions: Vec<usize> = (0..window_size).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    positions.shuffle(&mut rng);

    let mut mask = KmerBits::ZERO;
    for &pos in &positions[..informative] {
        mask.set_bit(pos * NUCLEOTIDE_BITS, true);
        mask.set_bit(pos * NUCLEOTIDE_BITS + 1, true);
    }
    Ok(mask)
}

/// Number of nucleotide positions a mask actually reads.
pub fn informative_positions(mask: &KmerBits) -> usize {
    mask.count_ones() / NUCLEOTIDE_BITS
}

/// A mask may not select bits outside the low `2 * window_length` bits.
pub fn check_mask_width(mask: &KmerBits, window_length: usize) -> Result<(), Error> {
    if window_length > MAX_KMER_LENGTH {
        return Err(Error::WindowTooLarge {
            got: window_length,
            max: MAX_KMER_LENGTH,
        });
    }
    if !(*mask & !CONTIGUOUS[window_length]).is_zero() {
        return Err(Error::MaskWidthMismatch { window_length });
    }
    Ok(())
}
