//! Lockstep sliding windows over an ACGT run, emitting canonical masked
//! k-mers in position order.
//!
//! Two bitsets advance together: `fwd` holds the forward strand of the
//! current window, `rev` its reverse complement. Each step is O(1) shift and
//! bit writes on both, so the per-window reversal never runs in the hot
//! loop. Canonical selection masks each strand with the same user mask and
//! keeps the unsigned-smaller side.

use crate::bitset::{KmerBits, CONTIGUOUS, NUCLEOTIDE_BITS};
use crate::kmer::Kmer;

/// Shift the forward window left by one nucleotide and write the new code
/// into the low slot. Re-masking keeps bits above the window zero.
#[inline]
fn push_forward(fwd: &mut KmerBits, code: u8, window_prefix: &KmerBits) {
    *fwd = (*fwd << NUCLEOTIDE_BITS) & *window_prefix;
    fwd.set_bit(0, code & 0x1 != 0);
    fwd.set_bit(1, code & 0x2 != 0);
}

/// Shift the reverse-complement window right by one nucleotide and write the
/// complement code into the high slot of the window.
#[inline]
fn push_reverse(rev: &mut KmerBits, code: u8, window_length: usize) {
    let complement = code ^ 0x3;
    *rev = *rev >> NUCLEOTIDE_BITS;
    let high = window_length * NUCLEOTIDE_BITS;
    rev.set_bit(high - 2, complement & 0x1 != 0);
    rev.set_bit(high - 1, complement & 0x2 != 0);
}

/// Slide both strand windows across `run` and offer each canonical k-mer to
/// `keep`; accepted k-mers are appended to `out` in window order. Runs
/// shorter than the window emit nothing.
pub fn extract_canonical_kmers<F>(
    out: &mut Vec<Kmer>,
    run: &[u8],
    mask: &KmerBits,
    window_length: usize,
    keep: &F,
) where
    F: Fn(&Kmer) -> bool,
{
    if window_length == 0 || run.len() < window_length {
        return;
    }

    let window_prefix = CONTIGUOUS[window_length];
    let mut fwd = KmerBits::ZERO;
    let mut rev = KmerBits::ZERO;

    // Prime both windows with the first window_length - 1 codes.
    for &code in &run[..window_length - 1] {
        push_forward(&mut fwd, code, &window_prefix);
        push_reverse(&mut rev, code, window_length);
    }

    for &code in &run[window_length - 1..] {
        push_forward(&mut fwd, code, &window_prefix);
        push_reverse(&mut rev, code, window_length);

        let masked_fwd = fwd & *mask;
        let masked_rev = rev & *mask;

        // Ties keep the forward strand.
        let canonical = if masked_rev < masked_fwd {
            Kmer {
                window_length,
                bits: rev,
                mask: *mask,
                masked_bits: masked_rev,
            }
        } else {
            Kmer {
                window_length,
                bits: fwd,
                mask: *mask,
                masked_bits: masked_fwd,
            }
        };

        if keep(&canonical) {
            out.push(canonical);
        }
    }
}
