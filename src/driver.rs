//! File-level parallel sketch building and pairwise intersections.
//!
//! Both operations fan out over a local work-stealing pool and return
//! results in input order. Sketches are immutable after construction and
//! shared by reference; nothing is cloned per task. With one thread the
//! pool is skipped entirely.

use std::path::PathBuf;

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;

use crate::bitset::KmerBits;
use crate::error::Error;
use crate::fasta;
use crate::kmer::Kmer;
use crate::sketch::{build_sketch, SketchSet};

fn sketch_one_file<F>(
    path: &PathBuf,
    mask: &KmerBits,
    window_length: usize,
    keep: &F,
) -> Result<SketchSet, Error>
where
    F: Fn(&Kmer) -> bool,
{
    let runs = fasta::read_runs(path)?;
    let sketch = build_sketch(&runs, mask, window_length, keep)?;
    log::info!(
        "{}: {} runs, {} k-mers retained",
        path.display(),
        runs.len(),
        sketch.len()
    );
    Ok(sketch)
}

fn build_pool(num_threads: usize) -> rayon::ThreadPool {
    ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build()
        .expect("Failed to build local Rayon thread pool")
}

/// Build one sketch per input path, in input order.
///
/// All files are processed even when one of them fails; the error reported
/// is the first by input index.
pub fn build_sketches<F>(
    paths: &[PathBuf],
    mask: &KmerBits,
    window_length: usize,
    keep: &F,
    num_threads: usize,
) -> Result<Vec<SketchSet>, Error>
where
    F: Fn(&Kmer) -> bool + Sync,
{
    let results: Vec<Result<SketchSet, Error>> = if num_threads <= 1 {
        paths
            .iter()
            .map(|path| sketch_one_file(path, mask, window_length, keep))
            .collect()
    } else {
        let pool = build_pool(num_threads);
        pool.install(|| {
            paths
                .par_iter()
                .map(|path| sketch_one_file(path, mask, window_length, keep))
                .collect()
        })
    };

    let mut sketches = Vec::with_capacity(results.len());
    for result in results {
        sketches.push(result?);
    }
    Ok(sketches)
}

/// Elementwise intersection counts between two equal-length sketch lists.
pub fn pairwise_intersections(
    a: &[&SketchSet],
    b: &[&SketchSet],
    num_threads: usize,
) -> Result<Vec<usize>, Error> {
    if a.len() != b.len() {
        return Err(Error::LengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }

    if num_threads <= 1 {
        return Ok(a
            .iter()
            .zip(b.iter())
            .map(|(x, y)| x.intersection_count(y))
            .collect());
    }

    let pool = build_pool(num_threads);
    Ok(pool.install(|| {
        a.par_iter()
            .zip(b.par_iter())
            .map(|(x, y)| x.intersection_count(y))
            .collect()
    }))
}
