use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::time::Instant;

pub mod ani;
pub mod bitset;
pub mod driver;
pub mod encode;
pub mod error;
pub mod fasta;
pub mod kmer;
pub mod mask;
pub mod output;
pub mod sketch;
pub mod window;

pub use error::Error;

use sketch::{FracMinHash, SketchSet};

/// Estimate pairwise ANI between genome assemblies from frac-min-hash
/// sketches of canonical, optionally spaced-seed, k-mers.
#[derive(Parser, Debug)]
#[command(author, version, about, disable_version_flag = true)]
pub struct Args {
    /// Output CSV path (appended to when the file already has rows)
    #[arg(short, long)]
    pub output: PathBuf,

    /// Window length in nucleotides [w=30]
    #[arg(short, long)]
    pub window: Option<usize>,

    /// Informative positions in the seed; equal to the window gives a
    /// contiguous k-mer, fewer gives a random spaced seed [k=20]
    #[arg(short, long)]
    pub kmer: Option<usize>,

    /// Frac-min-hash denominator; 1 keeps every k-mer [c=200]
    #[arg(short = 'c', long, default_value_t = FracMinHash::DEFAULT_DENOMINATOR, hide_default_value = true)]
    pub denominator: u64,

    /// Nonce for the selection hash
    #[arg(long, default_value_t = 0, hide_default_value = true)]
    pub nonce: u64,

    /// RNG seed for spaced-mask generation
    #[arg(long, default_value_t = 0, hide_default_value = true)]
    pub seed: u64,

    /// Compare every ordered pair instead of the ring (i, i+1 mod n)
    #[arg(long)]
    pub all_pairs: bool,

    /// Number of threads [t=1]
    #[arg(short = 't', long)]
    pub threads: Option<usize>,

    /// Input FASTA files (plain or .gz)
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Display version information.
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    pub version: (),
}

pub fn run_with_args(args: Args) -> anyhow::Result<()> {
    let default_window = 30usize;
    let default_kmer = 20usize;

    let window = args.window.unwrap_or(default_window);
    anyhow::ensure!(
        (1..=bitset::MAX_KMER_LENGTH).contains(&window),
        "window ({}) must be between 1 and {}.",
        window,
        bitset::MAX_KMER_LENGTH
    );

    let kmer_size = args.kmer.unwrap_or_else(|| default_kmer.min(window));
    anyhow::ensure!(
        (1..=window).contains(&kmer_size),
        "kmer ({}) must be between 1 and the window length ({}).",
        kmer_size,
        window
    );

    anyhow::ensure!(args.denominator >= 1, "denominator must be ≥ 1");

    let num_threads = args.threads.unwrap_or(1);
    anyhow::ensure!(num_threads >= 1, "threads must be ≥ 1");

    eprintln!("aniseed v{}", env!("CARGO_PKG_VERSION"));
    eprintln!(
        "parameters: window={} kmer={} denominator={} nonce={} seed={} threads={} pairs={} inputs={} output={}",
        window,
        kmer_size,
        args.denominator,
        args.nonce,
        args.seed,
        num_threads,
        if args.all_pairs { "all" } else { "ring" },
        args.inputs.len(),
        args.output.display()
    );

    let seed_mask = if kmer_size == window {
        mask::contiguous_mask(window)?
    } else {
        mask::random_spaced_mask(window, kmer_size, args.seed)?
    };
    let informative = mask::informative_positions(&seed_mask);
    eprintln!("seed mask: {}", seed_mask);

    let predicate = FracMinHash::new(args.denominator, args.nonce);
    let keep = |k: &kmer::Kmer| predicate.accepts(k);

    let t_sketch = Instant::now();
    let sketches = driver::build_sketches(&args.inputs, &seed_mask, window, &keep, num_threads)?;
    eprintln!(
        "sketching took {:.1} ms",
        t_sketch.elapsed().as_secs_f64() * 1e3
    );

    // Ring pairing (i, i+1 mod n) by default; every ordered pair on request.
    let n = sketches.len();
    let pairs: Vec<(usize, usize)> = if args.all_pairs {
        (0..n)
            .flat_map(|i| (0..n).map(move |j| (i, j)))
            .collect()
    } else {
        (0..n).map(|i| (i, (i + 1) % n)).collect()
    };

    let left: Vec<&SketchSet> = pairs.iter().map(|&(i, _)| &sketches[i]).collect();
    let right: Vec<&SketchSet> = pairs.iter().map(|&(_, j)| &sketches[j]).collect();

    let t_compare = Instant::now();
    let intersections = driver::pairwise_intersections(&left, &right, num_threads)?;
    eprintln!(
        "comparison took {:.1} ms",
        t_compare.elapsed().as_secs_f64() * 1e3
    );

    let mut records = Vec::with_capacity(pairs.len());
    for (pair_idx, &(i, j)) in pairs.iter().enumerate() {
        let c = ani::containment(intersections[pair_idx], sketches[i].len());
        records.push(output::AniRecord {
            file_a: args.inputs[i].display().to_string(),
            file_b: args.inputs[j].display().to_string(),
            estimate: ani::binomial_estimator(c, informative),
        });
    }
    output::write_ani_csv(&args.output, &records, window, &seed_mask)?;
    eprintln!(
        "wrote {} comparisons to {}",
        records.len(),
        args.output.display()
    );

    Ok(())
}
