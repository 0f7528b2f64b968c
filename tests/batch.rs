use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use aniseed::bitset::KMER_BITSET_SIZE;
use aniseed::driver::{build_sketches, pairwise_intersections};
use aniseed::error::Error;
use aniseed::fasta::read_runs;
use aniseed::kmer::Kmer;
use aniseed::mask;
use aniseed::sketch::{build_sketch, FracMinHash, SketchSet};
use aniseed::{run_with_args, Args};

fn keep_all(_: &Kmer) -> bool {
    true
}

fn test_dir(name: &str) -> PathBuf {
    let dir = Path::new("target").join("aniseed_tests").join(name);
    fs::create_dir_all(&dir).expect("Failed to create test dir");
    dir
}

fn write_fasta(path: &Path, records: &[(&str, &str)]) {
    let mut f = File::create(path).expect("Failed to create FASTA file");
    for (head, seq) in records {
        writeln!(f, ">{}", head).unwrap();
        for chunk in seq.as_bytes().chunks(60) {
            f.write_all(chunk).unwrap();
            f.write_all(b"\n").unwrap();
        }
    }
}

fn random_sequence(len: usize, seed: u64) -> String {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len)
        .map(|_| ['A', 'C', 'G', 'T'][rng.gen_range(0..4)])
        .collect()
}

fn make_args(output: &Path, inputs: Vec<PathBuf>, all_pairs: bool) -> Args {
    Args {
        output: output.to_path_buf(),
        window: Some(4),
        kmer: Some(4),
        denominator: 1,
        nonce: 0,
        seed: 0,
        all_pairs,
        threads: None,
        inputs,
        version: (),
    }
}

#[test]
fn identical_files_build_identical_sketches() {
    let dir = test_dir("identical");
    let seq = random_sequence(500, 5);
    let mut paths = Vec::new();
    for i in 0..8 {
        let p = dir.join(format!("genome_{}.fa", i));
        write_fasta(&p, &[("genome", &seq)]);
        paths.push(p);
    }

    let cmask = mask::contiguous_mask(21).unwrap();
    let parallel = build_sketches(&paths, &cmask, 21, &keep_all, 4).unwrap();
    let serial = build_sketches(&paths, &cmask, 21, &keep_all, 1).unwrap();

    assert_eq!(parallel.len(), 8);
    let expected = parallel[0].len();
    assert!(expected > 0);
    for sketch in &parallel {
        assert_eq!(sketch.len(), expected);
    }
    for (p, s) in parallel.iter().zip(serial.iter()) {
        assert_eq!(p.len(), s.len());
    }

    let left: Vec<&SketchSet> = parallel.iter().collect();
    let right: Vec<&SketchSet> = (0..8).map(|i| &parallel[(i + 1) % 8]).collect();
    let with_pool = pairwise_intersections(&left, &right, 4).unwrap();
    let without_pool = pairwise_intersections(&left, &right, 1).unwrap();
    assert_eq!(with_pool, without_pool);
    for &count in &with_pool {
        assert_eq!(count, expected);
    }
}

#[test]
fn selection_is_thread_count_invariant() {
    let dir = test_dir("threads");
    let mut paths = Vec::new();
    for i in 0..3 {
        let p = dir.join(format!("genome_{}.fa", i));
        write_fasta(&p, &[("genome", &random_sequence(3000, 100 + i))]);
        paths.push(p);
    }

    let cmask = mask::contiguous_mask(21).unwrap();
    let predicate = FracMinHash::new(50, 5);
    let keep = |k: &Kmer| predicate.accepts(k);

    let serial = build_sketches(&paths, &cmask, 21, &keep, 1).unwrap();
    let parallel = build_sketches(&paths, &cmask, 21, &keep, 4).unwrap();
    for (a, b) in serial.iter().zip(parallel.iter()) {
        assert!(a.len() > 0);
        assert_eq!(a.len(), b.len());
        assert_eq!(a.intersection_count(b), a.len());
    }
}

#[test]
fn sketches_come_back_in_input_order() {
    let dir = test_dir("order");
    let small = dir.join("small.fa");
    let large = dir.join("large.fa");
    write_fasta(&small, &[("small", "ACGT")]);
    write_fasta(&large, &[("large", "ACGTACGT")]);

    let cmask = mask::contiguous_mask(4).unwrap();
    let sketches = build_sketches(
        &[small.clone(), large.clone()],
        &cmask,
        4,
        &keep_all,
        2,
    )
    .unwrap();
    assert_eq!(sketches[0].len(), 1);
    assert_eq!(sketches[1].len(), 3);

    let flipped = build_sketches(&[large, small], &cmask, 4, &keep_all, 2).unwrap();
    assert_eq!(flipped[0].len(), 3);
    assert_eq!(flipped[1].len(), 1);
}

#[test]
fn unequal_pair_lists_are_rejected() {
    let sketch = SketchSet::new();
    let result = pairwise_intersections(&[&sketch], &[], 1);
    assert!(matches!(
        result,
        Err(Error::LengthMismatch { left: 1, right: 0 })
    ));
}

#[test]
fn missing_files_surface_as_io_errors() {
    let dir = test_dir("missing");
    let present = dir.join("present.fa");
    write_fasta(&present, &[("genome", "ACGTACGT")]);
    let absent = dir.join("absent.fa");

    let cmask = mask::contiguous_mask(4).unwrap();
    for threads in [1, 2] {
        let result = build_sketches(
            &[present.clone(), absent.clone()],
            &cmask,
            4,
            &keep_all,
            threads,
        );
        match result {
            Err(Error::Io { path, .. }) => assert_eq!(path, absent),
            other => panic!("expected Io error, got {:?}", other.map(|v| v.len())),
        }
    }
}

#[test]
fn records_with_space_headers_are_dropped() {
    let dir = test_dir("headers");
    let seq_kept = random_sequence(200, 71);
    let seq_dropped = random_sequence(200, 72);

    let mixed = dir.join("mixed.fa");
    write_fasta(
        &mixed,
        &[("kept", &seq_kept), ("dropped record", &seq_dropped)],
    );
    let clean = dir.join("clean.fa");
    write_fasta(&clean, &[("kept", &seq_kept)]);

    let cmask = mask::contiguous_mask(15).unwrap();
    let sketches = build_sketches(&[mixed, clean], &cmask, 15, &keep_all, 1).unwrap();
    assert!(sketches[0].len() > 0);
    assert_eq!(sketches[0].len(), sketches[1].len());
    assert_eq!(
        sketches[0].intersection_count(&sketches[1]),
        sketches[0].len()
    );

    let only_dropped = dir.join("only_dropped.fa");
    write_fasta(&only_dropped, &[("lonely record", &seq_dropped)]);
    let runs = read_runs(&only_dropped).unwrap();
    assert!(runs.is_empty());
    let empty = build_sketch(&runs, &cmask, 15, &keep_all).unwrap();
    assert_eq!(empty.len(), 0);
}

#[test]
fn line_wrapping_does_not_split_runs() {
    let dir = test_dir("wrapping");
    let seq = random_sequence(300, 81);

    let wrapped = dir.join("wrapped.fa");
    write_fasta(&wrapped, &[("genome", &seq)]);

    let single = dir.join("single.fa");
    let mut f = File::create(&single).unwrap();
    writeln!(f, ">genome").unwrap();
    writeln!(f, "{}", seq).unwrap();
    drop(f);

    let runs_wrapped = read_runs(&wrapped).unwrap();
    let runs_single = read_runs(&single).unwrap();
    assert_eq!(runs_wrapped.len(), 1);
    assert_eq!(runs_wrapped, runs_single);
}

#[test]
fn ambiguous_bases_split_runs() {
    let dir = test_dir("ambiguous");
    let split = dir.join("split.fa");
    write_fasta(&split, &[("genome", "ACGTNACGT")]);

    let runs = read_runs(&split).unwrap();
    assert_eq!(runs, vec![vec![0u8, 1, 2, 3], vec![0u8, 1, 2, 3]]);

    let cmask = mask::contiguous_mask(4).unwrap();
    let sketch = build_sketch(&runs, &cmask, 4, &keep_all).unwrap();
    assert_eq!(sketch.len(), 1);
}

#[test]
fn gzip_input_matches_plain() {
    let dir = test_dir("gzip");
    let seq = random_sequence(400, 91);

    let plain = dir.join("genome.fa");
    write_fasta(&plain, &[("genome", &seq)]);

    let gzipped = dir.join("genome.fa.gz");
    let raw = fs::read(&plain).unwrap();
    let mut encoder = GzEncoder::new(File::create(&gzipped).unwrap(), Compression::default());
    encoder.write_all(&raw).unwrap();
    encoder.finish().unwrap();

    let cmask = mask::contiguous_mask(17).unwrap();
    let sketches = build_sketches(&[plain, gzipped], &cmask, 17, &keep_all, 1).unwrap();
    assert!(sketches[0].len() > 0);
    assert_eq!(sketches[0].len(), sketches[1].len());
    assert_eq!(
        sketches[0].intersection_count(&sketches[1]),
        sketches[0].len()
    );
}

#[test]
fn end_to_end_csv_run_and_append() {
    let dir = test_dir("csv_run");
    let seq = random_sequence(300, 9);
    let a = dir.join("a.fa");
    let b = dir.join("b.fa");
    write_fasta(&a, &[("genome", &seq)]);
    write_fasta(&b, &[("genome", &seq)]);

    let out = dir.join("ani.csv");
    let _ = fs::remove_file(&out);

    run_with_args(make_args(&out, vec![a.clone(), b.clone()], false))
        .expect("Failed to run the aniseed pipeline");

    let mask_column = format!("{}{}", "0".repeat(KMER_BITSET_SIZE - 8), "1".repeat(8));
    let row = |x: &Path, y: &Path| {
        format!("{},{},1.000000,4,{}", x.display(), y.display(), mask_column)
    };
    let expected = format!(
        "file_a,file_b,ani_estimate,window_size,mask\n{}\n{}\n",
        row(&a, &b),
        row(&b, &a)
    );
    let content = fs::read_to_string(&out).unwrap();
    assert_eq!(content, expected);

    // Appending keeps a single header and adds the new rows.
    run_with_args(make_args(&out, vec![a, b], false)).unwrap();
    let appended = fs::read_to_string(&out).unwrap();
    assert_eq!(appended.matches("file_a,file_b").count(), 1);
    assert_eq!(appended.lines().count(), 5);
}

#[test]
fn all_pairs_compares_every_ordered_pair() {
    let dir = test_dir("all_pairs");
    let seq = random_sequence(300, 13);
    let mut inputs = Vec::new();
    for i in 0..3 {
        let p = dir.join(format!("genome_{}.fa", i));
        write_fasta(&p, &[("genome", &seq)]);
        inputs.push(p);
    }

    let out = dir.join("ani.csv");
    let _ = fs::remove_file(&out);
    run_with_args(make_args(&out, inputs, true)).unwrap();

    let content = fs::read_to_string(&out).unwrap();
    let mut lines = content.lines();
    assert_eq!(
        lines.next().unwrap(),
        "file_a,file_b,ani_estimate,window_size,mask"
    );
    let rows: Vec<&str> = lines.collect();
    assert_eq!(rows.len(), 9);
    for row in rows {
        assert!(row.contains(",1.000000,4,"));
    }
}
