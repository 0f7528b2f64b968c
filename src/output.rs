//! CSV emission for pairwise ANI estimates.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::bitset::KmerBits;

pub struct AniRecord {
    pub file_a: String,
    pub file_b: String,
    pub estimate: f64,
}

/// Append pairwise estimates to `path`. The header is written only when the
/// file is new or empty, so successive runs can accumulate into one table.
/// The mask column is the full bitset, most significant bit first.
pub fn write_ani_csv(
    path: &Path,
    records: &[AniRecord],
    window_length: usize,
    mask: &KmerBits,
) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open {:?}", path))?;
    let needs_header = file
        .metadata()
        .with_context(|| format!("stat {:?}", path))?
        .len()
        == 0;

    let mut w = BufWriter::new(file);
    if needs_header {
        writeln!(w, "file_a,file_b,ani_estimate,window_size,mask")?;
    }
    for rec in records {
        writeln!(
            w,
            "{},{},{:.6},{},{}",
            rec.file_a, rec.file_b, rec.estimate, window_length, mask
        )?;
    }
    w.flush()?;
    Ok(())
}
