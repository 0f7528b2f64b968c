//! FASTA collaborator: files to 2-bit ACGT runs.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use log::{info, warn};
use seq_io::fasta::{Reader as FastaReader, Record};

use crate::encode::{AcgtRun, RunSplitter};
use crate::error::Error;

fn open_fasta(path: &Path) -> Result<Box<dyn Read>, Error> {
    let f = File::open(path).map_err(|e| Error::io(path, e))?;
    // Larger buffer for better I/O throughput
    let buffered = BufReader::with_capacity(512 * 1024, f);
    let r: Box<dyn Read> = if let Some(s) = path.to_str() {
        if s.ends_with(".gz") {
            Box::new(MultiGzDecoder::new(buffered))
        } else {
            Box::new(buffered)
        }
    } else {
        Box::new(buffered)
    };
    Ok(r)
}

/// Read every record of a FASTA file (plain or gzipped) into ambiguity-free
/// 2-bit runs. Sequence lines are concatenated per record, so line breaks
/// never split a run; any non-ACGT byte does.
///
/// Records whose header contains a space are dropped. This matches the
/// historical parser behavior this tool must stay comparable with; headers
/// must be pre-trimmed if those records are wanted.
pub fn read_runs(path: &Path) -> Result<Vec<AcgtRun>, Error> {
    let rdr = open_fasta(path)?;
    let mut reader = FastaReader::new(rdr);
    let mut splitter = RunSplitter::new();

    while let Some(rec) = reader.next() {
        let rec = rec.map_err(|e| Error::io(path, e))?;
        let head = rec.head();
        if head.contains(&b' ') {
            warn!(
                "{}: dropped record {:?} (header contains a space)",
                path.display(),
                String::from_utf8_lossy(head)
            );
            continue;
        }
        info!(
            "read {} from {}",
            String::from_utf8_lossy(head),
            path.display()
        );
        for line in rec.seq_lines() {
            splitter.push_bytes(line);
        }
        // Runs never span records.
        splitter.flush();
    }

    Ok(splitter.finish())
}
