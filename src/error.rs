//! Structured error kinds surfaced by the sketching core.

use std::fmt::Display;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The requested window does not fit in the compiled bitset width.
    #[error("window length {got} exceeds the maximum supported length {max}")]
    WindowTooLarge { got: usize, max: usize },

    #[error("seed mask selects bits outside a window of {window_length} nucleotides")]
    MaskWidthMismatch { window_length: usize },

    #[error("cannot pick {informative} informative positions from a window of {window_size}")]
    InvalidSeed {
        window_size: usize,
        informative: usize,
    },

    #[error("pairwise intersection over lists of unequal length ({left} vs {right})")]
    LengthMismatch { left: usize, right: usize },

    #[error("failed to read {path:?}: {message}")]
    Io { path: PathBuf, message: String },
}

impl Error {
    pub(crate) fn io(path: &Path, cause: impl Display) -> Self {
        Error::Io {
            path: path.to_path_buf(),
            message: cause.to_string(),
        }
    }
}
