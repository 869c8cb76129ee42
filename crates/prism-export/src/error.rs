//! Error types for prism-export.

use std::io;
use thiserror::Error;

/// Error type for file import and export.
#[derive(Error, Debug)]
pub enum ExportError {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A sample file we cannot decode.
    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),

    /// A partial file that is not what it claims to be.
    #[error("Malformed partial file: {0}")]
    Malformed(String),

    /// A partial file from a newer format revision.
    #[error("Unsupported format version {0}")]
    UnsupportedVersion(u32),

    /// Nothing to write.
    #[error("Collection is empty")]
    EmptyCollection,

    /// The lossy bank format requires one partial per label.
    #[error("Collection is not distilled: label {label} appears on {count} partials")]
    NotDistilled { label: u32, count: usize },

    /// The lossy bank format cannot represent unlabeled partials.
    #[error("Collection has {0} unlabeled partials that the bank format cannot represent")]
    UnresolvedNoise(usize),

    /// A bank frame rate outside its domain.
    #[error("Invalid frame time: {0}")]
    InvalidFrameTime(f64),
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, ExportError>;

// Convert hound's error at the API boundary rather than leaking it.
impl From<hound::Error> for ExportError {
    fn from(e: hound::Error) -> Self {
        match e {
            hound::Error::IoError(io) => ExportError::Io(io),
            other => ExportError::UnsupportedFormat(other.to_string()),
        }
    }
}
