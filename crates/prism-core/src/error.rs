//! Error types for prism-core.

use thiserror::Error;

/// Error type for model construction and validation.
#[derive(Error, Debug)]
pub enum Error {
    /// An envelope was built from malformed control points.
    #[error("Invalid envelope: {0}")]
    InvalidEnvelope(String),

    /// A time map was built from malformed anchor pairs.
    #[error("Invalid time map: {0}")]
    InvalidTimeMap(String),

    /// A breakpoint carried a non-finite or out-of-domain parameter.
    #[error("Invalid breakpoint at t={time}: {reason}")]
    InvalidBreakpoint { time: f64, reason: String },
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;
