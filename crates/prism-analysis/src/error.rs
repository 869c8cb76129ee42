//! Error types for prism-analysis.

use thiserror::Error;

/// Error type for analysis configuration and invocation.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// A configuration value outside its domain.
    #[error("Invalid analyzer configuration: {0}")]
    InvalidConfig(String),

    /// Sample rate must be positive and finite.
    #[error("Invalid sample rate: {0}")]
    InvalidSampleRate(f64),

    /// A fundamental search range with `low >= high` or non-positive
    /// bounds.
    #[error("Invalid fundamental range: {low}..{high} Hz")]
    InvalidRange { low: f64, high: f64 },
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, AnalysisError>;
