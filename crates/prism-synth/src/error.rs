//! Error types for prism-synth.

use thiserror::Error;

/// Error type for synthesis.
#[derive(Error, Debug)]
pub enum SynthError {
    /// Sample rate must be positive and finite.
    #[error("Invalid sample rate: {0}")]
    InvalidSampleRate(f64),
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, SynthError>;
