//! Error types for prism-transform.

use thiserror::Error;

/// Error type for transformation stages.
#[derive(Error, Debug)]
pub enum TransformError {
    /// An operation that requires partials received an empty collection.
    #[error("Collection is empty")]
    EmptyCollection,

    /// Label 0 marks unlabeled partials and cannot be a reference label.
    #[error("Reference label 0 is reserved for unlabeled partials")]
    ReservedLabel,

    /// A reference envelope unusable for channelization.
    #[error("Invalid reference envelope: {0}")]
    InvalidReference(String),

    /// A morph input was not distilled first.
    #[error("Collection is not distilled: label {label} appears on {count} partials")]
    NotDistilled { label: u32, count: usize },

    /// A timing parameter (fade, gap) outside its domain.
    #[error("Invalid timing parameter: {0}")]
    InvalidTiming(String),

    /// A crop window with a non-positive or non-finite extent.
    #[error("Invalid crop range: {start}..{end}")]
    InvalidRange { start: f64, end: f64 },
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, TransformError>;
