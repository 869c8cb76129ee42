//! Spectral analysis for the Prism sound-modeling toolkit.
//!
//! Turns a mono sample buffer into a
//! [`PartialCollection`](prism_core::PartialCollection) of unlabeled
//! sinusoidal tracks, optionally estimating a fundamental-frequency
//! envelope from the same pass for use as a channelization reference.
//!
//! The pipeline inside [`Analyzer::analyze`]: Hann-windowed short-time
//! spectra, local-maxima peak picking with parabolic interpolation above
//! a configurable floor, and nearest-frequency frame-to-frame linking
//! bounded by the configured drift.

pub mod analyzer;
pub mod config;
pub mod error;

mod fundamental;
mod spectrum;
mod tracker;

pub use analyzer::{Analysis, Analyzer};
pub use config::AnalyzerConfig;
pub use error::{AnalysisError, Result};
