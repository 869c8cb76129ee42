//! Core data model for the Prism sound-modeling toolkit.
//!
//! A sound is represented as a collection of *partials*: sparse,
//! independently evolving sinusoidal-plus-noise tracks sampled at
//! *breakpoints*. This crate defines those value types plus the
//! time-varying control functions ([`Envelope`]) and monotone time warps
//! ([`TimeMap`]) that the transformation stages consume.
//!
//! The transformation algorithms themselves live in `prism-transform`;
//! analysis and synthesis live in `prism-analysis` and `prism-synth`.

pub mod breakpoint;
pub mod collection;
pub mod envelope;
pub mod error;
pub mod partial;
pub mod timemap;

pub use breakpoint::{wrap_phase, Breakpoint};
pub use collection::PartialCollection;
pub use envelope::Envelope;
pub use error::{Error, Result};
pub use partial::Partial;
pub use timemap::TimeMap;
