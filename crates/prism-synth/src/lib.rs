//! Bandwidth-enhanced additive synthesis for the Prism sound-modeling
//! toolkit.
//!
//! Renders a [`PartialCollection`](prism_core::PartialCollection) to a
//! mono sample buffer. Each partial contributes a sinusoid at its
//! deterministic phase, scaled by `amp * sqrt(1 - bw)`, plus a
//! carrier-modulated narrowband noise component scaled by
//! `amp * sqrt(bw)`, so the noise carries exactly the bandwidth share of
//! the partial's energy: one track smoothly spans pure tone to pitched
//! noise.

pub mod error;
pub mod render;

mod noise;
mod oscillator;

pub use error::{Result, SynthError};
pub use render::Synthesizer;
