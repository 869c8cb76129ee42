//! Collection rendering.

use crate::error::{Result, SynthError};
use crate::noise::NoiseSource;
use crate::oscillator::render_partial;
use log::debug;
use prism_core::PartialCollection;
use rayon::prelude::*;

/// Additive bandwidth-enhanced renderer.
///
/// Every partial is rendered independently (in parallel) and the
/// contributions are summed per sample. The output is not clipped;
/// keeping the sum inside `[-1, 1]` is the caller's business.
#[derive(Debug, Clone)]
pub struct Synthesizer {
    sample_rate: f64,
}

impl Synthesizer {
    /// Create a synthesizer rendering at `sample_rate` Hz.
    pub fn new(sample_rate: f64) -> Result<Self> {
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(SynthError::InvalidSampleRate(sample_rate));
        }
        Ok(Self { sample_rate })
    }

    /// The render sample rate in Hz.
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Render a collection to a mono sample buffer spanning from time
    /// zero to the collection's span end. An empty or silent collection
    /// renders to an empty buffer.
    pub fn render(&self, collection: &PartialCollection) -> Vec<f64> {
        let Some((_, end)) = collection.span() else {
            return Vec::new();
        };
        let len = (end * self.sample_rate).floor() as usize + 1;

        let buffers: Vec<Vec<f64>> = collection
            .as_slice()
            .par_iter()
            .enumerate()
            .map(|(i, partial)| {
                let mut buf = vec![0.0; len];
                // Stable per-partial seed so renders are reproducible and
                // independent of scheduling.
                let seed = (i as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
                    ^ u64::from(partial.label());
                let mut noise = NoiseSource::new(seed);
                render_partial(partial, self.sample_rate, &mut noise, &mut buf);
                buf
            })
            .collect();

        let mut out = vec![0.0; len];
        for buf in buffers {
            for (o, s) in out.iter_mut().zip(buf) {
                *o += s;
            }
        }
        debug!(
            "rendered {} partials into {} samples at {} Hz",
            collection.len(),
            out.len(),
            self.sample_rate
        );
        out
    }
}
