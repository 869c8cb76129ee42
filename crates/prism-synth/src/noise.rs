//! Deterministic filtered noise for bandwidth enhancement.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// One-pole smoothing coefficient for the noise modulator. Higher values
/// narrow the noise band around the carrier.
const POLE: f64 = 0.9;

/// Low-pass-filtered white noise with unit average power.
///
/// Seeded explicitly so renders are reproducible: the same collection at
/// the same sample rate produces the same samples every time.
pub(crate) struct NoiseSource {
    rng: Pcg32,
    state: f64,
    gain: f64,
}

impl NoiseSource {
    pub fn new(seed: u64) -> Self {
        // Uniform white noise on [-1, 1) has power 1/3; the one-pole
        // filter passes (1 - a) / (1 + a) of it. The gain restores unit
        // power so the caller's sqrt(bandwidth) scaling is exact.
        let filtered_power = (1.0 - POLE) / (1.0 + POLE) / 3.0;
        Self {
            rng: Pcg32::seed_from_u64(seed),
            state: 0.0,
            gain: 1.0 / filtered_power.sqrt(),
        }
    }

    pub fn next(&mut self) -> f64 {
        let white: f64 = self.rng.gen_range(-1.0..1.0);
        self.state = POLE * self.state + (1.0 - POLE) * white;
        self.state * self.gain
    }
}
