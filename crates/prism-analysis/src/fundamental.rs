//! Fundamental-frequency estimation alongside partial tracking.

use crate::spectrum::Peak;
use prism_core::Envelope;

/// Builds a fundamental-frequency envelope from per-frame peak sets: the
/// amplitude-dominant peak inside the configured range is taken as the
/// frame's fundamental estimate. Frames with no in-range peak contribute
/// nothing, which leaves the envelope flat across silences.
pub(crate) struct FundamentalTracker {
    low_hz: f64,
    high_hz: f64,
    envelope: Envelope,
}

impl FundamentalTracker {
    pub fn new(low_hz: f64, high_hz: f64) -> Self {
        Self {
            low_hz,
            high_hz,
            envelope: Envelope::new(),
        }
    }

    pub fn step(&mut self, time: f64, peaks: &[Peak]) {
        let dominant = peaks
            .iter()
            .filter(|p| p.frequency >= self.low_hz && p.frequency <= self.high_hz)
            .max_by(|a, b| a.amplitude.total_cmp(&b.amplitude));
        if let Some(peak) = dominant {
            self.envelope.insert(time, peak.frequency);
        }
    }

    pub fn finish(self) -> Envelope {
        self.envelope
    }
}
