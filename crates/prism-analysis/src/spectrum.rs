//! Windowed spectra and peak extraction for one analysis frame.

use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

/// One spectral peak: an instantaneous sinusoid estimate.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Peak {
    pub frequency: f64,
    pub amplitude: f64,
    pub phase: f64,
}

/// Computes magnitude/phase spectra of Hann-windowed frames and extracts
/// interpolated peaks.
pub(crate) struct SpectrumAnalyzer {
    fft: Arc<dyn Fft<f64>>,
    window: Vec<f64>,
    window_gain: f64,
    fft_len: usize,
    sample_rate: f64,
    scratch: Vec<Complex<f64>>,
}

impl SpectrumAnalyzer {
    pub fn new(window_len: usize, sample_rate: f64) -> Self {
        // Zero-padding doubles bin density before the parabolic fit.
        let fft_len = (window_len * 2).next_power_of_two();
        let fft = FftPlanner::new().plan_fft_forward(fft_len);
        let window: Vec<f64> = (0..window_len)
            .map(|i| {
                let x = i as f64 / (window_len - 1) as f64;
                0.5 - 0.5 * (std::f64::consts::TAU * x).cos()
            })
            .collect();
        let window_gain = window.iter().sum::<f64>();
        let scratch = vec![Complex::default(); fft.get_inplace_scratch_len()];
        Self {
            fft,
            window,
            window_gain,
            fft_len,
            sample_rate,
            scratch,
        }
    }

    pub fn window_len(&self) -> usize {
        self.window.len()
    }

    /// Extract peaks from one frame. `frame` must hold `window_len`
    /// samples; phases are referenced to the window center.
    pub fn peaks(&mut self, frame: &[f64], floor: f64, min_separation_hz: f64) -> Vec<Peak> {
        debug_assert_eq!(frame.len(), self.window.len());
        let mut buf = vec![Complex::default(); self.fft_len];
        // Rotate the windowed frame so its center lands at index 0; the
        // measured phase is then the phase at the frame's time stamp.
        let center = self.window.len() / 2;
        for (i, (&x, &w)) in frame.iter().zip(&self.window).enumerate() {
            let dst = (self.fft_len + i - center) % self.fft_len;
            buf[dst] = Complex::new(x * w, 0.0);
        }
        self.fft.process_with_scratch(&mut buf, &mut self.scratch);

        let half = self.fft_len / 2;
        let bin_hz = self.sample_rate / self.fft_len as f64;
        let mag: Vec<f64> = buf[..=half].iter().map(|c| c.norm()).collect();
        let scale = 2.0 / self.window_gain;

        let mut found: Vec<Peak> = Vec::new();
        for k in 1..half {
            if mag[k] <= mag[k - 1] || mag[k] < mag[k + 1] {
                continue;
            }
            let amp = mag[k] * scale;
            if amp < floor {
                continue;
            }
            // Parabolic fit on log magnitude for sub-bin frequency and a
            // refined amplitude.
            let (l, c, r) = (
                mag[k - 1].max(f64::MIN_POSITIVE).ln(),
                mag[k].max(f64::MIN_POSITIVE).ln(),
                mag[k + 1].max(f64::MIN_POSITIVE).ln(),
            );
            let denom = l - 2.0 * c + r;
            let delta = if denom.abs() < 1e-12 {
                0.0
            } else {
                (0.5 * (l - r) / denom).clamp(-0.5, 0.5)
            };
            let frequency = (k as f64 + delta) * bin_hz;
            let amplitude = (c - 0.25 * (l - r) * delta).exp() * scale;
            let phase = buf[k].arg();
            found.push(Peak {
                frequency,
                amplitude,
                phase,
            });
        }

        // Enforce the resolution: strongest peaks claim their
        // neighborhood first.
        found.sort_by(|a, b| b.amplitude.total_cmp(&a.amplitude));
        let mut selected: Vec<Peak> = Vec::new();
        for peak in found {
            if selected
                .iter()
                .all(|s| (s.frequency - peak.frequency).abs() >= min_separation_hz)
            {
                selected.push(peak);
            }
        }
        selected.sort_by(|a, b| a.frequency.total_cmp(&b.frequency));
        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn finds_a_pure_tone_with_accurate_parameters() {
        let fs = 44100.0;
        let mut sa = SpectrumAnalyzer::new(1024, fs);
        let f0 = 441.0;
        let amp = 0.5;
        let frame: Vec<f64> = (0..1024)
            .map(|i| amp * (std::f64::consts::TAU * f0 * i as f64 / fs).cos())
            .collect();
        let peaks = sa.peaks(&frame, 1e-3, 100.0);
        assert_eq!(peaks.len(), 1);
        assert_relative_eq!(peaks[0].frequency, f0, epsilon = 2.0);
        assert_relative_eq!(peaks[0].amplitude, amp, epsilon = 0.05);
    }

    #[test]
    fn resolution_drops_the_weaker_of_close_peaks() {
        let fs = 8000.0;
        let mut sa = SpectrumAnalyzer::new(512, fs);
        let frame: Vec<f64> = (0..512)
            .map(|i| {
                let t = i as f64 / fs;
                0.5 * (std::f64::consts::TAU * 400.0 * t).cos()
                    + 0.1 * (std::f64::consts::TAU * 430.0 * t).cos()
            })
            .collect();
        let peaks = sa.peaks(&frame, 1e-3, 120.0);
        assert_eq!(peaks.len(), 1);
        assert_relative_eq!(peaks[0].frequency, 400.0, epsilon = 10.0);
    }

    #[test]
    fn floor_discards_quiet_peaks() {
        let fs = 8000.0;
        let mut sa = SpectrumAnalyzer::new(512, fs);
        let frame: Vec<f64> = (0..512)
            .map(|i| 1e-4 * (std::f64::consts::TAU * 400.0 * i as f64 / fs).cos())
            .collect();
        assert!(sa.peaks(&frame, 1e-2, 50.0).is_empty());
    }
}
