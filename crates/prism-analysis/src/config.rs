//! Analyzer configuration.

use crate::error::{AnalysisError, Result};

/// Configuration for one analysis pass.
///
/// Always an explicit value handed to [`Analyzer::new`](crate::Analyzer::new),
/// never process-wide state, so two sounds can be analyzed concurrently
/// with different settings.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct AnalyzerConfig {
    /// Minimum spacing between extracted partials, in Hz. Peaks closer
    /// than this keep only the stronger one.
    pub resolution_hz: f64,
    /// Width of the analysis window's main lobe, in Hz. Governs the
    /// window length.
    pub window_width_hz: f64,
    /// Maximum frequency a partial may move between consecutive frames
    /// and still be linked, in Hz.
    pub freq_drift_hz: f64,
    /// Spectral peaks below this level (dB relative to full scale,
    /// negative) are discarded.
    pub amp_floor_db: f64,
    /// Time between consecutive analysis frames, in seconds.
    pub hop_time: f64,
}

impl AnalyzerConfig {
    /// A configuration tuned for partials no closer than
    /// `resolution_hz`, with the remaining parameters derived the usual
    /// way: window width twice the resolution, drift half of it, a
    /// -90 dB floor, and a hop of one window-width period.
    pub fn new(resolution_hz: f64) -> Self {
        Self {
            resolution_hz,
            window_width_hz: 2.0 * resolution_hz,
            freq_drift_hz: 0.5 * resolution_hz,
            amp_floor_db: -90.0,
            hop_time: 1.0 / (2.0 * resolution_hz),
        }
    }

    /// Override the analysis window's main-lobe width.
    pub fn with_window_width(mut self, hz: f64) -> Self {
        self.window_width_hz = hz;
        self
    }

    /// Override the frame-to-frame frequency drift limit.
    pub fn with_freq_drift(mut self, hz: f64) -> Self {
        self.freq_drift_hz = hz;
        self
    }

    /// Override the amplitude floor in dB (negative).
    pub fn with_amp_floor(mut self, db: f64) -> Self {
        self.amp_floor_db = db;
        self
    }

    /// Override the hop between frames, in seconds.
    pub fn with_hop_time(mut self, seconds: f64) -> Self {
        self.hop_time = seconds;
        self
    }

    /// Check every parameter's domain.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("resolution_hz", self.resolution_hz),
            ("window_width_hz", self.window_width_hz),
            ("freq_drift_hz", self.freq_drift_hz),
            ("hop_time", self.hop_time),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(AnalysisError::InvalidConfig(format!(
                    "{name} must be positive and finite, got {value}"
                )));
            }
        }
        if !self.amp_floor_db.is_finite() || self.amp_floor_db >= 0.0 {
            return Err(AnalysisError::InvalidConfig(format!(
                "amp_floor_db must be negative, got {}",
                self.amp_floor_db
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_defaults_validate() {
        assert!(AnalyzerConfig::new(300.0).validate().is_ok());
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(AnalyzerConfig::new(-1.0).validate().is_err());
        assert!(AnalyzerConfig::new(300.0)
            .with_amp_floor(3.0)
            .validate()
            .is_err());
        assert!(AnalyzerConfig::new(300.0)
            .with_hop_time(0.0)
            .validate()
            .is_err());
    }
}
