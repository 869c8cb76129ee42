//! The analyzer: samples in, unlabeled partials and a fundamental
//! estimate out.

use crate::config::AnalyzerConfig;
use crate::error::{AnalysisError, Result};
use crate::fundamental::FundamentalTracker;
use crate::spectrum::SpectrumAnalyzer;
use crate::tracker::Tracker;
use log::debug;
use prism_core::{Envelope, PartialCollection};

/// The result of one analysis pass: every partial carries label 0 and is
/// ready for channelization.
#[derive(Debug, Clone)]
pub struct Analysis {
    partials: PartialCollection,
    fundamental: Option<Envelope>,
}

impl Analysis {
    /// The extracted partials.
    pub fn partials(&self) -> &PartialCollection {
        &self.partials
    }

    /// Consume the analysis, yielding the partials.
    pub fn into_partials(self) -> PartialCollection {
        self.partials
    }

    /// The fundamental-frequency estimate, when one was requested.
    pub fn fundamental(&self) -> Option<&Envelope> {
        self.fundamental.as_ref()
    }

    /// Split into partials and fundamental estimate.
    pub fn into_parts(self) -> (PartialCollection, Option<Envelope>) {
        (self.partials, self.fundamental)
    }
}

/// Reassigned-model spectral analyzer: short-time spectra, interpolated
/// peaks, frame-to-frame linking.
///
/// # Example
///
/// ```
/// use prism_analysis::{Analyzer, AnalyzerConfig};
///
/// let samples: Vec<f64> = (0..44100)
///     .map(|i| (std::f64::consts::TAU * 440.0 * i as f64 / 44100.0).sin())
///     .collect();
/// let analyzer = Analyzer::new(AnalyzerConfig::new(350.0))
///     .unwrap()
///     .estimate_fundamental(300.0, 600.0)
///     .unwrap();
/// let analysis = analyzer.analyze(&samples, 44100.0).unwrap();
/// assert!(!analysis.partials().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct Analyzer {
    config: AnalyzerConfig,
    fundamental_range: Option<(f64, f64)>,
}

impl Analyzer {
    /// Create an analyzer from a validated configuration.
    pub fn new(config: AnalyzerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            fundamental_range: None,
        })
    }

    /// Also build a fundamental-frequency envelope from the analysis
    /// pass, searching `low_hz..high_hz`.
    pub fn estimate_fundamental(mut self, low_hz: f64, high_hz: f64) -> Result<Self> {
        if !(low_hz.is_finite() && high_hz.is_finite()) || low_hz <= 0.0 || high_hz <= low_hz {
            return Err(AnalysisError::InvalidRange {
                low: low_hz,
                high: high_hz,
            });
        }
        self.fundamental_range = Some((low_hz, high_hz));
        Ok(self)
    }

    /// The configuration in effect.
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyze a mono sample buffer into unlabeled partials.
    pub fn analyze(&self, samples: &[f64], sample_rate: f64) -> Result<Analysis> {
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(AnalysisError::InvalidSampleRate(sample_rate));
        }

        // Hann main lobe spans four bins, so the window length follows
        // from the requested main-lobe width.
        let window_len = ((4.0 * sample_rate / self.config.window_width_hz).round() as usize)
            .max(8);
        let hop = ((self.config.hop_time * sample_rate).round() as usize).max(1);
        let floor = 10f64.powf(self.config.amp_floor_db / 20.0);

        let mut spectra = SpectrumAnalyzer::new(window_len, sample_rate);
        let mut tracker = Tracker::new(self.config.freq_drift_hz);
        let mut fundamental = self
            .fundamental_range
            .map(|(lo, hi)| FundamentalTracker::new(lo, hi));

        let mut frames = 0usize;
        let mut start = 0usize;
        while start + window_len <= samples.len() {
            let frame = &samples[start..start + window_len];
            let time = (start + window_len / 2) as f64 / sample_rate;
            let peaks = spectra.peaks(frame, floor, self.config.resolution_hz);
            if let Some(ft) = fundamental.as_mut() {
                ft.step(time, &peaks);
            }
            tracker.step(time, &peaks);
            frames += 1;
            start += hop;
        }

        let partials: PartialCollection = tracker.finish().into_iter().collect();
        debug!(
            "analyzed {} samples in {} frames into {} partials",
            samples.len(),
            frames,
            partials.len()
        );
        Ok(Analysis {
            partials,
            fundamental: fundamental.map(FundamentalTracker::finish),
        })
    }
}
