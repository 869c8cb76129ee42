//! Shared helpers for the integration tests.
#![allow(dead_code)] // each test binary uses a different subset

use prism::prelude::*;
use std::f64::consts::TAU;

/// Sample-value tolerance equal to 16-bit resolution.
pub const SAMPLE_EPSILON: f64 = 1.0 / 32768.0;

/// A steady harmonic tone: `amps[h]` scales harmonic `h + 1` of `f0`.
pub fn harmonic_tone(f0: f64, amps: &[f64], seconds: f64, sample_rate: f64) -> Vec<f64> {
    let n = (seconds * sample_rate) as usize;
    (0..n)
        .map(|i| {
            let t = i as f64 / sample_rate;
            amps.iter()
                .enumerate()
                .map(|(h, a)| a * (TAU * f0 * (h + 1) as f64 * t).sin())
                .sum()
        })
        .collect()
}

/// Build a labeled partial whose breakpoint phases are consistent with
/// its frequency trajectory, the way analyzed partials come out.
pub fn consistent_partial(
    label: u32,
    points: &[(f64, f64, f64, f64)], // (time, frequency, amplitude, bandwidth)
    start_phase: f64,
) -> Partial {
    let mut partial = Partial::with_label(label);
    let mut phase = start_phase;
    let mut prev: Option<(f64, f64)> = None;
    for &(time, frequency, amplitude, bandwidth) in points {
        if let Some((t0, f0)) = prev {
            phase += TAU * 0.5 * (f0 + frequency) * (time - t0);
        }
        partial.insert(Breakpoint::new(time, frequency, amplitude, bandwidth, phase));
        prev = Some((time, frequency));
    }
    partial
}

/// Unweighted mean of a partial's breakpoint frequencies.
pub fn mean_frequency(partial: &Partial) -> f64 {
    let sum: f64 = partial.points().iter().map(|bp| bp.frequency).sum();
    sum / partial.len() as f64
}

/// Analyze, channelize against the estimated fundamental, and distill
/// one tone.
pub fn analyze_to_distilled(
    samples: &[f64],
    sample_rate: f64,
    resolution_hz: f64,
    fundamental_range: (f64, f64),
) -> PartialCollection {
    let analyzer = Analyzer::new(AnalyzerConfig::new(resolution_hz))
        .expect("valid config")
        .estimate_fundamental(fundamental_range.0, fundamental_range.1)
        .expect("valid range");
    let (mut partials, fundamental) = analyzer
        .analyze(samples, sample_rate)
        .expect("analysis succeeds")
        .into_parts();
    let fundamental = fundamental.expect("fundamental requested");
    channelize(&mut partials, &fundamental, 1).expect("channelization succeeds");
    distill(&mut partials).expect("distillation succeeds");
    partials
}

/// The distilled partial carrying `label`, if any.
pub fn labeled<'a>(collection: &'a PartialCollection, label: u32) -> Option<&'a Partial> {
    collection.iter().find(|p| p.label() == label)
}
