//! Morphing: weighted interpolation between two labeled sounds.
//!
//! Given two distilled collections, the morpher pairs partials by label
//! and produces a new collection whose parameters sweep from one sound to
//! the other under three time-varying weight functions (0 is fully the
//! first sound, 1 is fully the second; values outside `[0, 1]` are allowed
//! and produce exaggerated morphs). Labels present in only one sound
//! survive with their amplitude faded by the weight, so the morph's label
//! set is always the union of the sources' label sets.

use crate::error::{Result, TransformError};
use log::debug;
use prism_core::{wrap_phase, Breakpoint, Envelope, Partial, PartialCollection};
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

/// How two amplitudes combine under the morph weight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AmplitudeBlend {
    /// Energy crossfade, `sqrt((1-w)a^2 + w b^2)`: the morph's power is
    /// the weighted blend of the sources' powers, so equal-weight morphs
    /// do not sum to double volume.
    #[default]
    Energy,
    /// Plain linear crossfade of amplitudes.
    Linear,
}

/// Weight values this close to 0 or 1 count as fully one source when
/// deciding whether a breakpoint from the other source still contributes
/// timeline detail.
const WEIGHT_EPS: f64 = 1e-9;

/// Morphs two distilled collections under per-parameter weight envelopes.
#[derive(Debug, Clone)]
pub struct Morpher {
    frequency_weight: Envelope,
    amplitude_weight: Envelope,
    bandwidth_weight: Envelope,
    min_breakpoint_gap: f64,
    amplitude_blend: AmplitudeBlend,
}

impl Morpher {
    /// Default minimum spacing between morphed breakpoints: 0.1 ms.
    pub const DEFAULT_MIN_BREAKPOINT_GAP: f64 = 1e-4;

    /// Create a morpher with independent frequency, amplitude, and
    /// bandwidth weight functions.
    pub fn new(frequency: Envelope, amplitude: Envelope, bandwidth: Envelope) -> Self {
        Self {
            frequency_weight: frequency,
            amplitude_weight: amplitude,
            bandwidth_weight: bandwidth,
            min_breakpoint_gap: Self::DEFAULT_MIN_BREAKPOINT_GAP,
            amplitude_blend: AmplitudeBlend::default(),
        }
    }

    /// Create a morpher driving all three parameters with one weight
    /// function.
    pub fn uniform(weight: Envelope) -> Self {
        Self::new(weight.clone(), weight.clone(), weight)
    }

    /// The frequency weight function.
    pub fn frequency_weight(&self) -> &Envelope {
        &self.frequency_weight
    }

    /// The amplitude weight function.
    pub fn amplitude_weight(&self) -> &Envelope {
        &self.amplitude_weight
    }

    /// The bandwidth weight function.
    pub fn bandwidth_weight(&self) -> &Envelope {
        &self.bandwidth_weight
    }

    /// Replace the frequency weight function.
    pub fn set_frequency_weight(&mut self, weight: Envelope) {
        self.frequency_weight = weight;
    }

    /// Replace the amplitude weight function.
    pub fn set_amplitude_weight(&mut self, weight: Envelope) {
        self.amplitude_weight = weight;
    }

    /// Replace the bandwidth weight function.
    pub fn set_bandwidth_weight(&mut self, weight: Envelope) {
        self.bandwidth_weight = weight;
    }

    /// The minimum spacing enforced between morphed breakpoints.
    pub fn min_breakpoint_gap(&self) -> f64 {
        self.min_breakpoint_gap
    }

    /// Set the minimum spacing between morphed breakpoints (seconds,
    /// strictly positive). This is also the only epsilon applied at the
    /// morph's span boundaries.
    pub fn set_min_breakpoint_gap(&mut self, gap: f64) -> Result<()> {
        if !gap.is_finite() || gap <= 0.0 {
            return Err(TransformError::InvalidTiming(format!(
                "breakpoint gap must be positive, got {gap}"
            )));
        }
        self.min_breakpoint_gap = gap;
        Ok(())
    }

    /// The amplitude blend mode.
    pub fn amplitude_blend(&self) -> AmplitudeBlend {
        self.amplitude_blend
    }

    /// Choose how amplitudes combine; see [`AmplitudeBlend`].
    pub fn set_amplitude_blend(&mut self, blend: AmplitudeBlend) {
        self.amplitude_blend = blend;
    }

    /// Morph two distilled collections into a new labeled collection.
    ///
    /// Both inputs must have at most one partial per non-zero label
    /// (distilled); otherwise nothing is produced. Label-0 noise residue
    /// is not represented in a morph and is skipped. The output's label
    /// set is exactly the union of the inputs' non-zero label sets.
    pub fn morph(
        &self,
        a: &PartialCollection,
        b: &PartialCollection,
    ) -> Result<PartialCollection> {
        for input in [a, b] {
            if let Some((label, count)) = input.find_label_collision() {
                return Err(TransformError::NotDistilled { label, count });
            }
        }

        let index_a = label_index(a);
        let index_b = label_index(b);
        let labels: BTreeSet<u32> = index_a.keys().chain(index_b.keys()).copied().collect();

        let morphed: Vec<Partial> = labels
            .iter()
            .collect::<Vec<_>>()
            .into_par_iter()
            .map(|&label| match (index_a.get(&label), index_b.get(&label)) {
                (Some(pa), Some(pb)) => self.morph_pair(pa, pb, label),
                (Some(pa), None) => self.fade(pa, label, Side::A),
                (None, Some(pb)) => self.fade(pb, label, Side::B),
                (None, None) => unreachable!("label came from one of the indexes"),
            })
            .collect();

        debug!(
            "morphed {} labels ({} matched)",
            morphed.len(),
            labels
                .iter()
                .filter(|l| index_a.contains_key(l) && index_b.contains_key(l))
                .count()
        );
        Ok(morphed.into_iter().collect())
    }

    /// Morph two same-labeled partials over the union of their breakpoint
    /// timelines.
    fn morph_pair(&self, pa: &Partial, pb: &Partial, label: u32) -> Partial {
        let mut candidates: Vec<(Breakpoint, Side)> = pa
            .points()
            .iter()
            .map(|&bp| (bp, Side::A))
            .chain(pb.points().iter().map(|&bp| (bp, Side::B)))
            .collect();
        candidates.sort_by(|x, y| x.0.time.total_cmp(&y.0.time));

        let mut out = Partial::with_label(label);
        let mut last_time: Option<f64> = None;
        for (bp, side) in candidates {
            let t = bp.time;
            if self.fully_other(t, side) {
                continue;
            }
            if last_time.is_some_and(|last| t - last < self.min_breakpoint_gap) {
                continue;
            }
            let (own, other) = match side {
                Side::A => (bp, pb.parameters_at(t)),
                Side::B => (pa.parameters_at(t), bp),
            };
            out.insert(self.blend(t, own, other));
            last_time = Some(t);
        }
        out
    }

    /// Carry a partial present in only one source into the morph, faded
    /// by the amplitude weight.
    fn fade(&self, p: &Partial, label: u32, side: Side) -> Partial {
        let mut out = Partial::with_label(label);
        let mut last_time: Option<f64> = None;
        for bp in p.points() {
            let t = bp.time;
            if self.fully_other(t, side) {
                continue;
            }
            if last_time.is_some_and(|last| t - last < self.min_breakpoint_gap) {
                continue;
            }
            let w = self.amplitude_weight.value_at(t);
            let scale = match side {
                Side::A => 1.0 - w,
                Side::B => w,
            }
            .max(0.0);
            out.insert(Breakpoint::new(
                t,
                bp.frequency,
                bp.amplitude * scale,
                bp.bandwidth,
                bp.phase,
            ));
            last_time = Some(t);
        }
        out
    }

    /// True when all three weights at `t` sit fully at the opposite
    /// source, so a breakpoint from `side` contributes nothing.
    fn fully_other(&self, t: f64, side: Side) -> bool {
        let target = match side {
            Side::A => 1.0,
            Side::B => 0.0,
        };
        (self.frequency_weight.value_at(t) - target).abs() < WEIGHT_EPS
            && (self.amplitude_weight.value_at(t) - target).abs() < WEIGHT_EPS
            && (self.bandwidth_weight.value_at(t) - target).abs() < WEIGHT_EPS
    }

    /// Blend the two sources' parameters at one instant.
    fn blend(&self, t: f64, a: Breakpoint, b: Breakpoint) -> Breakpoint {
        let wf = self.frequency_weight.value_at(t);
        let wa = self.amplitude_weight.value_at(t);
        let wb = self.bandwidth_weight.value_at(t);

        let frequency = a.frequency + wf * (b.frequency - a.frequency);
        let bandwidth = (a.bandwidth + wb * (b.bandwidth - a.bandwidth)).clamp(0.0, 1.0);
        let amplitude = match self.amplitude_blend {
            AmplitudeBlend::Energy => ((1.0 - wa).max(0.0) * a.amplitude * a.amplitude
                + wa.max(0.0) * b.amplitude * b.amplitude)
                .sqrt(),
            AmplitudeBlend::Linear => (a.amplitude + wa * (b.amplitude - a.amplitude)).max(0.0),
        };
        let phase = a.phase + wf * wrap_phase(b.phase - a.phase);
        Breakpoint::new(t, frequency, amplitude, bandwidth, phase)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    A,
    B,
}

/// Non-zero labels mapped to their (sole, non-empty) partial.
fn label_index(collection: &PartialCollection) -> BTreeMap<u32, &Partial> {
    collection
        .iter()
        .filter(|p| p.label() != 0 && !p.is_empty())
        .map(|p| (p.label(), p))
        .collect()
}

/// Morph with one weight envelope for all three parameters; see
/// [`Morpher::morph`].
pub fn morph(
    a: &PartialCollection,
    b: &PartialCollection,
    weight: &Envelope,
) -> Result<PartialCollection> {
    Morpher::uniform(weight.clone()).morph(a, b)
}
