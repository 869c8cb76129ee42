//! Harmonic labeling against a reference-frequency envelope.
//!
//! Channelization makes two independently analyzed sounds comparable: a
//! partial tracking the third harmonic of either sound ends up with label
//! 3 in both, so later stages (distillation, morphing) can pair them.

use crate::error::{Result, TransformError};
use log::debug;
use prism_core::{Envelope, Partial, PartialCollection};
use rayon::prelude::*;

/// Reference frequencies this close to zero are treated as silence and
/// skipped rather than divided by.
const MIN_REFERENCE_HZ: f64 = 1e-6;

/// Total weight below which a partial is considered silent and left
/// unlabeled.
const MIN_TOTAL_WEIGHT: f64 = 1e-12;

/// Assigns harmonic labels to partials by comparing their frequency
/// trajectories against a scaled reference-frequency envelope.
///
/// The reference envelope typically traces a sound's fundamental (then
/// `reference_label` is 1), but it may trace any harmonic: an envelope
/// following the third harmonic with `reference_label` 3 produces the
/// same labeling.
#[derive(Debug, Clone)]
pub struct Channelizer {
    reference: Envelope,
    reference_label: u32,
}

impl Channelizer {
    /// Create a channelizer from a reference envelope and the harmonic
    /// number that envelope represents.
    ///
    /// Fails if `reference_label` is 0 or the envelope has no positive
    /// frequency anywhere.
    pub fn new(reference: Envelope, reference_label: u32) -> Result<Self> {
        if reference_label == 0 {
            return Err(TransformError::ReservedLabel);
        }
        if reference.is_empty() || !reference.points().iter().any(|&(_, f)| f > MIN_REFERENCE_HZ) {
            return Err(TransformError::InvalidReference(
                "reference envelope has no positive frequency".into(),
            ));
        }
        Ok(Self {
            reference,
            reference_label,
        })
    }

    /// The reference envelope.
    pub fn reference(&self) -> &Envelope {
        &self.reference
    }

    /// The harmonic number the reference envelope traces.
    pub fn reference_label(&self) -> u32 {
        self.reference_label
    }

    /// Overwrite every partial's label with its best-fit harmonic number.
    ///
    /// Partials that are silent throughout, have zero duration weight, or
    /// never see a usable reference frequency get label 0.
    pub fn channelize(&self, collection: &mut PartialCollection) {
        collection
            .as_mut_slice()
            .par_iter_mut()
            .for_each(|p| p.set_label(self.label_for(p)));
        debug!(
            "channelized {} partials against reference label {}, {} now labeled",
            collection.len(),
            self.reference_label,
            collection.iter().filter(|p| p.label() != 0).count()
        );
    }

    /// The harmonic number that minimizes the energy-weighted squared
    /// deviation of `frequency / (reference / reference_label)` from an
    /// integer across the partial's breakpoints.
    fn label_for(&self, partial: &Partial) -> u32 {
        let mut weighted_ratio = 0.0;
        let mut total_weight = 0.0;
        for bp in partial.points() {
            let reference = self.reference.value_at(bp.time);
            if reference <= MIN_REFERENCE_HZ {
                continue;
            }
            let weight = bp.amplitude * bp.amplitude;
            weighted_ratio += weight * bp.frequency * f64::from(self.reference_label) / reference;
            total_weight += weight;
        }
        if total_weight <= MIN_TOTAL_WEIGHT {
            return 0;
        }
        let harmonic = (weighted_ratio / total_weight).round();
        if harmonic < 1.0 || !harmonic.is_finite() {
            0
        } else {
            harmonic as u32
        }
    }
}

/// Channelize in one call; see [`Channelizer::channelize`].
pub fn channelize(
    collection: &mut PartialCollection,
    reference: &Envelope,
    reference_label: u32,
) -> Result<()> {
    Channelizer::new(reference.clone(), reference_label)?.channelize(collection);
    Ok(())
}
