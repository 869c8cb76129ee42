//! Pitch shifting by a time-varying offset in cents.

use prism_core::{Envelope, PartialCollection};
use rayon::prelude::*;

/// Scale every breakpoint's frequency by `2^(cents(t) / 1200)`.
///
/// Amplitude, bandwidth, and phase are untouched. Each breakpoint is
/// independent, so the work is parallel across partials.
pub fn shift_pitch(collection: &mut PartialCollection, cents: &Envelope) {
    collection.as_mut_slice().par_iter_mut().for_each(|p| {
        for bp in p.points_mut() {
            bp.frequency *= (cents.value_at(bp.time) / 1200.0).exp2();
        }
    });
}

/// Shift every breakpoint's frequency by a constant offset in cents.
pub fn shift_pitch_by(collection: &mut PartialCollection, cents: f64) {
    let ratio = (cents / 1200.0).exp2();
    collection.as_mut_slice().par_iter_mut().for_each(|p| {
        for bp in p.points_mut() {
            bp.frequency *= ratio;
        }
    });
}
