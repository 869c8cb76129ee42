//! Cropping a collection to a time window.

use crate::error::{Result, TransformError};
use prism_core::{Partial, PartialCollection};

/// Trim every partial to the window `[start, end]`.
///
/// Partials crossing a window edge get an interpolated breakpoint exactly
/// at the edge so the cropped sound starts and ends on defined
/// parameters. Partials entirely outside the window are removed.
pub fn crop(collection: &mut PartialCollection, start: f64, end: f64) -> Result<()> {
    if !start.is_finite() || !end.is_finite() || end <= start {
        return Err(TransformError::InvalidRange { start, end });
    }
    for p in collection.iter_mut() {
        *p = crop_partial(p, start, end);
    }
    collection.retain(|p| !p.is_empty());
    Ok(())
}

fn crop_partial(p: &Partial, start: f64, end: f64) -> Partial {
    let Some((p_start, p_end)) = p.span() else {
        return Partial::with_label(p.label());
    };
    if p_end < start || p_start > end {
        return Partial::with_label(p.label());
    }
    let mut out = Partial::with_label(p.label());
    if p_start < start {
        out.insert(p.parameters_at(start));
    }
    for &bp in p.points().iter().filter(|bp| bp.time >= start && bp.time <= end) {
        out.insert(bp);
    }
    if p_end > end {
        out.insert(p.parameters_at(end));
    }
    out
}
