//! Piecewise-linear time warps for dilation.

use crate::error::{Error, Result};

/// A monotone piecewise-linear map from source time to target time,
/// defined by anchor pairs strictly increasing in both coordinates.
///
/// Beyond the outermost anchors the map extrapolates linearly with the
/// slope of the nearest segment. By convention an implicit `(0, 0)`
/// anchor is prepended when every supplied anchor is strictly positive,
/// so warps are pinned at the origin unless the caller overrides it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct TimeMap {
    anchors: Vec<(f64, f64)>,
}

impl TimeMap {
    /// Build a time map from `(source, target)` anchor pairs.
    ///
    /// Anchors must be non-empty, finite, and strictly increasing in both
    /// source and target time.
    pub fn from_anchors(anchors: impl IntoIterator<Item = (f64, f64)>) -> Result<Self> {
        let mut anchors: Vec<(f64, f64)> = anchors.into_iter().collect();
        if anchors.is_empty() {
            return Err(Error::InvalidTimeMap("no anchors supplied".into()));
        }
        for &(s, t) in &anchors {
            if !s.is_finite() || !t.is_finite() {
                return Err(Error::InvalidTimeMap(format!(
                    "non-finite anchor ({s}, {t})"
                )));
            }
        }
        for w in anchors.windows(2) {
            let ((s0, t0), (s1, t1)) = (w[0], w[1]);
            if s1 <= s0 || t1 <= t0 {
                return Err(Error::InvalidTimeMap(format!(
                    "anchors must be strictly increasing in both coordinates: \
                     ({s0}, {t0}) then ({s1}, {t1})"
                )));
            }
        }
        let (s0, t0) = anchors[0];
        if s0 > 0.0 && t0 > 0.0 {
            anchors.insert(0, (0.0, 0.0));
        }
        Ok(Self { anchors })
    }

    /// The identity warp.
    pub fn identity() -> Self {
        Self {
            anchors: vec![(0.0, 0.0), (1.0, 1.0)],
        }
    }

    /// The anchor pairs, including any implicit origin.
    pub fn anchors(&self) -> &[(f64, f64)] {
        &self.anchors
    }

    /// Map a source time to a target time.
    pub fn map(&self, t: f64) -> f64 {
        let n = self.anchors.len();
        if n == 1 {
            // A single anchor defines a pure shift.
            let (s, tg) = self.anchors[0];
            return tg + (t - s);
        }
        let i = self
            .anchors
            .partition_point(|&(s, _)| s < t)
            .clamp(1, n - 1);
        let (s0, t0) = self.anchors[i - 1];
        let (s1, t1) = self.anchors[i];
        t0 + (t - s0) * (t1 - t0) / (s1 - s0)
    }
}
