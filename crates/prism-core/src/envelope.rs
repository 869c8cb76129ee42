//! Piecewise-linear time-varying control functions.
//!
//! Envelopes drive channelization (reference frequency in Hz), pitch
//! shifting (offset in cents), and morphing (weights, nominally in
//! `[0, 1]`). Between control points the value is linearly interpolated;
//! before the first and after the last point it holds flat.

use crate::error::{Error, Result};

/// A piecewise-linear mapping from time to value.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Envelope {
    points: Vec<(f64, f64)>,
}

impl Envelope {
    /// Create an empty envelope. An empty envelope evaluates to 0.0
    /// everywhere.
    pub fn new() -> Self {
        Self::default()
    }

    /// An envelope holding `value` at all times.
    pub fn constant(value: f64) -> Self {
        Self {
            points: vec![(0.0, value)],
        }
    }

    /// Build an envelope from `(time, value)` control points, in any
    /// order. Duplicate times keep the last value supplied. Non-finite
    /// times or values are rejected.
    pub fn from_points(points: impl IntoIterator<Item = (f64, f64)>) -> Result<Self> {
        let mut env = Self::new();
        for (t, v) in points {
            if !t.is_finite() || !v.is_finite() {
                return Err(Error::InvalidEnvelope(format!(
                    "non-finite control point ({t}, {v})"
                )));
            }
            env.insert(t, v);
        }
        Ok(env)
    }

    /// Insert a control point, replacing any existing point at `time`.
    pub fn insert(&mut self, time: f64, value: f64) {
        match self
            .points
            .binary_search_by(|(t, _)| t.partial_cmp(&time).expect("finite envelope time"))
        {
            Ok(i) => self.points[i].1 = value,
            Err(i) => self.points.insert(i, (time, value)),
        }
    }

    /// The ordered control points.
    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    /// Number of control points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when the envelope has no control points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Evaluate the envelope at `t`: linear between points, flat outside.
    pub fn value_at(&self, t: f64) -> f64 {
        let Some(&(first_t, first_v)) = self.points.first() else {
            return 0.0;
        };
        if t <= first_t {
            return first_v;
        }
        let &(last_t, last_v) = self.points.last().expect("non-empty");
        if t >= last_t {
            return last_v;
        }
        let i = self.points.partition_point(|&(pt, _)| pt < t);
        let (t0, v0) = self.points[i - 1];
        let (t1, v1) = self.points[i];
        if t1 == t {
            return v1;
        }
        v0 + (v1 - v0) * (t - t0) / (t1 - t0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn empty_envelope_is_zero() {
        assert_eq!(Envelope::new().value_at(1.0), 0.0);
    }

    #[test]
    fn flat_outside_linear_inside() {
        let env = Envelope::from_points([(0.2, 0.0), (0.4, 0.5), (0.8, 1.0)]).unwrap();
        assert_relative_eq!(env.value_at(0.0), 0.0);
        assert_relative_eq!(env.value_at(0.3), 0.25);
        assert_relative_eq!(env.value_at(0.4), 0.5);
        assert_relative_eq!(env.value_at(0.6), 0.75);
        assert_relative_eq!(env.value_at(2.0), 1.0);
    }

    #[test]
    fn insert_replaces_existing_time() {
        let mut env = Envelope::from_points([(0.0, 1.0), (1.0, 2.0)]).unwrap();
        env.insert(1.0, 5.0);
        assert_eq!(env.len(), 2);
        assert_relative_eq!(env.value_at(1.0), 5.0);
    }

    #[test]
    fn non_finite_points_are_rejected() {
        assert!(Envelope::from_points([(0.0, f64::NAN)]).is_err());
        assert!(Envelope::from_points([(f64::INFINITY, 1.0)]).is_err());
    }
}
