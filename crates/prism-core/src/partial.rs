//! A single time-varying sinusoidal-plus-noise track.
//!
//! A `Partial` owns an ordered sequence of [`Breakpoint`]s and an integer
//! label (0 means unlabeled). Between breakpoints, frequency, amplitude,
//! and bandwidth vary linearly; phase is obtained by integrating the
//! instantaneous frequency, which is what keeps additive resynthesis
//! phase-coherent.
//!
//! Outside its span a partial is silent: amplitude evaluates to exactly
//! zero, while frequency and bandwidth clamp to the nearest endpoint and
//! phase rolls backward or forward at the endpoint frequency.

use crate::breakpoint::Breakpoint;
use std::f64::consts::TAU;

/// A time-varying sinusoidal-plus-noise track with an identity label.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Partial {
    label: u32,
    points: Vec<Breakpoint>,
}

impl Partial {
    /// Create an empty, unlabeled partial.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty partial carrying `label`.
    pub fn with_label(label: u32) -> Self {
        Self {
            label,
            points: Vec::new(),
        }
    }

    /// The partial's label. 0 means unlabeled.
    pub fn label(&self) -> u32 {
        self.label
    }

    /// Overwrite the partial's label.
    pub fn set_label(&mut self, label: u32) {
        self.label = label;
    }

    /// Insert a breakpoint, keeping the timeline ordered by time.
    /// Inserting at an already-occupied time replaces that breakpoint.
    pub fn insert(&mut self, bp: Breakpoint) {
        match self
            .points
            .binary_search_by(|p| p.time.partial_cmp(&bp.time).expect("finite breakpoint time"))
        {
            Ok(i) => self.points[i] = bp,
            Err(i) => self.points.insert(i, bp),
        }
    }

    /// The ordered breakpoint timeline.
    pub fn points(&self) -> &[Breakpoint] {
        &self.points
    }

    /// Mutable access to the breakpoints. Callers must keep times strictly
    /// increasing; use [`Partial::map_times`] for monotone retiming.
    pub fn points_mut(&mut self) -> &mut [Breakpoint] {
        &mut self.points
    }

    /// Number of breakpoints.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when the partial has no breakpoints.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First breakpoint, if any.
    pub fn first(&self) -> Option<&Breakpoint> {
        self.points.first()
    }

    /// Last breakpoint, if any.
    pub fn last(&self) -> Option<&Breakpoint> {
        self.points.last()
    }

    /// Time of the first breakpoint, or 0.0 for an empty partial.
    pub fn start_time(&self) -> f64 {
        self.points.first().map_or(0.0, |bp| bp.time)
    }

    /// Time of the last breakpoint, or 0.0 for an empty partial.
    pub fn end_time(&self) -> f64 {
        self.points.last().map_or(0.0, |bp| bp.time)
    }

    /// `[start, end]` span of the breakpoint timeline, `None` when empty.
    pub fn span(&self) -> Option<(f64, f64)> {
        match (self.points.first(), self.points.last()) {
            (Some(a), Some(b)) => Some((a.time, b.time)),
            _ => None,
        }
    }

    /// Duration of the span in seconds, 0.0 when empty.
    pub fn duration(&self) -> f64 {
        self.end_time() - self.start_time()
    }

    /// True when `t` lies within the partial's span (inclusive).
    pub fn contains(&self, t: f64) -> bool {
        self.span().is_some_and(|(a, b)| t >= a && t <= b)
    }

    /// Remap every breakpoint time through `f`. The mapping must be
    /// strictly increasing so that breakpoint order is preserved.
    pub fn map_times(&mut self, f: impl Fn(f64) -> f64) {
        for bp in &mut self.points {
            bp.time = f(bp.time);
        }
        debug_assert!(
            self.points.windows(2).all(|w| w[0].time < w[1].time),
            "time mapping must be strictly increasing"
        );
    }

    /// Interpolated frequency at `t`, clamped to the nearest endpoint
    /// outside the span. 0.0 for an empty partial.
    pub fn frequency_at(&self, t: f64) -> f64 {
        self.linear_at(t, |bp| bp.frequency, Clamp::Endpoint)
    }

    /// Interpolated amplitude at `t`. Exactly zero outside the span.
    pub fn amplitude_at(&self, t: f64) -> f64 {
        self.linear_at(t, |bp| bp.amplitude, Clamp::Zero)
    }

    /// Interpolated bandwidth at `t`, clamped to the nearest endpoint
    /// outside the span.
    pub fn bandwidth_at(&self, t: f64) -> f64 {
        self.linear_at(t, |bp| bp.bandwidth, Clamp::Endpoint)
    }

    /// Phase at `t`, in radians, not wrapped.
    ///
    /// Inside the span the phase is the bracketing breakpoint's phase plus
    /// the phase travel accumulated at the (linearly varying) instantaneous
    /// frequency, the trapezoidal integral of frequency over the gap.
    /// Outside the span it rolls backward or forward from the boundary
    /// breakpoint at the clamped endpoint frequency.
    pub fn phase_at(&self, t: f64) -> f64 {
        let Some((start, end)) = self.span() else {
            return 0.0;
        };
        if t <= start {
            let bp = self.points[0];
            return bp.phase - TAU * bp.frequency * (start - t);
        }
        if t >= end {
            let bp = self.points[self.points.len() - 1];
            return bp.phase + TAU * bp.frequency * (t - end);
        }
        let i = self.upper_index(t);
        let lo = self.points[i - 1];
        if lo.time == t {
            return lo.phase;
        }
        let hi = self.points[i];
        if hi.time == t {
            return hi.phase;
        }
        let f_t = lerp(lo.frequency, hi.frequency, alpha(lo.time, hi.time, t));
        lo.phase + TAU * 0.5 * (lo.frequency + f_t) * (t - lo.time)
    }

    /// All four parameters at `t`, packaged as a breakpoint at that time.
    pub fn parameters_at(&self, t: f64) -> Breakpoint {
        Breakpoint::new(
            t,
            self.frequency_at(t),
            self.amplitude_at(t),
            self.bandwidth_at(t),
            self.phase_at(t),
        )
    }

    /// Merge another partial's energy into this one as noise.
    ///
    /// At each of this partial's breakpoint times where `other` is
    /// sounding, the two energies add; the absorbed energy counts entirely
    /// as noise, so with `e1 = amp^2` and `e2 = other.amplitude_at(t)^2`
    /// the updated parameters are `amp' = sqrt(e1 + e2)` and
    /// `bw' = (e1 * bw + e2) / (e1 + e2)`. Frequency and phase are kept.
    pub fn absorb(&mut self, other: &Partial) {
        for bp in &mut self.points {
            let a2 = other.amplitude_at(bp.time);
            if a2 == 0.0 {
                continue;
            }
            let e1 = bp.amplitude * bp.amplitude;
            let e2 = a2 * a2;
            let total = e1 + e2;
            if total <= 0.0 {
                continue;
            }
            bp.bandwidth = ((e1 * bp.bandwidth) + e2) / total;
            bp.amplitude = total.sqrt();
        }
    }

    /// Index of the first breakpoint with time >= `t`.
    /// Valid only for `t` inside the span, so the result is in `1..len`.
    fn upper_index(&self, t: f64) -> usize {
        let i = self.points.partition_point(|bp| bp.time < t);
        i.max(1)
    }

    fn linear_at(&self, t: f64, param: impl Fn(&Breakpoint) -> f64, clamp: Clamp) -> f64 {
        let Some((start, end)) = self.span() else {
            return 0.0;
        };
        if t < start {
            return match clamp {
                Clamp::Endpoint => param(&self.points[0]),
                Clamp::Zero => 0.0,
            };
        }
        if t > end {
            return match clamp {
                Clamp::Endpoint => param(&self.points[self.points.len() - 1]),
                Clamp::Zero => 0.0,
            };
        }
        let i = self.upper_index(t);
        let lo = &self.points[i - 1];
        if lo.time == t {
            return param(lo);
        }
        let hi = &self.points[i];
        if hi.time == t {
            return param(hi);
        }
        lerp(param(lo), param(hi), alpha(lo.time, hi.time, t))
    }
}

#[derive(Clone, Copy)]
enum Clamp {
    /// Hold the nearest endpoint value outside the span.
    Endpoint,
    /// The partial contributes nothing outside the span.
    Zero,
}

fn alpha(t0: f64, t1: f64, t: f64) -> f64 {
    (t - t0) / (t1 - t0)
}

fn lerp(a: f64, b: f64, x: f64) -> f64 {
    a + (b - a) * x
}
