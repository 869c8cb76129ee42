//! Frame-to-frame peak linking into partials.

use crate::spectrum::Peak;
use prism_core::{Breakpoint, Partial};

/// Links per-frame peaks into partials: each active track claims the
/// nearest unclaimed peak within the drift limit; tracks that find no
/// peak end, peaks that no track claims begin new partials.
pub(crate) struct Tracker {
    drift_hz: f64,
    active: Vec<Track>,
    finished: Vec<Partial>,
}

struct Track {
    partial: Partial,
    last_frequency: f64,
}

impl Tracker {
    pub fn new(drift_hz: f64) -> Self {
        Self {
            drift_hz,
            active: Vec::new(),
            finished: Vec::new(),
        }
    }

    /// Advance by one frame. `peaks` must be sorted by frequency.
    pub fn step(&mut self, time: f64, peaks: &[Peak]) {
        let mut claimed = vec![false; peaks.len()];

        // Tracks claim peaks nearest-first so a strong neighbor cannot
        // steal a track's own continuation.
        self.active.sort_by(|a, b| a.last_frequency.total_cmp(&b.last_frequency));
        let mut survivors: Vec<Track> = Vec::with_capacity(self.active.len());
        for mut track in self.active.drain(..) {
            let best = peaks
                .iter()
                .enumerate()
                .filter(|(i, p)| {
                    !claimed[*i] && (p.frequency - track.last_frequency).abs() <= self.drift_hz
                })
                .min_by(|(_, p), (_, q)| {
                    (p.frequency - track.last_frequency)
                        .abs()
                        .total_cmp(&(q.frequency - track.last_frequency).abs())
                });
            match best {
                Some((i, peak)) => {
                    claimed[i] = true;
                    track.partial.insert(breakpoint(time, peak));
                    track.last_frequency = peak.frequency;
                    survivors.push(track);
                }
                None => self.finished.push(track.partial),
            }
        }
        self.active = survivors;

        for (i, peak) in peaks.iter().enumerate() {
            if !claimed[i] {
                let mut partial = Partial::new();
                partial.insert(breakpoint(time, peak));
                self.active.push(Track {
                    partial,
                    last_frequency: peak.frequency,
                });
            }
        }
    }

    /// End every active track and return all partials.
    pub fn finish(mut self) -> Vec<Partial> {
        self.finished
            .extend(self.active.drain(..).map(|t| t.partial));
        self.finished
    }
}

fn breakpoint(time: f64, peak: &Peak) -> Breakpoint {
    Breakpoint::new(time, peak.frequency, peak.amplitude, 0.0, peak.phase)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peak(frequency: f64, amplitude: f64) -> Peak {
        Peak {
            frequency,
            amplitude,
            phase: 0.0,
        }
    }

    #[test]
    fn steady_peaks_form_one_partial_per_track() {
        let mut tr = Tracker::new(20.0);
        for i in 0..5 {
            let t = i as f64 * 0.01;
            tr.step(t, &[peak(100.0, 0.5), peak(200.0, 0.3)]);
        }
        let partials = tr.finish();
        assert_eq!(partials.len(), 2);
        for p in &partials {
            assert_eq!(p.len(), 5);
        }
    }

    #[test]
    fn drift_limit_breaks_a_track() {
        let mut tr = Tracker::new(10.0);
        tr.step(0.00, &[peak(100.0, 0.5)]);
        tr.step(0.01, &[peak(105.0, 0.5)]);
        // A 60 Hz jump exceeds the drift limit: the old track ends and a
        // new one begins.
        tr.step(0.02, &[peak(165.0, 0.5)]);
        let partials = tr.finish();
        assert_eq!(partials.len(), 2);
        let mut lens: Vec<usize> = partials.iter().map(Partial::len).collect();
        lens.sort_unstable();
        assert_eq!(lens, vec![1, 2]);
    }

    #[test]
    fn gap_frames_end_tracks() {
        let mut tr = Tracker::new(20.0);
        tr.step(0.00, &[peak(100.0, 0.5)]);
        tr.step(0.01, &[]);
        tr.step(0.02, &[peak(100.0, 0.5)]);
        let partials = tr.finish();
        assert_eq!(partials.len(), 2);
    }
}
