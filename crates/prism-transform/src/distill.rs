//! Distillation: one continuous partial per label.
//!
//! After channelization a label usually names several short partials
//! scattered over time. Distillation merges each label's partials into a
//! single continuous partial, bridging the silent gaps with zero-amplitude
//! breakpoints so resynthesis fades smoothly instead of clicking, and
//! resolving temporal overlaps deterministically: at any disputed instant
//! the louder partial owns the timeline and the quieter one's energy is
//! absorbed as noise.

use crate::error::{Result, TransformError};
use log::{debug, warn};
use prism_core::{Breakpoint, Partial, PartialCollection};
use rayon::prelude::*;
use std::collections::BTreeMap;

/// Merges all partials sharing a non-zero label into one partial per
/// label. Label-0 partials pass through untouched.
#[derive(Debug, Clone)]
pub struct Distiller {
    fade_time: f64,
    min_gap: f64,
}

impl Default for Distiller {
    fn default() -> Self {
        Self {
            fade_time: Self::DEFAULT_FADE_TIME,
            min_gap: Self::DEFAULT_MIN_GAP,
        }
    }
}

impl Distiller {
    /// Default fade to and from silence at segment boundaries: 1 ms.
    pub const DEFAULT_FADE_TIME: f64 = 0.001;

    /// Default minimum spacing preserved between bridge breakpoints:
    /// 0.1 ms.
    pub const DEFAULT_MIN_GAP: f64 = 0.0001;

    /// Create a distiller with explicit fade and minimum-gap times, both
    /// in seconds and strictly positive.
    pub fn new(fade_time: f64, min_gap: f64) -> Result<Self> {
        if !fade_time.is_finite() || fade_time <= 0.0 {
            return Err(TransformError::InvalidTiming(format!(
                "fade time must be positive, got {fade_time}"
            )));
        }
        if !min_gap.is_finite() || min_gap <= 0.0 {
            return Err(TransformError::InvalidTiming(format!(
                "minimum gap must be positive, got {min_gap}"
            )));
        }
        Ok(Self { fade_time, min_gap })
    }

    /// The boundary fade time in seconds.
    pub fn fade_time(&self) -> f64 {
        self.fade_time
    }

    /// Replace the collection's contents with its distilled form: at most
    /// one partial per non-zero label, label-0 partials unchanged.
    ///
    /// Distilling an already-distilled collection is a no-op. Fails only
    /// on an empty collection, before any mutation.
    pub fn distill(&self, collection: &mut PartialCollection) -> Result<()> {
        if collection.is_empty() {
            return Err(TransformError::EmptyCollection);
        }

        let mut residue = Vec::new();
        let mut groups: BTreeMap<u32, Vec<Partial>> = BTreeMap::new();
        let mut dropped = 0usize;
        for p in std::mem::take(collection) {
            if p.is_empty() {
                dropped += 1;
                continue;
            }
            if p.label() == 0 {
                residue.push(p);
            } else {
                groups.entry(p.label()).or_default().push(p);
            }
        }
        if dropped > 0 {
            warn!("distill dropped {dropped} empty partials");
        }
        let label_count = groups.len();

        let merged: Vec<Partial> = groups
            .into_par_iter()
            .map(|(label, group)| self.merge_label(label, group))
            .collect();

        debug!(
            "distilled {} labels, {} unlabeled partials pass through",
            label_count,
            residue.len()
        );
        collection.extend(residue);
        collection.extend(merged);
        Ok(())
    }

    /// Merge one label's partials into a single continuous partial.
    fn merge_label(&self, label: u32, mut group: Vec<Partial>) -> Partial {
        if group.len() == 1 {
            return group.pop().expect("non-empty group");
        }
        // Canonical processing order so ownership ties resolve the same
        // way regardless of how the collection was assembled.
        group.sort_by(|a, b| {
            a.start_time()
                .total_cmp(&b.start_time())
                .then(a.end_time().total_cmp(&b.end_time()))
        });

        let kept = self.keep_owned_breakpoints(&group);
        if kept.is_empty() {
            // Pathological mutual-masking case: keep the longest-sounding
            // partial and absorb the rest.
            let (idx, _) = group
                .iter()
                .enumerate()
                .max_by(|(_, a), (_, b)| a.end_time().total_cmp(&b.end_time()))
                .expect("non-empty group");
            let mut out = group[idx].clone();
            for (qi, q) in group.iter().enumerate() {
                if qi != idx {
                    out.absorb(q);
                }
            }
            out.set_label(label);
            return out;
        }

        let mut out = Partial::with_label(label);
        for window in 0..kept.len() {
            let (bp, src) = kept[window];
            out.insert(self.absorbed(bp, src, &group));
            if let Some(&(next_bp, next_src)) = kept.get(window + 1) {
                if next_src != src {
                    self.insert_bridges(&mut out, &group, bp.time, src, next_bp.time, next_src);
                }
            }
        }
        out
    }

    /// The breakpoints that survive overlap resolution, tagged with the
    /// index of the partial they came from, in time order.
    fn keep_owned_breakpoints(&self, group: &[Partial]) -> Vec<(Breakpoint, usize)> {
        let mut kept: Vec<(Breakpoint, usize)> = Vec::new();
        for (pi, p) in group.iter().enumerate() {
            for &bp in p.points() {
                if owner_at(group, bp.time) == pi {
                    kept.push((bp, pi));
                }
            }
        }
        kept.sort_by(|a, b| a.0.time.total_cmp(&b.0.time));
        kept
    }

    /// A kept breakpoint with the energy of every other sounding partial
    /// folded in as noise.
    fn absorbed(&self, bp: Breakpoint, src: usize, group: &[Partial]) -> Breakpoint {
        let mut energy = bp.amplitude * bp.amplitude;
        let mut noise = energy * bp.bandwidth;
        for (qi, q) in group.iter().enumerate() {
            if qi == src {
                continue;
            }
            let a = q.amplitude_at(bp.time);
            if a > 0.0 {
                // Absorbed energy counts entirely as noise.
                energy += a * a;
                noise += a * a;
            }
        }
        if energy <= 0.0 {
            return bp;
        }
        Breakpoint::new(bp.time, bp.frequency, energy.sqrt(), noise / energy, bp.phase)
    }

    /// Insert the pair of zero-amplitude bridge breakpoints that carry the
    /// merged partial across a handover from one source partial to the
    /// next.
    fn insert_bridges(
        &self,
        out: &mut Partial,
        group: &[Partial],
        prev_time: f64,
        prev_src: usize,
        next_time: f64,
        next_src: usize,
    ) {
        let gap = next_time - prev_time;
        if gap <= self.min_gap {
            // Segments practically touch; a fade would collide with the
            // neighboring breakpoints.
            return;
        }
        let fade = self.fade_time.min((gap - self.min_gap) / 2.0);
        let t1 = prev_time + fade;
        let t2 = next_time - fade;
        let from = &group[prev_src];
        let to = &group[next_src];
        out.insert(Breakpoint::new(
            t1,
            from.frequency_at(t1),
            0.0,
            0.0,
            from.phase_at(t1),
        ));
        out.insert(Breakpoint::new(
            t2,
            to.frequency_at(t2),
            0.0,
            0.0,
            to.phase_at(t2),
        ));
    }
}

/// The index of the partial that owns instant `t`: the loudest sounding
/// candidate, ties broken toward the later-ending partial.
fn owner_at(group: &[Partial], t: f64) -> usize {
    group
        .iter()
        .enumerate()
        .filter(|(_, p)| p.contains(t))
        .max_by(|(_, a), (_, b)| {
            a.amplitude_at(t)
                .total_cmp(&b.amplitude_at(t))
                .then(a.end_time().total_cmp(&b.end_time()))
        })
        .map(|(i, _)| i)
        .unwrap_or(usize::MAX)
}

/// Distill with the default fade and gap times.
pub fn distill(collection: &mut PartialCollection) -> Result<()> {
    Distiller::default().distill(collection)
}
