//! An unordered multiset of partials.
//!
//! Iteration order carries no meaning; anything that needs per-label
//! grouping goes through the explicit [`PartialCollection::by_label`]
//! index rather than relying on how partials happen to be stored.

use crate::partial::Partial;
use std::collections::{BTreeMap, BTreeSet};

/// An unordered collection of [`Partial`]s.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct PartialCollection {
    partials: Vec<Partial>,
}

impl PartialCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a partial.
    pub fn push(&mut self, partial: Partial) {
        self.partials.push(partial);
    }

    /// Number of partials.
    pub fn len(&self) -> usize {
        self.partials.len()
    }

    /// True when the collection holds no partials.
    pub fn is_empty(&self) -> bool {
        self.partials.is_empty()
    }

    /// Iterate over the partials.
    pub fn iter(&self) -> std::slice::Iter<'_, Partial> {
        self.partials.iter()
    }

    /// Iterate mutably over the partials.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Partial> {
        self.partials.iter_mut()
    }

    /// Keep only the partials for which `keep` returns true.
    pub fn retain(&mut self, keep: impl FnMut(&Partial) -> bool) {
        self.partials.retain(keep);
    }

    /// The partials as a slice.
    pub fn as_slice(&self) -> &[Partial] {
        &self.partials
    }

    /// Mutable access to the partials.
    pub fn as_mut_slice(&mut self) -> &mut [Partial] {
        &mut self.partials
    }

    /// Consume the collection, yielding its partials.
    pub fn into_vec(self) -> Vec<Partial> {
        self.partials
    }

    /// The set of distinct non-zero labels present.
    pub fn labels(&self) -> BTreeSet<u32> {
        self.partials
            .iter()
            .map(Partial::label)
            .filter(|&l| l != 0)
            .collect()
    }

    /// Group partial indices by label (label 0 included).
    pub fn by_label(&self) -> BTreeMap<u32, Vec<&Partial>> {
        let mut map: BTreeMap<u32, Vec<&Partial>> = BTreeMap::new();
        for p in &self.partials {
            map.entry(p.label()).or_default().push(p);
        }
        map
    }

    /// True when no non-zero label appears on more than one partial.
    pub fn is_distilled(&self) -> bool {
        let mut seen = BTreeSet::new();
        self.partials
            .iter()
            .map(Partial::label)
            .filter(|&l| l != 0)
            .all(|l| seen.insert(l))
    }

    /// The first non-zero label, if any, that appears on more than one
    /// partial, with its multiplicity.
    pub fn find_label_collision(&self) -> Option<(u32, usize)> {
        let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
        for p in &self.partials {
            if p.label() != 0 {
                *counts.entry(p.label()).or_default() += 1;
            }
        }
        counts.into_iter().find(|&(_, n)| n > 1)
    }

    /// The union of all partials' spans, `None` when nothing is sounding.
    pub fn span(&self) -> Option<(f64, f64)> {
        let mut result: Option<(f64, f64)> = None;
        for (a, b) in self.partials.iter().filter_map(Partial::span) {
            result = Some(match result {
                None => (a, b),
                Some((lo, hi)) => (lo.min(a), hi.max(b)),
            });
        }
        result
    }
}

impl FromIterator<Partial> for PartialCollection {
    fn from_iter<T: IntoIterator<Item = Partial>>(iter: T) -> Self {
        Self {
            partials: iter.into_iter().collect(),
        }
    }
}

impl Extend<Partial> for PartialCollection {
    fn extend<T: IntoIterator<Item = Partial>>(&mut self, iter: T) {
        self.partials.extend(iter);
    }
}

impl IntoIterator for PartialCollection {
    type Item = Partial;
    type IntoIter = std::vec::IntoIter<Partial>;

    fn into_iter(self) -> Self::IntoIter {
        self.partials.into_iter()
    }
}

impl<'a> IntoIterator for &'a PartialCollection {
    type Item = &'a Partial;
    type IntoIter = std::slice::Iter<'a, Partial>;

    fn into_iter(self) -> Self::IntoIter {
        self.partials.iter()
    }
}

impl<'a> IntoIterator for &'a mut PartialCollection {
    type Item = &'a mut Partial;
    type IntoIter = std::slice::IterMut<'a, Partial>;

    fn into_iter(self) -> Self::IntoIter {
        self.partials.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breakpoint::Breakpoint;

    fn labeled(label: u32, t0: f64, t1: f64) -> Partial {
        let mut p = Partial::with_label(label);
        p.insert(Breakpoint::new(t0, 100.0, 0.1, 0.0, 0.0));
        p.insert(Breakpoint::new(t1, 100.0, 0.1, 0.0, 0.0));
        p
    }

    #[test]
    fn labels_exclude_zero() {
        let c: PartialCollection =
            [labeled(0, 0.0, 1.0), labeled(3, 0.0, 1.0), labeled(1, 0.0, 1.0)]
                .into_iter()
                .collect();
        assert_eq!(c.labels().into_iter().collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn distilled_detection() {
        let mut c: PartialCollection =
            [labeled(0, 0.0, 1.0), labeled(0, 0.0, 1.0), labeled(2, 0.0, 1.0)]
                .into_iter()
                .collect();
        assert!(c.is_distilled());
        c.push(labeled(2, 2.0, 3.0));
        assert!(!c.is_distilled());
        assert_eq!(c.find_label_collision(), Some((2, 2)));
    }

    #[test]
    fn span_is_union_of_partial_spans() {
        let c: PartialCollection = [labeled(1, 0.5, 1.0), labeled(2, 0.2, 0.8)]
            .into_iter()
            .collect();
        assert_eq!(c.span(), Some((0.2, 1.0)));
    }
}
