//! Algebraic laws of the transformation stages, checked over generated
//! collections.

#[path = "helpers/mod.rs"]
mod helpers;

use helpers::consistent_partial;
use prism::prelude::*;
use proptest::prelude::*;

/// A partial with 2..=5 breakpoints at strictly increasing times. The
/// frequency is constant per partial so channelization laws are exact.
fn partial_strategy(label: u32) -> impl Strategy<Value = Partial> {
    (
        0.0..2.0f64,                               // start time
        prop::collection::vec(0.01..0.3f64, 1..5), // gaps between breakpoints
        50.0..2000.0f64,                           // frequency
        prop::collection::vec(0.01..1.0f64, 5),    // amplitudes
        0.0..1.0f64,                               // bandwidth
    )
        .prop_map(move |(start, gaps, freq, amps, bw)| {
            let mut points = vec![(start, freq, amps[0], bw)];
            let mut t = start;
            for (i, gap) in gaps.iter().enumerate() {
                t += gap;
                points.push((t, freq, amps[i + 1], bw));
            }
            consistent_partial(label, &points, 0.0)
        })
}

/// An arbitrary collection: labels 0..=3, several partials, collisions
/// likely.
fn collection_strategy() -> impl Strategy<Value = PartialCollection> {
    prop::collection::vec((0u32..4).prop_flat_map(partial_strategy), 1..8)
        .prop_map(|ps| ps.into_iter().collect())
}

/// A distilled collection: at most one partial per label in `labels`.
fn distilled_strategy(labels: [u32; 4]) -> impl Strategy<Value = PartialCollection> {
    let member = |l: u32| (any::<bool>(), partial_strategy(l));
    (
        member(labels[0]),
        member(labels[1]),
        member(labels[2]),
        member(labels[3]),
    )
        .prop_map(|(a, b, c, d)| {
            [a, b, c, d]
                .into_iter()
                .filter(|(keep, _)| *keep)
                .map(|(_, p)| p)
                .collect()
        })
}

/// A collection holding exactly one partial, labeled 1.
fn single_partial_collection() -> impl Strategy<Value = PartialCollection> {
    partial_strategy(1).prop_map(|p| [p].into_iter().collect())
}

/// Collections compare by label-indexed content, never sequence order.
fn assert_same_by_label(a: &PartialCollection, b: &PartialCollection) {
    let (ia, ib) = (a.by_label(), b.by_label());
    assert_eq!(ia.len(), ib.len());
    for (label, group_a) in &ia {
        let group_b = &ib[label];
        assert_eq!(group_a.len(), group_b.len(), "label {label}");
        // Within a label, match partials by start time.
        let mut sa = group_a.clone();
        let mut sb = group_b.clone();
        sa.sort_by(|x, y| x.start_time().total_cmp(&y.start_time()));
        sb.sort_by(|x, y| x.start_time().total_cmp(&y.start_time()));
        assert_eq!(sa, sb, "label {label}");
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn distillation_is_idempotent(mut c in collection_strategy()) {
        distill(&mut c).unwrap();
        let once = c.clone();
        distill(&mut c).unwrap();
        assert_same_by_label(&once, &c);
    }

    #[test]
    fn channelize_then_distill_twice_is_stable(
        mut c in collection_strategy(),
        reference in 80.0..400.0f64,
    ) {
        let reference = Envelope::constant(reference);
        channelize(&mut c, &reference, 1).unwrap();
        distill(&mut c).unwrap();
        let once = c.clone();
        // Labels are already settled, so a second pass changes nothing.
        channelize(&mut c, &reference, 1).unwrap();
        distill(&mut c).unwrap();
        assert_same_by_label(&once, &c);
    }

    #[test]
    fn morph_conserves_the_label_union(
        a in distilled_strategy([1, 2, 3, 4]),
        b in distilled_strategy([2, 3, 5, 6]),
        w0 in 0.0..1.0f64,
        w1 in 0.0..1.0f64,
    ) {
        prop_assume!(!a.is_empty() || !b.is_empty());
        let weight = Envelope::from_points([(0.0, w0), (2.0, w1)]).unwrap();
        let morphed = Morpher::uniform(weight).morph(&a, &b).unwrap();
        let mut expected = a.labels();
        expected.extend(b.labels());
        prop_assert_eq!(morphed.labels(), expected);
    }

    #[test]
    fn morph_span_obeys_the_boundary_law(
        a in single_partial_collection(),
        b in single_partial_collection(),
    ) {
        let gap = Morpher::DEFAULT_MIN_BREAKPOINT_GAP;
        // Mid-range weights: neither source is ever fully absent, so no
        // breakpoint is skipped and the span law is exact to the gap.
        let morphed = Morpher::uniform(Envelope::constant(0.5)).morph(&a, &b).unwrap();
        let (a0, a1) = a.span().unwrap();
        let (b0, b1) = b.span().unwrap();
        let (m0, m1) = morphed.span().unwrap();
        prop_assert!((m0 - a0.min(b0)).abs() <= gap + 1e-12);
        prop_assert!((m1 - a1.max(b1)).abs() <= gap + 1e-12);
    }

    #[test]
    fn zero_cents_shift_is_identity(mut c in collection_strategy()) {
        let before = c.clone();
        shift_pitch(&mut c, &Envelope::constant(0.0));
        prop_assert_eq!(before, c);
    }

    #[test]
    fn identity_dilation_changes_nothing(mut c in collection_strategy()) {
        let before = c.clone();
        dilate(&mut c, &TimeMap::identity());
        prop_assert_eq!(before, c);
    }

    #[test]
    fn shift_then_unshift_restores_frequencies(
        mut c in collection_strategy(),
        cents in -1200.0..1200.0f64,
    ) {
        let before = c.clone();
        shift_pitch_by(&mut c, cents);
        shift_pitch_by(&mut c, -cents);
        for (p, q) in c.iter().zip(before.iter()) {
            for (bp, bq) in p.points().iter().zip(q.points()) {
                prop_assert!((bp.frequency - bq.frequency).abs() < 1e-9 * bq.frequency.max(1.0));
            }
        }
    }
}
