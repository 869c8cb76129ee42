//! End-to-end morph pipeline: analyze two tones, channelize each against
//! its own fundamental estimate, distill, dilate onto a common timeline,
//! morph, and render.

#[path = "helpers/mod.rs"]
mod helpers;

use helpers::{analyze_to_distilled, harmonic_tone, labeled, mean_frequency};
use prism::prelude::*;

const FS: f64 = 44100.0;

fn reed_tone() -> PartialCollection {
    let samples = harmonic_tone(220.0, &[0.5, 0.3, 0.2], 1.2, FS);
    analyze_to_distilled(&samples, FS, 180.0, (180.0, 260.0))
}

fn flute_tone() -> PartialCollection {
    let samples = harmonic_tone(330.0, &[0.4, 0.25, 0.15], 1.5, FS);
    analyze_to_distilled(&samples, FS, 270.0, (280.0, 380.0))
}

#[test]
fn morph_tracks_between_the_sources() {
    let mut a = reed_tone();
    let mut b = flute_tone();

    assert!(a.is_distilled());
    assert!(b.is_distilled());
    let fund_a = labeled(&a, 1).expect("reed fundamental labeled 1");
    let fund_b = labeled(&b, 1).expect("flute fundamental labeled 1");
    let mean_a = mean_frequency(fund_a);
    let mean_b = mean_frequency(fund_b);
    assert!((mean_a - 220.0).abs() < 8.0, "reed fundamental at {mean_a}");
    assert!((mean_b - 330.0).abs() < 8.0, "flute fundamental at {mean_b}");

    // Stretch both sounds onto a common 2.2 s timeline.
    dilate(&mut a, &TimeMap::from_anchors([(1.2, 2.2)]).unwrap());
    dilate(&mut b, &TimeMap::from_anchors([(1.5, 2.2)]).unwrap());

    // Fully the reed until 0.6 s, fully the flute from 2.0 s on.
    let weight = Envelope::from_points([(0.6, 0.0), (2.0, 1.0)]).unwrap();
    let morphed = Morpher::uniform(weight).morph(&a, &b).unwrap();

    // Label conservation: the union of the sources' labels, nothing else.
    let mut expected = a.labels();
    expected.extend(b.labels());
    assert_eq!(morphed.labels(), expected);

    // The morphed fundamental sweeps from the reed's pitch to the
    // flute's, so its average lies strictly between the two.
    let fund_m = labeled(&morphed, 1).expect("morph keeps label 1");
    let mean_m = mean_frequency(fund_m);
    assert!(
        mean_m > mean_a && mean_m < mean_b,
        "morph mean {mean_m} outside ({mean_a}, {mean_b})"
    );

    // The morph covers both sources end to end. (The exact boundary law
    // is exercised in the property tests with mid-range weights; here the
    // weight sits at exactly 0 before 0.6 s, so fully-silent flute
    // breakpoints near its onset are legitimately dropped.)
    let a_span = labeled(&a, 1).unwrap().span().unwrap();
    let b_span = labeled(&b, 1).unwrap().span().unwrap();
    let (m_start, m_end) = fund_m.span().unwrap();
    assert!(m_start <= a_span.0.min(b_span.0) + 0.02);
    assert!(m_end >= a_span.1.max(b_span.1) - 0.02);

    // And the result renders.
    let samples = Synthesizer::new(FS).unwrap().render(&morphed);
    assert!(samples.len() as f64 / FS > 2.0);
    assert!(samples.iter().any(|&s| s.abs() > 1e-3));
    assert!(samples.iter().all(|s| s.is_finite()));
}

#[test]
fn pitch_shift_moves_the_fundamental() {
    let mut a = reed_tone();
    let before = mean_frequency(labeled(&a, 1).unwrap());
    shift_pitch_by(&mut a, -600.0);
    let after = mean_frequency(labeled(&a, 1).unwrap());
    let ratio = after / before;
    let expected = (-600.0f64 / 1200.0).exp2();
    assert!(
        (ratio - expected).abs() < 1e-9,
        "shift ratio {ratio} vs {expected}"
    );
}

#[test]
fn disjoint_label_morph_fades_both_sources() {
    let mut a = reed_tone();
    let mut b = flute_tone();
    // Force the label sets apart.
    for p in a.iter_mut() {
        if p.label() != 0 {
            p.set_label(p.label() * 2 - 1); // odd labels
        }
    }
    for p in b.iter_mut() {
        if p.label() != 0 {
            p.set_label(p.label() * 2); // even labels
        }
    }
    let weight = Envelope::constant(0.25);
    let morphed = Morpher::uniform(weight).morph(&a, &b).unwrap();

    let mut expected = a.labels();
    expected.extend(b.labels());
    assert_eq!(morphed.labels(), expected);

    // Every output partial is its source scaled by the fade weight,
    // never passed through unscaled.
    let sources = a.by_label();
    for partial in &morphed {
        let label = partial.label();
        if label % 2 == 1 {
            let source = sources[&label][0];
            for bp in partial.points() {
                let expect = source.amplitude_at(bp.time) * 0.75;
                assert!(
                    (bp.amplitude - expect).abs() < 1e-9,
                    "label {label} at t={} not faded",
                    bp.time
                );
            }
        }
    }
}
