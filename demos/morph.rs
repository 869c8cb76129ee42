//! Two-tone morph demo: synthesize a reed-like and a flute-like tone,
//! analyze both, and cross-fade one into the other.
//!
//! ```bash
//! cargo run --example morph
//! ```
//!
//! Writes `reed.wav`, `flute.wav`, and `morph.wav` to the current
//! directory, plus a lossless `morph.prsm` archive of the morphed
//! partials.

use prism::prelude::*;
use std::error::Error;
use std::f64::consts::TAU;

const FS: f64 = 44100.0;

/// A steady harmonic tone with a short attack and release.
fn tone(f0: f64, amps: &[f64], seconds: f64) -> Vec<f64> {
    let n = (seconds * FS) as usize;
    (0..n)
        .map(|i| {
            let t = i as f64 / FS;
            let env = (t / 0.05).min(1.0) * ((seconds - t) / 0.1).clamp(0.0, 1.0);
            let sum: f64 = amps
                .iter()
                .enumerate()
                .map(|(h, a)| a * (TAU * f0 * (h + 1) as f64 * t).sin())
                .sum();
            env * sum
        })
        .collect()
}

fn analyze(
    samples: &[f64],
    resolution: f64,
    fundamental: (f64, f64),
) -> Result<PartialCollection, Box<dyn Error>> {
    let analyzer =
        Analyzer::new(AnalyzerConfig::new(resolution))?.estimate_fundamental(fundamental.0, fundamental.1)?;
    let (mut partials, reference) = analyzer.analyze(samples, FS)?.into_parts();
    let reference = reference.expect("fundamental estimation requested");
    println!(
        "  {} raw partials, fundamental near {:.1} Hz",
        partials.len(),
        reference.value_at(0.5)
    );
    channelize(&mut partials, &reference, 1)?;
    distill(&mut partials)?;
    println!("  {} distilled partials", partials.len());
    Ok(partials)
}

fn main() -> Result<(), Box<dyn Error>> {
    println!("synthesizing source tones");
    let reed = tone(220.0, &[0.5, 0.3, 0.2, 0.1], 1.2);
    let flute = tone(330.0, &[0.45, 0.2, 0.08], 1.5);
    write_wav("reed.wav", &SampleBuffer::new(reed.clone(), FS as u32), WavEncoding::Int16)?;
    write_wav("flute.wav", &SampleBuffer::new(flute.clone(), FS as u32), WavEncoding::Int16)?;

    println!("analyzing reed");
    let mut a = analyze(&reed, 180.0, (180.0, 260.0))?;
    println!("analyzing flute");
    let mut b = analyze(&flute, 270.0, (280.0, 380.0))?;

    // Align both sounds on a common 2.2 s timeline before morphing.
    println!("dilating onto a common timeline");
    dilate(&mut a, &TimeMap::from_anchors([(1.2, 2.2)])?);
    dilate(&mut b, &TimeMap::from_anchors([(1.5, 2.2)])?);

    // Fully the reed until 0.6 s, fully the flute from 2.0 s on.
    println!("morphing");
    let weight = Envelope::from_points([(0.6, 0.0), (2.0, 1.0)])?;
    let morphed = Morpher::uniform(weight).morph(&a, &b)?;
    println!("  {} morphed partials", morphed.len());
    save_archive("morph.prsm", &morphed)?;

    println!("rendering");
    let samples = Synthesizer::new(FS)?.render(&morphed);
    write_wav("morph.wav", &SampleBuffer::new(samples, FS as u32), WavEncoding::Int16)?;
    println!("wrote morph.wav");
    Ok(())
}
