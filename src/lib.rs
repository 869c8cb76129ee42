//! Prism: analysis, transformation, morphing, and resynthesis of
//! recorded tones as bandwidth-enhanced partials.
//!
//! This umbrella crate re-exports the subsystem crates:
//!
//! - [`model`]: breakpoints, partials, collections, envelopes, time maps
//! - [`analysis`]: spectral analysis into unlabeled partials
//! - [`transform`]: channelize, distill, shift, dilate, morph
//! - [`synth`]: the bandwidth-enhanced additive renderer
//! - [`export`]: WAV I/O and the two partial file formats
//!
//! The canonical two-sound morph pipeline:
//!
//! ```no_run
//! use prism::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let tone_a = read_wav("clarinet.wav")?;
//! let tone_b = read_wav("flute.wav")?;
//!
//! let analyzer = Analyzer::new(AnalyzerConfig::new(330.0))?
//!     .estimate_fundamental(350.0, 500.0)?;
//! let (mut a, fund_a) = analyzer
//!     .analyze(&tone_a.samples, tone_a.sample_rate as f64)?
//!     .into_parts();
//! let fund_a = fund_a.expect("fundamental requested");
//!
//! channelize(&mut a, &fund_a, 1)?;
//! distill(&mut a)?;
//! # let mut b = a.clone();
//! // ... analyze, channelize, and distill `b` the same way, then:
//! let weight = Envelope::from_points([(0.6, 0.0), (2.0, 1.0)])?;
//! let morphed = Morpher::uniform(weight).morph(&a, &b)?;
//!
//! let samples = Synthesizer::new(44100.0)?.render(&morphed);
//! write_wav(
//!     "morph.wav",
//!     &SampleBuffer::new(samples, 44100),
//!     WavEncoding::Int16,
//! )?;
//! # Ok(())
//! # }
//! ```

pub use prism_analysis as analysis;
pub use prism_core as model;
pub use prism_export as export;
pub use prism_synth as synth;
pub use prism_transform as transform;

/// The common surface of the toolkit in one import.
pub mod prelude {
    pub use crate::analysis::{Analysis, Analyzer, AnalyzerConfig};
    pub use crate::export::{
        load_archive, load_bank, read_wav, save_archive, save_bank, write_wav, SampleBuffer,
        WavEncoding,
    };
    pub use crate::model::{Breakpoint, Envelope, Partial, PartialCollection, TimeMap};
    pub use crate::synth::Synthesizer;
    pub use crate::transform::{
        channelize, crop, dilate, distill, morph, shift_pitch, shift_pitch_by, AmplitudeBlend,
        Channelizer, Distiller, Morpher,
    };
}
