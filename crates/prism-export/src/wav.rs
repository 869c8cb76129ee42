//! WAV sample-file I/O.
//!
//! The rest of the toolkit works on plain sample buffers and never
//! touches disk formats; this module is the only place WAV details live.

use crate::error::{ExportError, Result};
use log::debug;
use std::path::Path;

/// A mono sample buffer with its sample rate.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    /// Samples, nominally in `[-1, 1]`.
    pub samples: Vec<f64>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

impl SampleBuffer {
    /// Wrap samples with their rate.
    pub fn new(samples: Vec<f64>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when there are no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.samples.len() as f64 / f64::from(self.sample_rate)
    }
}

/// Output sample encodings for [`write_wav`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WavEncoding {
    /// 16-bit signed integer PCM, clamped to full scale.
    #[default]
    Int16,
    /// 32-bit float PCM.
    Float32,
}

/// Read a WAV file into a mono [`SampleBuffer`].
///
/// 16/24/32-bit integer and 32-bit float files are accepted; multichannel
/// files are downmixed by averaging.
pub fn read_wav(path: impl AsRef<Path>) -> Result<SampleBuffer> {
    let mut reader = hound::WavReader::open(path.as_ref())?;
    let spec = reader.spec();
    let channels = usize::from(spec.channels.max(1));

    let interleaved: Vec<f64> = match (spec.sample_format, spec.bits_per_sample) {
        (hound::SampleFormat::Float, 32) => reader
            .samples::<f32>()
            .map(|s| s.map(f64::from))
            .collect::<std::result::Result<_, _>>()?,
        (hound::SampleFormat::Int, bits @ (16 | 24 | 32)) => {
            let scale = f64::from(1u32 << (bits - 1));
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| f64::from(v) / scale))
                .collect::<std::result::Result<_, _>>()?
        }
        (format, bits) => {
            return Err(ExportError::UnsupportedFormat(format!(
                "{bits}-bit {format:?} WAV"
            )))
        }
    };

    let samples: Vec<f64> = interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f64>() / channels as f64)
        .collect();
    debug!(
        "read {} samples ({} channels downmixed) at {} Hz from {:?}",
        samples.len(),
        channels,
        spec.sample_rate,
        path.as_ref()
    );
    Ok(SampleBuffer::new(samples, spec.sample_rate))
}

/// Write a mono [`SampleBuffer`] as a WAV file.
pub fn write_wav(
    path: impl AsRef<Path>,
    buffer: &SampleBuffer,
    encoding: WavEncoding,
) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: buffer.sample_rate,
        bits_per_sample: match encoding {
            WavEncoding::Int16 => 16,
            WavEncoding::Float32 => 32,
        },
        sample_format: match encoding {
            WavEncoding::Int16 => hound::SampleFormat::Int,
            WavEncoding::Float32 => hound::SampleFormat::Float,
        },
    };
    let mut writer = hound::WavWriter::create(path.as_ref(), spec)?;
    match encoding {
        WavEncoding::Int16 => {
            for &s in &buffer.samples {
                let v = (s.clamp(-1.0, 1.0) * f64::from(i16::MAX)).round() as i16;
                writer.write_sample(v)?;
            }
        }
        WavEncoding::Float32 => {
            for &s in &buffer.samples {
                writer.write_sample(s as f32)?;
            }
        }
    }
    writer.finalize()?;
    debug!(
        "wrote {} samples at {} Hz to {:?}",
        buffer.len(),
        buffer.sample_rate,
        path.as_ref()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_round_trip_is_lossless_to_f32() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        let samples: Vec<f64> = (0..1000)
            .map(|i| (std::f64::consts::TAU * 440.0 * i as f64 / 44100.0).sin() * 0.5)
            .collect();
        let buffer = SampleBuffer::new(samples.clone(), 44100);
        write_wav(&path, &buffer, WavEncoding::Float32).unwrap();
        let back = read_wav(&path).unwrap();
        assert_eq!(back.sample_rate, 44100);
        assert_eq!(back.len(), samples.len());
        for (a, b) in samples.iter().zip(&back.samples) {
            assert!((a - b).abs() < 1e-7);
        }
    }

    #[test]
    fn int16_round_trip_is_accurate_to_quantization() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone16.wav");
        let samples: Vec<f64> = (0..500).map(|i| (i as f64 / 500.0) - 0.5).collect();
        let buffer = SampleBuffer::new(samples.clone(), 22050);
        write_wav(&path, &buffer, WavEncoding::Int16).unwrap();
        let back = read_wav(&path).unwrap();
        for (a, b) in samples.iter().zip(&back.samples) {
            assert!((a - b).abs() < 1.0 / 16000.0);
        }
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(
            read_wav("/nonexistent/nope.wav"),
            Err(ExportError::Io(_))
        ));
    }
}
