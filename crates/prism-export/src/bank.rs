//! The lossy frame bank.
//!
//! A compact representation of a fully channelized and distilled sound:
//! one track per label, resampled onto a fixed frame grid as f32
//! `(frequency, amplitude, bandwidth)` triples. Phase is discarded, which
//! is what makes the format lossy. Export refuses collections that are
//! not distilled or still carry unlabeled noise partials; callers can
//! fall back to the lossless archive for those.

use crate::error::{ExportError, Result};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use log::debug;
use prism_core::{Breakpoint, Partial, PartialCollection};
use std::f64::consts::TAU;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

const MAGIC: [u8; 4] = *b"PRSB";
const VERSION: u32 = 1;

/// Default spacing of the bank's frame grid: 10 ms.
pub const DEFAULT_FRAME_TIME: f64 = 0.01;

/// Write a channelized, distilled collection to a bank stream.
pub fn write_bank<W: Write>(
    mut w: W,
    collection: &PartialCollection,
    frame_time: f64,
) -> Result<()> {
    if !frame_time.is_finite() || frame_time <= 0.0 {
        return Err(ExportError::InvalidFrameTime(frame_time));
    }
    if collection.is_empty() {
        return Err(ExportError::EmptyCollection);
    }
    if let Some((label, count)) = collection.find_label_collision() {
        return Err(ExportError::NotDistilled { label, count });
    }
    let unlabeled = collection.iter().filter(|p| p.label() == 0).count();
    if unlabeled > 0 {
        return Err(ExportError::UnresolvedNoise(unlabeled));
    }

    let tracks: Vec<&Partial> = collection.iter().filter(|p| !p.is_empty()).collect();
    w.write_all(&MAGIC)?;
    w.write_u32::<LittleEndian>(VERSION)?;
    w.write_f64::<LittleEndian>(frame_time)?;
    w.write_u32::<LittleEndian>(tracks.len() as u32)?;
    for partial in tracks {
        let (start, end) = partial.span().expect("empty tracks filtered out");
        let frames = ((end - start) / frame_time).ceil() as u64 + 1;
        w.write_u32::<LittleEndian>(partial.label())?;
        w.write_f64::<LittleEndian>(start)?;
        w.write_u64::<LittleEndian>(frames)?;
        for k in 0..frames {
            let t = (start + k as f64 * frame_time).min(end);
            w.write_f32::<LittleEndian>(partial.frequency_at(t) as f32)?;
            w.write_f32::<LittleEndian>(partial.amplitude_at(t) as f32)?;
            w.write_f32::<LittleEndian>(partial.bandwidth_at(t) as f32)?;
        }
    }
    Ok(())
}

/// Read a bank stream back into a collection.
///
/// Phases are reconstructed by integrating the frame frequencies from
/// zero at each track's start, so the result is phase-coherent but not
/// the original phase.
pub fn read_bank<R: Read>(mut r: R) -> Result<PartialCollection> {
    let mut magic = [0u8; 4];
    r.read_exact(&mut magic)?;
    if magic != MAGIC {
        return Err(ExportError::Malformed("bad magic".into()));
    }
    let version = r.read_u32::<LittleEndian>()?;
    if version != VERSION {
        return Err(ExportError::UnsupportedVersion(version));
    }
    let frame_time = r.read_f64::<LittleEndian>()?;
    if !frame_time.is_finite() || frame_time <= 0.0 {
        return Err(ExportError::Malformed(format!(
            "bad frame time {frame_time}"
        )));
    }
    let track_count = r.read_u32::<LittleEndian>()?;

    let mut collection = PartialCollection::new();
    for _ in 0..track_count {
        let label = r.read_u32::<LittleEndian>()?;
        let start = r.read_f64::<LittleEndian>()?;
        let frames = r.read_u64::<LittleEndian>()?;
        if frames == 0 || !start.is_finite() {
            return Err(ExportError::Malformed(format!(
                "bad track header for label {label}"
            )));
        }
        let mut partial = Partial::with_label(label);
        let mut phase = 0.0;
        let mut prev_frequency: Option<f64> = None;
        for k in 0..frames {
            let t = start + k as f64 * frame_time;
            let frequency = f64::from(r.read_f32::<LittleEndian>()?);
            let amplitude = f64::from(r.read_f32::<LittleEndian>()?);
            let bandwidth = f64::from(r.read_f32::<LittleEndian>()?);
            if let Some(prev) = prev_frequency {
                phase += TAU * 0.5 * (prev + frequency) * frame_time;
            }
            prev_frequency = Some(frequency);
            partial.insert(Breakpoint::new(t, frequency, amplitude, bandwidth, phase));
        }
        collection.push(partial);
    }
    Ok(collection)
}

/// Write a bank file; see [`write_bank`].
pub fn save_bank(
    path: impl AsRef<Path>,
    collection: &PartialCollection,
    frame_time: f64,
) -> Result<()> {
    // Validate into a buffer first so a failing collection never leaves a
    // partial file behind.
    let mut bytes = Vec::new();
    write_bank(&mut bytes, collection, frame_time)?;
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    writer.write_all(&bytes)?;
    writer.flush()?;
    debug!(
        "banked {} labels to {:?} at {} ms frames",
        collection.labels().len(),
        path.as_ref(),
        frame_time * 1e3
    );
    Ok(())
}

/// Read a bank file; see [`read_bank`].
pub fn load_bank(path: impl AsRef<Path>) -> Result<PartialCollection> {
    let file = File::open(path.as_ref())?;
    read_bank(BufReader::new(file))
}
