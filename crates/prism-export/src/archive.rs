//! The lossless partial archive.
//!
//! A chunk of little-endian binary: magic, format version, then every
//! partial's label and full-precision breakpoint records. Round-trips a
//! collection bit-exactly, including labels, so it is the interchange
//! format between pipeline stages and across machines.

use crate::error::{ExportError, Result};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use log::debug;
use prism_core::{Breakpoint, Partial, PartialCollection};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

const MAGIC: [u8; 4] = *b"PRSM";
const VERSION: u32 = 1;

/// Write a collection to an archive stream.
pub fn write_archive<W: Write>(mut w: W, collection: &PartialCollection) -> Result<()> {
    if collection.is_empty() {
        return Err(ExportError::EmptyCollection);
    }
    w.write_all(&MAGIC)?;
    w.write_u32::<LittleEndian>(VERSION)?;
    w.write_u64::<LittleEndian>(collection.len() as u64)?;
    for partial in collection {
        w.write_u32::<LittleEndian>(partial.label())?;
        w.write_u64::<LittleEndian>(partial.len() as u64)?;
        for bp in partial.points() {
            w.write_f64::<LittleEndian>(bp.time)?;
            w.write_f64::<LittleEndian>(bp.frequency)?;
            w.write_f64::<LittleEndian>(bp.amplitude)?;
            w.write_f64::<LittleEndian>(bp.bandwidth)?;
            w.write_f64::<LittleEndian>(bp.phase)?;
        }
    }
    Ok(())
}

/// Read a collection from an archive stream.
pub fn read_archive<R: Read>(mut r: R) -> Result<PartialCollection> {
    let mut magic = [0u8; 4];
    r.read_exact(&mut magic)?;
    if magic != MAGIC {
        return Err(ExportError::Malformed("bad magic".into()));
    }
    let version = r.read_u32::<LittleEndian>()?;
    if version != VERSION {
        return Err(ExportError::UnsupportedVersion(version));
    }
    let partial_count = r.read_u64::<LittleEndian>()?;

    let mut collection = PartialCollection::new();
    for _ in 0..partial_count {
        let label = r.read_u32::<LittleEndian>()?;
        let point_count = r.read_u64::<LittleEndian>()?;
        let mut partial = Partial::with_label(label);
        let mut prev_time = f64::NEG_INFINITY;
        for _ in 0..point_count {
            let time = r.read_f64::<LittleEndian>()?;
            let frequency = r.read_f64::<LittleEndian>()?;
            let amplitude = r.read_f64::<LittleEndian>()?;
            let bandwidth = r.read_f64::<LittleEndian>()?;
            let phase = r.read_f64::<LittleEndian>()?;
            let bp = Breakpoint {
                time,
                frequency,
                amplitude,
                bandwidth,
                phase,
            };
            if !bp.is_finite() {
                return Err(ExportError::Malformed(format!(
                    "non-finite breakpoint at t={time}"
                )));
            }
            if time <= prev_time {
                return Err(ExportError::Malformed(format!(
                    "breakpoint times not strictly increasing at t={time}"
                )));
            }
            prev_time = time;
            partial.insert(bp);
        }
        collection.push(partial);
    }
    Ok(collection)
}

/// Write a collection to an archive file.
pub fn save_archive(path: impl AsRef<Path>, collection: &PartialCollection) -> Result<()> {
    let file = File::create(path.as_ref())?;
    write_archive(BufWriter::new(file), collection)?;
    debug!(
        "archived {} partials to {:?}",
        collection.len(),
        path.as_ref()
    );
    Ok(())
}

/// Read a collection from an archive file.
pub fn load_archive(path: impl AsRef<Path>) -> Result<PartialCollection> {
    let file = File::open(path.as_ref())?;
    let collection = read_archive(BufReader::new(file))?;
    debug!(
        "loaded {} partials from {:?}",
        collection.len(),
        path.as_ref()
    );
    Ok(collection)
}
