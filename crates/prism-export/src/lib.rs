//! File I/O for the Prism sound-modeling toolkit.
//!
//! Three independent surfaces:
//!
//! - [`wav`]: mono sample buffers to and from WAV files. The rest of the
//!   toolkit never sees a disk format.
//! - [`archive`]: the lossless partial interchange format, a bit-exact
//!   round trip of every breakpoint and label.
//! - [`bank`]: the lossy frame-bank format for fully channelized and
//!   distilled sounds; export fails, writing nothing, if the collection
//!   still has label collisions or unlabeled noise.

pub mod archive;
pub mod bank;
pub mod error;
pub mod wav;

pub use archive::{load_archive, read_archive, save_archive, write_archive};
pub use bank::{load_bank, read_bank, save_bank, write_bank, DEFAULT_FRAME_TIME};
pub use error::{ExportError, Result};
pub use wav::{read_wav, write_wav, SampleBuffer, WavEncoding};
