//! Partial transformations for the Prism sound-modeling toolkit.
//!
//! Every stage here is a pure transformation over an owned
//! [`PartialCollection`](prism_core::PartialCollection): channelization
//! labels partials against a reference-frequency envelope, distillation
//! collapses each label to one continuous partial, pitch shifting and
//! dilation reshape frequency and time, and morphing cross-fades two
//! distilled sounds into a third. Stages share no state and are
//! internally parallel across partials or labels.
//!
//! The canonical pipeline:
//!
//! ```text
//! analyze -> channelize -> distill -> { shift | dilate } -> morph -> render
//! ```

pub mod channelize;
pub mod crop;
pub mod dilate;
pub mod distill;
pub mod error;
pub mod morph;
pub mod shift;

pub use channelize::{channelize, Channelizer};
pub use crop::crop;
pub use dilate::dilate;
pub use distill::{distill, Distiller};
pub use error::{Result, TransformError};
pub use morph::{morph, AmplitudeBlend, Morpher};
pub use shift::{shift_pitch, shift_pitch_by};
