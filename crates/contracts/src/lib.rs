//! # Contracts
//!
//! Frozen interface contracts shared by the camera module crates.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Time Model
//! - Wall-clock UTC (`chrono::DateTime<Utc>`), read by callers, never by renderers
//! - Timestamps in labels and source names use RFC 3339 with nanoseconds

mod camera;
mod error;
mod resource;
mod sensor;
mod stream;

pub use camera::*;
pub use error::*;
pub use resource::*;
pub use sensor::*;
pub use stream::{LocalMediaStream, MediaStream};
