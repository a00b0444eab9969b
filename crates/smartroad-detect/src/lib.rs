//! Synthetic pothole detection.
//!
//! [`Detector`] stands in for a real inference call: it waits a fixed
//! processing interval, then fabricates a confidence score and bounding box.
//! Only the most recently started analysis may produce a result; older
//! pending calls resolve with [`Error::Superseded`].

mod detector;
mod image;
mod verify;

pub mod error;

pub use detector::{Detector, PROCESSING_DELAY, sample_detection};
pub use error::{Error, Result};
pub use image::ImageRef;
pub use verify::{DEFAULT_CAPACITY, FingerprintVerifier, Verifier};
