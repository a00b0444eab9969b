//! Core types for SmartRoad: reports, principals, detection results, the
//! store traits, and the derived dashboard views.
//!
//! No HTTP, storage, or runtime dependencies live here.

// Store impls use `async fn`; the trait signatures spell out `Send` futures.
#![allow(async_fn_in_trait)]

pub mod detection;
pub mod error;
pub mod principal;
pub mod report;
pub mod stats;
pub mod store;

pub use error::{Error, Result};
