//! Error type for `smartroad-detect`.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
  #[error("invalid image reference: {0}")]
  InvalidImage(String),

  /// A newer analysis was started, or the pending one was cancelled.
  #[error("analysis superseded by a newer request")]
  Superseded,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
