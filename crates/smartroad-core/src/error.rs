//! Error types for `smartroad-core`.

use thiserror::Error;

use crate::report::{ReportId, Status};

#[derive(Debug, Error)]
pub enum Error {
  #[error("report not found: {0}")]
  ReportNotFound(ReportId),

  #[error("report {0} already exists")]
  DuplicateReport(ReportId),

  #[error("status transition {from} -> {to} is not allowed")]
  InvalidTransition { from: Status, to: Status },

  #[error("confidence {0} is outside 0..=100")]
  InvalidConfidence(f64),

  #[error("severity {stated} does not match bounding box area {area}")]
  InconsistentSeverity {
    stated: crate::detection::Severity,
    area:   f64,
  },

  #[error("invalid bounding box: {0}")]
  InvalidBoundingBox(String),

  #[error("report has no image reference")]
  MissingImage,

  #[error("credential error: {0}")]
  Credentials(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
