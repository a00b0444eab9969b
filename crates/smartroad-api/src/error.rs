//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("unauthorized: {0}")]
  Unauthorized(String),

  #[error("forbidden: {0}")]
  Forbidden(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("too many requests: {0}")]
  TooManyRequests(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Convert any store error through the core error taxonomy.
  pub fn from_store<E: Into<smartroad_core::Error>>(e: E) -> Self {
    let core: smartroad_core::Error = e.into();
    core.into()
  }
}

impl From<smartroad_core::Error> for ApiError {
  fn from(e: smartroad_core::Error) -> Self {
    use smartroad_core::Error as E;
    match e {
      E::ReportNotFound(_) => Self::NotFound(e.to_string()),
      E::DuplicateReport(_) | E::InvalidTransition { .. } => Self::Conflict(e.to_string()),
      E::InvalidConfidence(_)
      | E::InvalidBoundingBox(_)
      | E::InconsistentSeverity { .. }
      | E::MissingImage => Self::BadRequest(e.to_string()),
      E::Credentials(_) => Self::Store(Box::new(e)),
    }
  }
}

impl From<smartroad_detect::Error> for ApiError {
  fn from(e: smartroad_detect::Error) -> Self {
    match e {
      smartroad_detect::Error::InvalidImage(_) => Self::BadRequest(e.to_string()),
      smartroad_detect::Error::Superseded => Self::Conflict(e.to_string()),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, m.clone()),
      ApiError::Forbidden(m) => (StatusCode::FORBIDDEN, m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::TooManyRequests(m) => (StatusCode::TOO_MANY_REQUESTS, m.clone()),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store failure");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
