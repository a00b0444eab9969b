//! Handlers for `/detections`.
//!
//! `POST` holds the request open for the simulated processing interval. If
//! another `POST` (a replacement upload) or a `DELETE` arrives first, the
//! earlier request answers 409.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use smartroad_core::{
  detection::DetectionResult,
  store::{ReportStore, SessionStore},
};
use smartroad_detect::ImageRef;

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct AnalyzeBody {
  /// A `data:image/…;base64,` URI or an `http(s)://` URL.
  pub image: String,
}

/// `POST /detections`
pub async fn analyze<R, S>(
  State(state): State<AppState<R, S>>,
  Json(body): Json<AnalyzeBody>,
) -> Result<Json<DetectionResult>, ApiError>
where
  R: ReportStore,
  S: SessionStore,
{
  let image = ImageRef::parse(body.image)?;
  let result = state.detector.analyze(&image).await?;
  Ok(Json(result))
}

/// `DELETE /detections`: abandon the pending analysis, if any.
pub async fn cancel<R, S>(State(state): State<AppState<R, S>>) -> StatusCode
where
  R: ReportStore,
  S: SessionStore,
{
  state.detector.cancel();
  StatusCode::NO_CONTENT
}
