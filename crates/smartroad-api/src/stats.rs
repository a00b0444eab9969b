//! Handlers for the derived views: `GET /stats` and `GET /markers`.

use axum::{
  Json,
  extract::{Query, State},
};
use serde::Deserialize;
use smartroad_core::{
  detection::Severity,
  stats::{self, DashboardStats, MapMarker},
  store::{ReportStore, SessionStore},
};

use crate::{AppState, error::ApiError};

/// `GET /stats`
pub async fn dashboard<R, S>(
  State(state): State<AppState<R, S>>,
) -> Result<Json<DashboardStats>, ApiError>
where
  R: ReportStore,
  S: SessionStore,
{
  let reports = state.reports.all().await.map_err(ApiError::from_store)?;
  Ok(Json(DashboardStats::compute(&reports)))
}

#[derive(Debug, Deserialize)]
pub struct MarkerParams {
  pub severity: Option<Severity>,
}

/// `GET /markers[?severity=…]`
pub async fn markers<R, S>(
  State(state): State<AppState<R, S>>,
  Query(params): Query<MarkerParams>,
) -> Result<Json<Vec<MapMarker>>, ApiError>
where
  R: ReportStore,
  S: SessionStore,
{
  let reports = state.reports.all().await.map_err(ApiError::from_store)?;
  Ok(Json(stats::markers(&reports, params.severity)))
}
