//! Handlers for `/reports` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/reports` | Optional `?user_id`, `severity`, `status`, `q` |
//! | `POST` | `/reports` | Body: [`Submission`]; returns 201 + stored report |
//! | `GET`  | `/reports/mine` | Reports of the active principal |
//! | `GET`  | `/reports/{id}` | 404 if not found |
//! | `POST` | `/reports/{id}/status` | Admin only. Body: `{"status":"in_progress"}` |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::Utc;
use serde::Deserialize;
use smartroad_core::{
  detection::Severity,
  principal::PrincipalId,
  report::{Report, ReportId, Status, Submission},
  store::{ReportFilter, ReportStore, SessionStore},
};
use smartroad_detect::ImageRef;

use crate::{AppState, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub user_id:  Option<PrincipalId>,
  pub severity: Option<Severity>,
  pub status:   Option<Status>,
  /// Free-text search over report id and address.
  pub q:        Option<String>,
}

impl From<ListParams> for ReportFilter {
  fn from(p: ListParams) -> Self {
    ReportFilter {
      user_id:  p.user_id,
      severity: p.severity,
      status:   p.status,
      text:     p.q,
    }
  }
}

/// `GET /reports[?user_id=…][&severity=…][&status=…][&q=…]`
pub async fn list<R, S>(
  State(state): State<AppState<R, S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Report>>, ApiError>
where
  R: ReportStore,
  S: SessionStore,
{
  let filter = ReportFilter::from(params);
  let reports = state.reports.list(&filter).await.map_err(ApiError::from_store)?;
  Ok(Json(reports))
}

/// `GET /reports/mine`
pub async fn mine<R, S>(State(state): State<AppState<R, S>>) -> Result<Json<Vec<Report>>, ApiError>
where
  R: ReportStore,
  S: SessionStore,
{
  let principal = state.principal().await?;
  let reports = state
    .reports
    .reports_by_user(&principal.id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(reports))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /reports/{id}`
pub async fn get_one<R, S>(
  State(state): State<AppState<R, S>>,
  Path(id): Path<ReportId>,
) -> Result<Json<Report>, ApiError>
where
  R: ReportStore,
  S: SessionStore,
{
  let report = state
    .reports
    .get_report(&id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("report {id} not found")))?;
  Ok(Json(report))
}

// ─── Submit ───────────────────────────────────────────────────────────────────

/// `POST /reports`: attributed to the active principal, or to `anon` when
/// signed out.
pub async fn submit<R, S>(
  State(state): State<AppState<R, S>>,
  Json(body): Json<Submission>,
) -> Result<impl IntoResponse, ApiError>
where
  R: ReportStore,
  S: SessionStore,
{
  ImageRef::parse(body.image_url.as_str())?;
  let author = state.sessions.current().await.map_err(ApiError::from_store)?;
  let report = Report::submit(body, author.as_ref(), Utc::now())?;
  let stored = state.reports.add_report(report).await.map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(stored)))
}

// ─── Status ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct StatusBody {
  pub status: Status,
}

/// `POST /reports/{id}/status`
pub async fn update_status<R, S>(
  State(state): State<AppState<R, S>>,
  Path(id): Path<ReportId>,
  Json(body): Json<StatusBody>,
) -> Result<Json<Report>, ApiError>
where
  R: ReportStore,
  S: SessionStore,
{
  state.admin().await?;
  let report = state
    .reports
    .update_status(&id, body.status)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(report))
}
