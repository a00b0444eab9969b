//! Handlers for `/session` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/session` | 401 if signed out |
//! | `POST`   | `/session/sign-in` | Body: `{"email":"…","password":"…"}` |
//! | `POST`   | `/session/sign-up` | Body: `{"name":"…","email":"…","password":"…","role":"citizen"}` |
//! | `POST`   | `/session/admin` | Administrative entry point, no credentials; 403 in strict mode |
//! | `DELETE` | `/session` | Idempotent |

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use smartroad_core::{
  principal::{AuthResult, Principal, Role},
  store::{ReportStore, SessionStore},
};

use crate::{AppState, error::ApiError};

fn into_principal(result: AuthResult) -> Result<Principal, ApiError> {
  match result {
    AuthResult::Authenticated(p) => Ok(p),
    AuthResult::InvalidCredentials => Err(ApiError::Unauthorized("invalid credentials".into())),
    AuthResult::RateLimited => {
      Err(ApiError::TooManyRequests("too many failed sign-in attempts".into()))
    }
    AuthResult::EmailTaken => Err(ApiError::Conflict("email is already registered".into())),
    AuthResult::Forbidden => {
      Err(ApiError::Forbidden("administrator access requires credentials".into()))
    }
  }
}

/// `GET /session`
pub async fn current<R, S>(State(state): State<AppState<R, S>>) -> Result<Json<Principal>, ApiError>
where
  R: ReportStore,
  S: SessionStore,
{
  Ok(Json(state.principal().await?))
}

// ─── Sign in ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SignInBody {
  pub email:    String,
  pub password: String,
}

/// `POST /session/sign-in`
pub async fn sign_in<R, S>(
  State(state): State<AppState<R, S>>,
  Json(body): Json<SignInBody>,
) -> Result<Json<Principal>, ApiError>
where
  R: ReportStore,
  S: SessionStore,
{
  let result = state
    .sessions
    .sign_in(&body.email, &body.password)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(into_principal(result)?))
}

// ─── Sign up ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SignUpBody {
  pub name:     String,
  pub email:    String,
  pub password: String,
  #[serde(default)]
  pub role:     Role,
}

/// `POST /session/sign-up`: returns 201 + the new principal.
pub async fn sign_up<R, S>(
  State(state): State<AppState<R, S>>,
  Json(body): Json<SignUpBody>,
) -> Result<impl IntoResponse, ApiError>
where
  R: ReportStore,
  S: SessionStore,
{
  if body.name.trim().is_empty() || body.email.trim().is_empty() {
    return Err(ApiError::BadRequest("name and email are required".into()));
  }
  let result = state
    .sessions
    .sign_up(&body.name, &body.email, &body.password, body.role)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(into_principal(result)?)))
}

// ─── Admin shortcut / sign out ────────────────────────────────────────────────

/// `POST /session/admin`
pub async fn admin<R, S>(State(state): State<AppState<R, S>>) -> Result<Json<Principal>, ApiError>
where
  R: ReportStore,
  S: SessionStore,
{
  let result = state
    .sessions
    .sign_in_as_admin()
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(into_principal(result)?))
}

/// `DELETE /session`
pub async fn sign_out<R, S>(State(state): State<AppState<R, S>>) -> Result<StatusCode, ApiError>
where
  R: ReportStore,
  S: SessionStore,
{
  state.sessions.sign_out().await.map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}
