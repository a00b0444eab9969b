//! JSON REST API for SmartRoad.
//!
//! Exposes an axum [`Router`] backed by any [`ReportStore`] and
//! [`SessionStore`], plus the synthetic [`Detector`]. TLS and transport
//! concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", smartroad_api::api_router(state))
//! ```

pub mod detections;
pub mod error;
pub mod reports;
pub mod session;
pub mod stats;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use smartroad_core::{
  principal::Principal,
  store::{ReportStore, SessionStore},
};
use smartroad_detect::Detector;

pub use error::ApiError;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
pub struct AppState<R, S> {
  pub reports:  Arc<R>,
  pub sessions: Arc<S>,
  pub detector: Arc<Detector>,
}

impl<R, S> Clone for AppState<R, S> {
  fn clone(&self) -> Self {
    Self {
      reports:  self.reports.clone(),
      sessions: self.sessions.clone(),
      detector: self.detector.clone(),
    }
  }
}

impl<R: ReportStore, S: SessionStore> AppState<R, S> {
  pub fn new(reports: R, sessions: S, detector: Detector) -> Self {
    Self {
      reports:  Arc::new(reports),
      sessions: Arc::new(sessions),
      detector: Arc::new(detector),
    }
  }

  /// The active principal, or 401.
  pub async fn principal(&self) -> Result<Principal, ApiError> {
    self
      .sessions
      .current()
      .await
      .map_err(ApiError::from_store)?
      .ok_or_else(|| ApiError::Unauthorized("no active session".into()))
  }

  /// The active principal if it is an administrator; 401 or 403 otherwise.
  pub async fn admin(&self) -> Result<Principal, ApiError> {
    let principal = self.principal().await?;
    if !principal.is_admin() {
      return Err(ApiError::Forbidden(format!("{} is not an administrator", principal.id)));
    }
    Ok(principal)
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<R, S>(state: AppState<R, S>) -> Router<()>
where
  R: ReportStore + 'static,
  S: SessionStore + 'static,
{
  Router::new()
    // Session
    .route("/session", get(session::current::<R, S>).delete(session::sign_out::<R, S>))
    .route("/session/sign-in", post(session::sign_in::<R, S>))
    .route("/session/sign-up", post(session::sign_up::<R, S>))
    .route("/session/admin", post(session::admin::<R, S>))
    // Detection
    .route(
      "/detections",
      post(detections::analyze::<R, S>).delete(detections::cancel::<R, S>),
    )
    // Reports
    .route("/reports", get(reports::list::<R, S>).post(reports::submit::<R, S>))
    .route("/reports/mine", get(reports::mine::<R, S>))
    .route("/reports/{id}", get(reports::get_one::<R, S>))
    .route("/reports/{id}/status", post(reports::update_status::<R, S>))
    // Derived views
    .route("/stats", get(stats::dashboard::<R, S>))
    .route("/markers", get(stats::markers::<R, S>))
    .with_state(state)
}
