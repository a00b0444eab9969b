//! The `ReportStore` and `SessionStore` traits and supporting query types.
//!
//! The traits are implemented by storage backends (e.g.
//! `smartroad-store-memory`). Higher layers (`smartroad-api`,
//! `smartroad-server`) depend on these abstractions, not on any concrete
//! backend.

use std::future::Future;

use crate::{
  detection::Severity,
  principal::{AuthResult, Principal, PrincipalId, Role},
  report::{Report, ReportId, Status},
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Parameters for [`ReportStore::list`]. Unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct ReportFilter {
  pub user_id:  Option<PrincipalId>,
  pub severity: Option<Severity>,
  pub status:   Option<Status>,
  /// Case-insensitive substring match against the report id or address.
  pub text:     Option<String>,
}

impl ReportFilter {
  pub fn matches(&self, report: &Report) -> bool {
    if let Some(user_id) = &self.user_id
      && &report.user_id != user_id
    {
      return false;
    }
    if let Some(severity) = self.severity
      && report.ai_result.severity != severity
    {
      return false;
    }
    if let Some(status) = self.status
      && report.status != status
    {
      return false;
    }
    if let Some(text) = self.text.as_deref().map(str::trim)
      && !text.is_empty()
    {
      let needle = text.to_lowercase();
      return report.id.as_str().to_lowercase().contains(&needle)
        || report.location.address.to_lowercase().contains(&needle);
    }
    true
  }
}

// ─── Reports ─────────────────────────────────────────────────────────────────

/// Abstraction over the report collection.
///
/// Reports are never removed. Retrieval order is most-recent-insertion first;
/// it is determined by insertion, not by `created_at`.
pub trait ReportStore: Send + Sync {
  type Error: std::error::Error + Into<crate::Error> + Send + Sync + 'static;

  /// Insert a fully-formed report. Fails if the id is already present.
  fn add_report(
    &self,
    report: Report,
  ) -> impl Future<Output = Result<Report, Self::Error>> + Send + '_;

  /// Retrieve a report by id. Returns `None` if not found.
  fn get_report<'a>(
    &'a self,
    id: &'a ReportId,
  ) -> impl Future<Output = Result<Option<Report>, Self::Error>> + Send + 'a;

  /// Replace the status of a report and refresh its `updated_at`.
  ///
  /// Returns an error, leaving the store unchanged, if the id is unknown or
  /// the store's transition policy rejects the change.
  fn update_status<'a>(
    &'a self,
    id: &'a ReportId,
    status: Status,
  ) -> impl Future<Output = Result<Report, Self::Error>> + Send + 'a;

  /// All reports owned by `user_id`, in store order.
  fn reports_by_user<'a>(
    &'a self,
    user_id: &'a PrincipalId,
  ) -> impl Future<Output = Result<Vec<Report>, Self::Error>> + Send + 'a;

  /// All reports matching `filter`, in store order.
  fn list<'a>(
    &'a self,
    filter: &'a ReportFilter,
  ) -> impl Future<Output = Result<Vec<Report>, Self::Error>> + Send + 'a;

  /// A snapshot of the whole collection, in store order.
  fn all(&self) -> impl Future<Output = Result<Vec<Report>, Self::Error>> + Send + '_;
}

// ─── Sessions ────────────────────────────────────────────────────────────────

/// Holds at most one authenticated principal.
pub trait SessionStore: Send + Sync {
  type Error: std::error::Error + Into<crate::Error> + Send + Sync + 'static;

  /// Check credentials and, on success, activate the matching principal.
  fn sign_in<'a>(
    &'a self,
    email: &'a str,
    password: &'a str,
  ) -> impl Future<Output = Result<AuthResult, Self::Error>> + Send + 'a;

  /// Create and activate a new principal.
  fn sign_up<'a>(
    &'a self,
    name: &'a str,
    email: &'a str,
    password: &'a str,
    role: Role,
  ) -> impl Future<Output = Result<AuthResult, Self::Error>> + Send + 'a;

  /// Clear the active principal. Idempotent.
  fn sign_out(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Activate the administrator without checking credentials, where the
  /// backend allows it.
  fn sign_in_as_admin(
    &self,
  ) -> impl Future<Output = Result<AuthResult, Self::Error>> + Send + '_;

  /// The active principal, if any.
  fn current(
    &self,
  ) -> impl Future<Output = Result<Option<Principal>, Self::Error>> + Send + '_;
}
