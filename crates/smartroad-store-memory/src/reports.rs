//! [`MemoryReportStore`]: the in-memory implementation of [`ReportStore`].

use std::{collections::VecDeque, sync::Arc};

use chrono::Utc;
use smartroad_core::{
  Error, Result,
  principal::PrincipalId,
  report::{Report, ReportId, Status, TransitionPolicy},
  store::{ReportFilter, ReportStore},
};
use tokio::sync::RwLock;

/// Newest-first collection of reports.
///
/// Cloning is cheap: clones share the same collection.
#[derive(Clone, Default)]
pub struct MemoryReportStore {
  reports: Arc<RwLock<VecDeque<Report>>>,
  policy:  TransitionPolicy,
}

impl MemoryReportStore {
  pub fn new(policy: TransitionPolicy) -> Self {
    Self { reports: Arc::default(), policy }
  }

  /// Start with an initial working set, given newest first.
  pub fn with_reports(policy: TransitionPolicy, reports: Vec<Report>) -> Self {
    Self {
      reports: Arc::new(RwLock::new(reports.into())),
      policy,
    }
  }

  pub fn policy(&self) -> TransitionPolicy { self.policy }

  async fn collect(&self, pred: impl Fn(&Report) -> bool) -> Vec<Report> {
    self
      .reports
      .read()
      .await
      .iter()
      .filter(|r| pred(r))
      .cloned()
      .collect()
  }
}

impl ReportStore for MemoryReportStore {
  type Error = Error;

  async fn add_report(&self, report: Report) -> Result<Report> {
    let mut reports = self.reports.write().await;
    if reports.iter().any(|r| r.id == report.id) {
      return Err(Error::DuplicateReport(report.id));
    }
    tracing::info!(
      id = %report.id,
      user = %report.user_id,
      severity = %report.ai_result.severity,
      "report added"
    );
    reports.push_front(report.clone());
    Ok(report)
  }

  async fn get_report(&self, id: &ReportId) -> Result<Option<Report>> {
    Ok(self.reports.read().await.iter().find(|r| &r.id == id).cloned())
  }

  async fn update_status(&self, id: &ReportId, status: Status) -> Result<Report> {
    let mut reports = self.reports.write().await;
    let report = reports
      .iter_mut()
      .find(|r| &r.id == id)
      .ok_or_else(|| Error::ReportNotFound(id.clone()))?;

    let from = report.status;
    report.transition(self.policy, status, Utc::now())?;
    tracing::info!(%id, %from, to = %status, "report status changed");
    Ok(report.clone())
  }

  async fn reports_by_user(&self, user_id: &PrincipalId) -> Result<Vec<Report>> {
    Ok(self.collect(|r| &r.user_id == user_id).await)
  }

  async fn list(&self, filter: &ReportFilter) -> Result<Vec<Report>> {
    Ok(self.collect(|r| filter.matches(r)).await)
  }

  async fn all(&self) -> Result<Vec<Report>> {
    Ok(self.reports.read().await.iter().cloned().collect())
  }
}
