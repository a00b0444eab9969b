//! Derived views: dashboard aggregates and map markers.
//!
//! Pure functions over a snapshot of reports. Nothing here is stored; every
//! call recomputes from the slice it is given.

use serde::Serialize;

use crate::{
  detection::{Severity, round_tenth},
  report::{Report, ReportId, Status},
};

/// Number of reports per severity class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeverityCounts {
  pub minor:     usize,
  pub moderate:  usize,
  pub dangerous: usize,
}

impl SeverityCounts {
  pub fn get(&self, severity: Severity) -> usize {
    match severity {
      Severity::Minor => self.minor,
      Severity::Moderate => self.moderate,
      Severity::Dangerous => self.dangerous,
    }
  }

  fn bump(&mut self, severity: Severity) {
    match severity {
      Severity::Minor => self.minor += 1,
      Severity::Moderate => self.moderate += 1,
      Severity::Dangerous => self.dangerous += 1,
    }
  }
}

/// Number of reports per handling status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
  pub reported:     usize,
  pub under_review: usize,
  pub in_progress:  usize,
  pub completed:    usize,
}

impl StatusCounts {
  pub fn get(&self, status: Status) -> usize {
    match status {
      Status::Reported => self.reported,
      Status::UnderReview => self.under_review,
      Status::InProgress => self.in_progress,
      Status::Completed => self.completed,
    }
  }

  fn bump(&mut self, status: Status) {
    match status {
      Status::Reported => self.reported += 1,
      Status::UnderReview => self.under_review += 1,
      Status::InProgress => self.in_progress += 1,
      Status::Completed => self.completed += 1,
    }
  }
}

/// Aggregates shown on the administrative dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
  pub total_reports: usize,
  /// Dangerous reports, regardless of status.
  pub high_priority: usize,
  /// Completed reports.
  pub resolved:      usize,
  /// Reported or under review.
  pub pending:       usize,
  /// Mean detection confidence, one decimal; `0.0` for an empty snapshot.
  pub ai_accuracy:   f64,
  pub by_severity:   SeverityCounts,
  pub by_status:     StatusCounts,
}

impl DashboardStats {
  pub fn compute(reports: &[Report]) -> Self {
    let mut by_severity = SeverityCounts::default();
    let mut by_status = StatusCounts::default();
    let mut confidence_sum = 0.0;

    for r in reports {
      by_severity.bump(r.ai_result.severity);
      by_status.bump(r.status);
      confidence_sum += r.ai_result.confidence;
    }

    let ai_accuracy = if reports.is_empty() {
      0.0
    } else {
      round_tenth(confidence_sum / reports.len() as f64)
    };

    Self {
      total_reports: reports.len(),
      high_priority: by_severity.dangerous,
      resolved: by_status.completed,
      pending: by_status.reported + by_status.under_review,
      ai_accuracy,
      by_severity,
      by_status,
    }
  }
}

/// What the map layer needs to plot one report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapMarker {
  pub id:           ReportId,
  pub lat:          f64,
  pub lng:          f64,
  pub address:      String,
  pub severity:     Severity,
  pub status:       Status,
  pub confidence:   f64,
  pub color:        &'static str,
  pub status_label: &'static str,
}

impl From<&Report> for MapMarker {
  fn from(r: &Report) -> Self {
    Self {
      id:           r.id.clone(),
      lat:          r.location.lat,
      lng:          r.location.lng,
      address:      r.location.address.clone(),
      severity:     r.ai_result.severity,
      status:       r.status,
      confidence:   r.ai_result.confidence,
      color:        r.ai_result.severity.color(),
      status_label: r.status.label(),
    }
  }
}

/// Markers for every report, optionally restricted to one severity.
pub fn markers(reports: &[Report], severity: Option<Severity>) -> Vec<MapMarker> {
  reports
    .iter()
    .filter(|r| severity.is_none_or(|s| r.ai_result.severity == s))
    .map(MapMarker::from)
    .collect()
}

#[cfg(test)]
mod tests {
  use chrono::Utc;
  use strum::IntoEnumIterator;

  use super::*;
  use crate::{
    detection::{BoundingBox, DetectionResult},
    report::{Coords, Submission, TransitionPolicy},
  };

  fn report(width: f64, height: f64, confidence: f64, status: Status) -> Report {
    let mut r = Report::submit(
      Submission {
        image_url:   "https://img.example/x.jpg".into(),
        description: String::new(),
        ai_result:   DetectionResult::new(
          confidence,
          BoundingBox { x: 60.0, y: 40.0, width, height },
          true,
        ),
        coords:      Some(Coords { lat: 33.7, lng: 73.0 }),
        address:     None,
      },
      None,
      Utc::now(),
    )
    .unwrap();
    r.transition(TransitionPolicy::Permissive, status, Utc::now()).unwrap();
    r
  }

  fn sample() -> Vec<Report> {
    vec![
      report(200.0, 150.0, 95.0, Status::Reported),    // dangerous
      report(150.0, 150.0, 90.0, Status::Completed),   // dangerous
      report(120.0, 100.0, 80.0, Status::UnderReview), // moderate
      report(90.0, 70.0, 75.0, Status::InProgress),    // minor
    ]
  }

  #[test]
  fn empty_snapshot() {
    let stats = DashboardStats::compute(&[]);
    assert_eq!(stats, DashboardStats::default());
  }

  #[test]
  fn aggregates() {
    let stats = DashboardStats::compute(&sample());
    assert_eq!(stats.total_reports, 4);
    assert_eq!(stats.high_priority, 2);
    assert_eq!(stats.resolved, 1);
    assert_eq!(stats.pending, 2);
    assert_eq!(stats.ai_accuracy, 85.0);
    assert_eq!(stats.by_severity.moderate, 1);
    assert_eq!(stats.by_status.in_progress, 1);
  }

  #[test]
  fn high_priority_counts_dangerous_regardless_of_status() {
    let reports = sample();
    let stats = DashboardStats::compute(&reports);
    let dangerous = reports
      .iter()
      .filter(|r| r.ai_result.severity == Severity::Dangerous)
      .count();
    assert_eq!(stats.high_priority, dangerous);
  }

  #[test]
  fn breakdowns_sum_to_total() {
    let stats = DashboardStats::compute(&sample());
    let sev: usize = Severity::iter().map(|s| stats.by_severity.get(s)).sum();
    let st: usize = Status::iter().map(|s| stats.by_status.get(s)).sum();
    assert_eq!(sev, stats.total_reports);
    assert_eq!(st, stats.total_reports);
  }

  #[test]
  fn markers_carry_colour_and_label() {
    let reports = sample();
    let all = markers(&reports, None);
    assert_eq!(all.len(), 4);
    assert_eq!(all[0].color, "#ef4444");
    assert_eq!(all[2].status_label, "Under Review");

    let minor = markers(&reports, Some(Severity::Minor));
    assert_eq!(minor.len(), 1);
    assert_eq!(minor[0].color, "#22c55e");
  }
}
