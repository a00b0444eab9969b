//! Reports: citizen-submitted records of road damage.
//!
//! A report is immutable except for its `status` and `updated_at`. The
//! embedded detection result and location never change after creation.

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use uuid::Uuid;

use crate::{
  Error, Result,
  detection::DetectionResult,
  principal::{Principal, PrincipalId},
};

// ─── Identity ────────────────────────────────────────────────────────────────

/// Opaque report identifier, e.g. `RPT-1718000000000-3fa2`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportId(String);

impl ReportId {
  pub fn new(id: impl Into<String>) -> Self { Self(id.into()) }

  /// Timestamp-derived id with a random suffix. Uniqueness is enforced by the
  /// store on insertion; ordering is not guaranteed.
  pub fn generate(now: DateTime<Utc>) -> Self {
    let bytes = Uuid::new_v4().into_bytes();
    let tag = u16::from_be_bytes([bytes[0], bytes[1]]);
    Self(format!("RPT-{}-{tag:04x}", now.timestamp_millis()))
  }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for ReportId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

// ─── Status ──────────────────────────────────────────────────────────────────

/// Administrative handling state of a report.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Status {
  #[default]
  Reported,
  UnderReview,
  InProgress,
  Completed,
}

impl Status {
  pub fn label(self) -> &'static str {
    match self {
      Self::Reported => "Reported",
      Self::UnderReview => "Under Review",
      Self::InProgress => "In Progress",
      Self::Completed => "Completed",
    }
  }

  /// The next step in the handling workflow, if any.
  pub fn next(self) -> Option<Self> {
    match self {
      Self::Reported => Some(Self::UnderReview),
      Self::UnderReview => Some(Self::InProgress),
      Self::InProgress => Some(Self::Completed),
      Self::Completed => None,
    }
  }

  /// Awaiting action: reported or under review.
  pub fn is_pending(self) -> bool { matches!(self, Self::Reported | Self::UnderReview) }
}

/// Which status changes [`Report::transition`] accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionPolicy {
  /// Any status may replace any other.
  #[default]
  Permissive,
  /// Only re-applying the current status or advancing one step.
  Sequential,
}

impl TransitionPolicy {
  pub fn allows(self, from: Status, to: Status) -> bool {
    match self {
      Self::Permissive => true,
      Self::Sequential => from == to || from.next() == Some(to),
    }
  }
}

// ─── Location ────────────────────────────────────────────────────────────────

/// A bare geolocation fix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coords {
  pub lat: f64,
  pub lng: f64,
}

/// Used when the geolocation provider is unavailable or denied.
pub const FALLBACK_COORDS: Coords = Coords { lat: 33.6844, lng: 73.0479 };
pub const FALLBACK_ADDRESS: &str = "Blue Area, Islamabad (default)";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
  pub lat:     f64,
  pub lng:     f64,
  pub address: String,
}

impl Location {
  /// Resolve the location of a submission.
  ///
  /// `coords == None` means geolocation failed; the fixed fallback is used and
  /// any supplied address is ignored. With coordinates and no address, the
  /// address is the formatted coordinate pair.
  pub fn resolve(coords: Option<Coords>, address: Option<String>) -> Self {
    match coords {
      Some(Coords { lat, lng }) => Self {
        lat,
        lng,
        address: address
          .filter(|a| !a.trim().is_empty())
          .unwrap_or_else(|| format!("Lat: {lat:.4}, Lng: {lng:.4}")),
      },
      None => Self::fallback(),
    }
  }

  pub fn fallback() -> Self {
    Self {
      lat:     FALLBACK_COORDS.lat,
      lng:     FALLBACK_COORDS.lng,
      address: FALLBACK_ADDRESS.to_owned(),
    }
  }
}

// ─── Report ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
  pub id:          ReportId,
  pub user_id:     PrincipalId,
  pub user_name:   String,
  pub image_url:   String,
  pub location:    Location,
  pub ai_result:   DetectionResult,
  pub status:      Status,
  pub description: String,
  pub created_at:  DateTime<Utc>,
  pub updated_at:  DateTime<Utc>,
}

/// Input of the citizen submission flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
  pub image_url:   String,
  #[serde(default)]
  pub description: String,
  pub ai_result:   DetectionResult,
  /// `None` when geolocation was unavailable.
  pub coords:      Option<Coords>,
  pub address:     Option<String>,
}

impl Report {
  /// Build a new `reported` report from a submission.
  ///
  /// Without an author the report is attributed to `anon` / `Anonymous`.
  pub fn submit(
    submission: Submission,
    author: Option<&Principal>,
    now: DateTime<Utc>,
  ) -> Result<Self> {
    if submission.image_url.trim().is_empty() {
      return Err(Error::MissingImage);
    }
    submission.ai_result.validate()?;

    let (user_id, user_name) = match author {
      Some(p) => (p.id.clone(), p.name.clone()),
      None => (PrincipalId::new("anon"), "Anonymous".to_owned()),
    };

    Ok(Self {
      id: ReportId::generate(now),
      user_id,
      user_name,
      image_url: submission.image_url,
      location: Location::resolve(submission.coords, submission.address),
      ai_result: submission.ai_result,
      status: Status::Reported,
      description: submission.description,
      created_at: now,
      updated_at: now,
    })
  }

  /// Move to `to` under `policy`, refreshing `updated_at`.
  ///
  /// `updated_at` always ends up strictly later than before, even if the
  /// clock has not advanced since the previous mutation.
  pub fn transition(
    &mut self,
    policy: TransitionPolicy,
    to: Status,
    now: DateTime<Utc>,
  ) -> Result<()> {
    if !policy.allows(self.status, to) {
      return Err(Error::InvalidTransition { from: self.status, to });
    }
    self.status = to;
    self.updated_at = now.max(self.updated_at + TimeDelta::microseconds(1));
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;
  use crate::{
    detection::{BoundingBox, Severity},
    principal::Role,
  };

  fn submission(side: f64) -> Submission {
    Submission {
      image_url:   "https://img.example/pothole.jpg".into(),
      description: "deep hole near the bus stop".into(),
      ai_result:   DetectionResult::new(
        91.2,
        BoundingBox { x: 70.0, y: 50.0, width: side, height: side },
        true,
      ),
      coords:      Some(Coords { lat: 33.7, lng: 73.05 }),
      address:     None,
    }
  }

  fn t(secs: i64) -> DateTime<Utc> { Utc.timestamp_opt(secs, 0).unwrap() }

  #[test]
  fn submit_sets_initial_state() {
    let author = Principal {
      id:    PrincipalId::new("user-1"),
      name:  "Rajesh Kumar".into(),
      email: "citizen@smartroad.ai".into(),
      role:  Role::Citizen,
    };
    let r = Report::submit(submission(100.0), Some(&author), t(1_000)).unwrap();
    assert_eq!(r.status, Status::Reported);
    assert_eq!(r.user_id.as_str(), "user-1");
    assert_eq!(r.created_at, r.updated_at);
    assert!(r.id.as_str().starts_with("RPT-1000000-"));
    assert_eq!(r.location.address, "Lat: 33.7000, Lng: 73.0500");
    assert_eq!(r.ai_result.severity, Severity::Minor);
  }

  #[test]
  fn submit_without_author_is_anonymous() {
    let r = Report::submit(submission(150.0), None, t(0)).unwrap();
    assert_eq!(r.user_id.as_str(), "anon");
    assert_eq!(r.user_name, "Anonymous");
    assert_eq!(r.ai_result.severity, Severity::Dangerous);
  }

  #[test]
  fn submit_rejects_empty_image() {
    let mut s = submission(100.0);
    s.image_url = "  ".into();
    assert!(matches!(Report::submit(s, None, t(0)), Err(Error::MissingImage)));
  }

  #[test]
  fn missing_coords_fall_back_to_default_location() {
    let mut s = submission(100.0);
    s.coords = None;
    s.address = Some("ignored".into());
    let r = Report::submit(s, None, t(0)).unwrap();
    assert_eq!(r.location, Location::fallback());
  }

  #[test]
  fn explicit_address_is_kept() {
    let loc = Location::resolve(Some(Coords { lat: 1.0, lng: 2.0 }), Some("F-7 Markaz".into()));
    assert_eq!(loc.address, "F-7 Markaz");
  }

  #[test]
  fn transition_refreshes_updated_at_strictly() {
    let mut r = Report::submit(submission(100.0), None, t(50)).unwrap();
    let before = r.updated_at;
    // Same clock reading as creation.
    r.transition(TransitionPolicy::Permissive, Status::Completed, t(50)).unwrap();
    assert_eq!(r.status, Status::Completed);
    assert!(r.updated_at > before);
    assert_eq!(r.created_at, t(50));
  }

  #[test]
  fn sequential_policy_rejects_skips_and_backsteps() {
    let policy = TransitionPolicy::Sequential;
    assert!(policy.allows(Status::Reported, Status::UnderReview));
    assert!(policy.allows(Status::InProgress, Status::InProgress));
    assert!(!policy.allows(Status::Reported, Status::Completed));
    assert!(!policy.allows(Status::Completed, Status::Reported));

    let mut r = Report::submit(submission(100.0), None, t(0)).unwrap();
    let err = r.transition(policy, Status::InProgress, t(1)).unwrap_err();
    assert!(matches!(
      err,
      Error::InvalidTransition { from: Status::Reported, to: Status::InProgress }
    ));
    assert_eq!(r.status, Status::Reported);
    assert_eq!(r.updated_at, t(0));
  }

  #[test]
  fn status_wire_names_are_snake_case() {
    assert_eq!(serde_json::to_value(Status::UnderReview).unwrap(), "under_review");
    assert_eq!("in_progress".parse::<Status>().unwrap(), Status::InProgress);
    assert_eq!(Status::UnderReview.label(), "Under Review");
  }

  #[test]
  fn report_wire_format_uses_camel_case() {
    let r = Report::submit(submission(100.0), None, t(0)).unwrap();
    let json = serde_json::to_value(&r).unwrap();
    assert!(json.get("userId").is_some());
    assert!(json.get("aiResult").is_some());
    assert!(json.get("createdAt").is_some());
    assert_eq!(json["status"], "reported");
  }
}
