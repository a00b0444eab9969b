//! Demo reports around Islamabad, filed by the demo citizen.

use chrono::{DateTime, TimeDelta, Utc};
use smartroad_core::{
  detection::{BoundingBox, DetectionResult},
  report::{Location, Report, ReportId, Status},
};
use smartroad_store_memory::demo_citizen;

struct Row {
  id:          &'static str,
  address:     &'static str,
  lat:         f64,
  lng:         f64,
  confidence:  f64,
  size:        (f64, f64),
  status:      Status,
  description: &'static str,
  /// Hours before `now` the report was filed.
  age:         i64,
  /// Hours after filing of the latest status change.
  touched:     i64,
}

const ROWS: &[Row] = &[
  Row {
    id:          "RPT-001",
    address:     "Jinnah Avenue, Blue Area, Islamabad",
    lat:         33.7104,
    lng:         73.0551,
    confidence:  94.2,
    size:        (180.0, 130.0),
    status:      Status::Reported,
    description: "Deep pothole in the left lane, cars swerving around it",
    age:         6,
    touched:     0,
  },
  Row {
    id:          "RPT-002",
    address:     "Kashmir Highway, G-9, Islamabad",
    lat:         33.6938,
    lng:         73.0290,
    confidence:  88.7,
    size:        (120.0, 100.0),
    status:      Status::UnderReview,
    description: "Cracked surface turning into a pothole near the flyover",
    age:         30,
    touched:     4,
  },
  Row {
    id:          "RPT-003",
    address:     "Margalla Road, F-7, Islamabad",
    lat:         33.7295,
    lng:         73.0560,
    confidence:  91.5,
    size:        (90.0, 80.0),
    status:      Status::Completed,
    description: "Small pothole at the bus stop",
    age:         96,
    touched:     50,
  },
  Row {
    id:          "RPT-004",
    address:     "IJP Road, I-8, Islamabad",
    lat:         33.6682,
    lng:         73.0744,
    confidence:  96.8,
    size:        (200.0, 150.0),
    status:      Status::InProgress,
    description: "Large pothole, water collects after rain",
    age:         72,
    touched:     20,
  },
  Row {
    id:          "RPT-005",
    address:     "Faisal Avenue, F-8, Islamabad",
    lat:         33.7085,
    lng:         73.0375,
    confidence:  82.3,
    size:        (110.0, 95.0),
    status:      Status::Reported,
    description: "Uneven patch near the school crossing",
    age:         12,
    touched:     0,
  },
  Row {
    id:          "RPT-006",
    address:     "Park Road, Chak Shahzad, Islamabad",
    lat:         33.6570,
    lng:         73.1380,
    confidence:  79.4,
    size:        (85.0, 70.0),
    status:      Status::Completed,
    description: "Minor pothole at the market entrance",
    age:         168,
    touched:     100,
  },
];

/// The demo report set, newest first.
pub fn demo_reports(now: DateTime<Utc>) -> Vec<Report> {
  let author = demo_citizen();
  let mut reports: Vec<Report> = ROWS
    .iter()
    .map(|row| {
      let created_at = now - TimeDelta::hours(row.age);
      let (width, height) = row.size;
      Report {
        id: ReportId::new(row.id),
        user_id: author.id.clone(),
        user_name: author.name.clone(),
        image_url: format!("https://images.smartroad.ai/demo/{}.jpg", row.id.to_lowercase()),
        location: Location {
          lat:     row.lat,
          lng:     row.lng,
          address: row.address.to_owned(),
        },
        ai_result: DetectionResult::new(
          row.confidence,
          BoundingBox { x: 70.0, y: 45.0, width, height },
          true,
        ),
        status: row.status,
        description: row.description.to_owned(),
        created_at,
        updated_at: created_at + TimeDelta::hours(row.touched),
      }
    })
    .collect();
  reports.sort_by(|a, b| b.created_at.cmp(&a.created_at));
  reports
}
