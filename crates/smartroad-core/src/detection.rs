//! Detection results: the (synthetic) output of image analysis.
//!
//! A detection result is embedded in a report and never recomputed once
//! stored. Severity is always derived from the bounding-box area at creation
//! time.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Box area above which damage is classified as dangerous.
pub const DANGEROUS_AREA: f64 = 18_000.0;
/// Box area above which damage is classified as at least moderate.
pub const MODERATE_AREA: f64 = 10_000.0;

/// Ordinal classification of damage impact.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
  Minor,
  Moderate,
  Dangerous,
}

impl Severity {
  /// Classify by bounding-box area (`width * height`).
  ///
  /// Thresholds are exclusive: exactly 10000 is minor, exactly 18000 is
  /// moderate.
  pub fn from_area(area: f64) -> Self {
    if area > DANGEROUS_AREA {
      Self::Dangerous
    } else if area > MODERATE_AREA {
      Self::Moderate
    } else {
      Self::Minor
    }
  }

  /// Human-readable label used by every view.
  pub fn label(self) -> &'static str {
    match self {
      Self::Minor => "Minor",
      Self::Moderate => "Moderate",
      Self::Dangerous => "Dangerous",
    }
  }

  /// Marker and badge colour (hex RGB).
  pub fn color(self) -> &'static str {
    match self {
      Self::Minor => "#22c55e",
      Self::Moderate => "#f59e0b",
      Self::Dangerous => "#ef4444",
    }
  }
}

/// Axis-aligned box in image-pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
  pub x:      f64,
  pub y:      f64,
  pub width:  f64,
  pub height: f64,
}

impl BoundingBox {
  pub fn area(&self) -> f64 { self.width * self.height }

  /// Finite, non-negative offset and a strictly positive extent.
  pub fn validate(&self) -> crate::Result<()> {
    let Self { x, y, width, height } = *self;
    if ![x, y, width, height].iter().all(|v| v.is_finite()) {
      return Err(crate::Error::InvalidBoundingBox("non-finite coordinate".into()));
    }
    if x < 0.0 || y < 0.0 {
      return Err(crate::Error::InvalidBoundingBox(format!("negative offset ({x}, {y})")));
    }
    if width <= 0.0 || height <= 0.0 {
      return Err(crate::Error::InvalidBoundingBox(format!(
        "non-positive size {width}x{height}"
      )));
    }
    Ok(())
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionResult {
  /// Percentage in `0..=100`, one decimal of precision.
  pub confidence:   f64,
  pub severity:     Severity,
  pub bounding_box: BoundingBox,
  /// Output of the verification step (duplicate / tamper check).
  pub verified:     bool,
}

impl DetectionResult {
  /// Build a result whose severity is derived from `bounding_box`.
  pub fn new(confidence: f64, bounding_box: BoundingBox, verified: bool) -> Self {
    Self {
      confidence: round_tenth(confidence),
      severity: Severity::from_area(bounding_box.area()),
      bounding_box,
      verified,
    }
  }

  /// Check that the stated fields are internally consistent.
  pub fn validate(&self) -> crate::Result<()> {
    if !(0.0..=100.0).contains(&self.confidence)
      || round_tenth(self.confidence) != self.confidence
    {
      return Err(crate::Error::InvalidConfidence(self.confidence));
    }
    self.bounding_box.validate()?;
    let area = self.bounding_box.area();
    if Severity::from_area(area) != self.severity {
      return Err(crate::Error::InconsistentSeverity {
        stated: self.severity,
        area,
      });
    }
    Ok(())
  }
}

/// Round to one decimal place.
pub fn round_tenth(value: f64) -> f64 { (value * 10.0).round() / 10.0 }

#[cfg(test)]
mod tests {
  use super::*;

  fn square(side: f64) -> BoundingBox {
    BoundingBox { x: 60.0, y: 40.0, width: side, height: side }
  }

  #[test]
  fn area_thresholds_are_exclusive() {
    assert_eq!(Severity::from_area(10_000.0), Severity::Minor);
    assert_eq!(Severity::from_area(10_000.1), Severity::Moderate);
    assert_eq!(Severity::from_area(18_000.0), Severity::Moderate);
    assert_eq!(Severity::from_area(18_000.1), Severity::Dangerous);
  }

  #[test]
  fn hundred_square_is_minor_and_one_fifty_is_dangerous() {
    assert_eq!(DetectionResult::new(90.0, square(100.0), true).severity, Severity::Minor);
    assert_eq!(
      DetectionResult::new(90.0, square(150.0), true).severity,
      Severity::Dangerous
    );
  }

  #[test]
  fn confidence_is_rounded_to_one_decimal() {
    let r = DetectionResult::new(87.6543, square(100.0), true);
    assert_eq!(r.confidence, 87.7);
  }

  #[test]
  fn validate_rejects_mismatched_severity() {
    let mut r = DetectionResult::new(80.0, square(150.0), true);
    r.severity = Severity::Minor;
    assert!(matches!(
      r.validate(),
      Err(crate::Error::InconsistentSeverity { stated: Severity::Minor, .. })
    ));
  }

  #[test]
  fn validate_rejects_extra_confidence_precision() {
    let mut r = DetectionResult::new(90.0, square(100.0), true);
    r.confidence = 90.123;
    assert!(matches!(r.validate(), Err(crate::Error::InvalidConfidence(_))));
    r.confidence = 90.1;
    assert!(r.validate().is_ok());
  }

  #[test]
  fn validate_rejects_negative_box_with_dangerous_area() {
    let r = DetectionResult {
      confidence:   90.0,
      severity:     Severity::Dangerous,
      bounding_box: BoundingBox { x: -5.0, y: -5.0, width: -200.0, height: -100.0 },
      verified:     true,
    };
    assert!(matches!(r.validate(), Err(crate::Error::InvalidBoundingBox(_))));

    let r = DetectionResult {
      bounding_box: BoundingBox { x: 5.0, y: 5.0, width: -200.0, height: -100.0 },
      ..r
    };
    assert!(matches!(r.validate(), Err(crate::Error::InvalidBoundingBox(_))));
  }

  #[test]
  fn validate_rejects_non_finite_values() {
    let mut r = DetectionResult::new(90.0, square(100.0), true);
    r.bounding_box.width = f64::INFINITY;
    assert!(matches!(r.validate(), Err(crate::Error::InvalidBoundingBox(_))));

    let mut r = DetectionResult::new(90.0, square(100.0), true);
    r.confidence = f64::NAN;
    assert!(matches!(r.validate(), Err(crate::Error::InvalidConfidence(_))));
  }

  #[test]
  fn validate_rejects_out_of_range_confidence() {
    let mut r = DetectionResult::new(80.0, square(100.0), true);
    r.confidence = 101.0;
    assert!(matches!(r.validate(), Err(crate::Error::InvalidConfidence(_))));
  }

  #[test]
  fn wire_format_is_camel_case() {
    let r = DetectionResult::new(80.0, square(100.0), false);
    let json = serde_json::to_value(&r).unwrap();
    assert_eq!(json["boundingBox"]["width"], 100.0);
    assert_eq!(json["severity"], "minor");
    assert_eq!(json["verified"], false);
  }

  #[test]
  fn severity_is_ordered_by_impact() {
    assert!(Severity::Minor < Severity::Moderate);
    assert!(Severity::Moderate < Severity::Dangerous);
  }
}
