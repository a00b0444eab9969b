//! [`Detector`]: the synthetic inference stub.

use std::{
  sync::{Mutex, PoisonError},
  time::Duration,
};

use rand::{Rng, SeedableRng, rngs::StdRng};
use smartroad_core::detection::{BoundingBox, DetectionResult};
use tokio::sync::watch;

use crate::{Error, FingerprintVerifier, ImageRef, Result, Verifier};

/// Simulated inference latency. Fixed.
pub const PROCESSING_DELAY: Duration = Duration::from_millis(2500);

/// Sample a fabricated detection.
///
/// Confidence is uniform in `[75, 98]`, the box is `[80, 240] x [60, 180]`
/// pixels at an offset in `[50, 150] x [30, 110]`. Severity follows from the
/// box area.
pub fn sample_detection(rng: &mut impl Rng, verified: bool) -> DetectionResult {
  let confidence = rng.gen_range(75.0..=98.0);
  let bounding_box = BoundingBox {
    x:      rng.gen_range(50.0..=150.0),
    y:      rng.gen_range(30.0..=110.0),
    width:  rng.gen_range(80.0..=240.0),
    height: rng.gen_range(60.0..=180.0),
  };
  DetectionResult::new(confidence, bounding_box, verified)
}

/// Runs one analysis at a time; starting a new one supersedes the last.
///
/// Each call to [`Detector::analyze`] takes a generation ticket. A pending
/// call whose ticket is no longer current resolves with
/// [`Error::Superseded`] as soon as the generation moves on.
pub struct Detector<V = FingerprintVerifier> {
  rng:        Mutex<StdRng>,
  generation: watch::Sender<u64>,
  verifier:   V,
}

impl Detector<FingerprintVerifier> {
  pub fn new() -> Self { Self::with_verifier(FingerprintVerifier::new(), StdRng::from_entropy()) }

  /// A detector with a reproducible sample stream.
  pub fn seeded(seed: u64) -> Self {
    Self::with_verifier(FingerprintVerifier::new(), StdRng::seed_from_u64(seed))
  }
}

impl Default for Detector<FingerprintVerifier> {
  fn default() -> Self { Self::new() }
}

impl<V: Verifier> Detector<V> {
  pub fn with_verifier(verifier: V, rng: StdRng) -> Self {
    let (generation, _) = watch::channel(0);
    Self { rng: Mutex::new(rng), generation, verifier }
  }

  /// Analyse `image` after the simulated processing delay.
  pub async fn analyze(&self, image: &ImageRef) -> Result<DetectionResult> {
    let mut rx = self.generation.subscribe();
    let ticket = self.bump();
    tracing::debug!(ticket, "analysis started");

    let superseded = async {
      loop {
        if rx.changed().await.is_err() {
          // Sender lives as long as `self`; nothing can supersede us now.
          std::future::pending::<()>().await;
        }
        if *rx.borrow_and_update() != ticket {
          return;
        }
      }
    };

    tokio::select! {
      _ = tokio::time::sleep(PROCESSING_DELAY) => {}
      _ = superseded => {
        tracing::debug!(ticket, "analysis superseded");
        return Err(Error::Superseded);
      }
    }

    if *self.generation.borrow() != ticket {
      return Err(Error::Superseded);
    }

    let verified = self.verifier.verify(image);
    let result = {
      let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
      sample_detection(&mut *rng, verified)
    };
    tracing::info!(
      ticket,
      severity = %result.severity,
      confidence = result.confidence,
      "analysis complete"
    );
    Ok(result)
  }

  /// Abandon any pending analysis without starting a new one.
  pub fn cancel(&self) {
    let ticket = self.bump();
    tracing::debug!(ticket, "pending analysis cancelled");
  }

  fn bump(&self) -> u64 {
    let mut ticket = 0;
    self.generation.send_modify(|g| {
      *g += 1;
      ticket = *g;
    });
    ticket
  }
}
