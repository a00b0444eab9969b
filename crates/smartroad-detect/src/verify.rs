//! The verification step that decides a detection's `verified` flag.

use std::{
  collections::{HashSet, VecDeque},
  sync::{Mutex, PoisonError},
};

use crate::ImageRef;

/// Decides whether an analysed image counts as verified.
pub trait Verifier: Send + Sync {
  /// Called once per committed analysis.
  fn verify(&self, image: &ImageRef) -> bool;
}

/// Fingerprints remembered by [`FingerprintVerifier::new`].
pub const DEFAULT_CAPACITY: usize = 4096;

/// Flags duplicate photos: an image is verified the first time its content
/// fingerprint is seen and unverified on later analyses while the
/// fingerprint is still remembered. The oldest fingerprint is forgotten once
/// `capacity` is reached.
#[derive(Debug)]
pub struct FingerprintVerifier {
  seen:     Mutex<Seen>,
  capacity: usize,
}

#[derive(Debug, Default)]
struct Seen {
  set:   HashSet<String>,
  order: VecDeque<String>,
}

impl FingerprintVerifier {
  pub fn new() -> Self { Self::with_capacity(DEFAULT_CAPACITY) }

  pub fn with_capacity(capacity: usize) -> Self {
    Self { seen: Mutex::default(), capacity: capacity.max(1) }
  }
}

impl Default for FingerprintVerifier {
  fn default() -> Self { Self::new() }
}

impl Verifier for FingerprintVerifier {
  fn verify(&self, image: &ImageRef) -> bool {
    let fingerprint = image.fingerprint();
    let mut seen = self.seen.lock().unwrap_or_else(PoisonError::into_inner);
    if seen.set.contains(&fingerprint) {
      tracing::debug!("duplicate image fingerprint; marking unverified");
      return false;
    }
    if seen.order.len() >= self.capacity
      && let Some(oldest) = seen.order.pop_front()
    {
      seen.set.remove(&oldest);
    }
    seen.set.insert(fingerprint.clone());
    seen.order.push_back(fingerprint);
    true
  }
}
