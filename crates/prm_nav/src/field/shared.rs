//! Versioned gradient field snapshot shared between the control loop, the
//! solve publisher and every querying agent.
//!
//! Readers clone the current `Arc` and keep querying it even while a newer
//! field is published; they never see a half-built field.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use glam::Vec3;

use super::GradientField;
use crate::oracle::GeometryOracle;

/// Atomically swapped `Arc<GradientField>` with a publication counter.
#[derive(Debug, Default)]
pub struct SharedField {
  current: RwLock<Option<Arc<GradientField>>>,
  version: AtomicU64,
}

impl SharedField {
  pub fn new() -> Self {
    Self::default()
  }

  /// Replace the current field. Returns the new version.
  pub fn publish(&self, field: GradientField) -> u64 {
    self.publish_arc(Arc::new(field))
  }

  /// Replace the current field with an already shared one.
  pub fn publish_arc(&self, field: Arc<GradientField>) -> u64 {
    let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
    *current = Some(field);
    let version = self.version.fetch_add(1, Ordering::AcqRel) + 1;

    #[cfg(feature = "tracing")]
    tracing::debug!(version, "gradient field published");

    version
  }

  /// Snapshot of the current field, `None` before the first publish.
  pub fn load(&self) -> Option<Arc<GradientField>> {
    self
      .current
      .read()
      .unwrap_or_else(PoisonError::into_inner)
      .clone()
  }

  /// Drop the current field (new episode). Bumps the version.
  pub fn clear(&self) -> u64 {
    let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
    *current = None;
    self.version.fetch_add(1, Ordering::AcqRel) + 1
  }

  /// Number of publications and clears so far.
  pub fn version(&self) -> u64 {
    self.version.load(Ordering::Acquire)
  }

  pub fn is_published(&self) -> bool {
    self.load().is_some()
  }

  /// Query the current snapshot. `None` when nothing is published.
  pub fn query_direction<O: GeometryOracle + ?Sized>(&self, point: Vec3, oracle: &O) -> Option<Vec3> {
    self.load()?.query_direction(point, oracle)
  }
}

#[cfg(test)]
#[path = "shared_test.rs"]
mod shared_test;
