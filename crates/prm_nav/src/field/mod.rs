//! Gradient field: per-node descent directions derived from a solve, and the
//! continuous-space query agents call every tick.
//!
//! ```text
//!   query point p
//!        │
//!        ├─ goal in sight? ──────────────► (goal - p), length <= 1
//!        │
//!        ├─ octree: nodes within sample_radius
//!        ├─ keep reached, nearest K
//!        ├─ drop nodes hidden from p
//!        └─ average stored directions ───► normalized direction
//!                                          (None if nothing survives
//!                                           or the sum is zero)
//! ```
//!
//! A field is immutable once built. Publication goes through [`SharedField`].
//!
//! # Module Structure
//!
//! - [`shared`]: `SharedField` - versioned, atomically swapped snapshot

pub mod shared;

use std::sync::Arc;

use glam::Vec3;
use rayon::prelude::*;
use smallvec::SmallVec;

use crate::config::{FieldConfig, Weighting};
use crate::constants::INLINE_CANDIDATES;
use crate::oracle::GeometryOracle;
use crate::roadmap::Roadmap;
use crate::search::SolveOutput;

pub use shared::SharedField;

/// Precomputed navigation data for one roadmap node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientEntry {
  /// Node position.
  pub position: Vec3,
  /// Offset to the next node toward the goal. Zero for the goal and for
  /// unreached nodes.
  pub direction: Vec3,
  /// Shortest graph distance to the goal, infinite when unreached.
  pub distance: f32,
}

impl GradientEntry {
  #[inline]
  pub fn is_reached(&self) -> bool {
    self.distance.is_finite()
  }
}

/// Immutable per-node direction table plus the query over it.
#[derive(Clone, Debug)]
pub struct GradientField {
  roadmap: Arc<Roadmap>,
  entries: Vec<GradientEntry>,
  goal: usize,
  max_distance: f32,
  reached: usize,
  config: FieldConfig,
}

impl GradientField {
  /// Derive the field from a completed solve over `roadmap`.
  #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "field::from_solution"))]
  pub fn from_solution(roadmap: Arc<Roadmap>, output: &SolveOutput, config: FieldConfig) -> Self {
    let points = roadmap.points();
    let entries: Vec<GradientEntry> = points
      .iter()
      .enumerate()
      .map(|(id, &position)| GradientEntry {
        position,
        direction: output
          .parent(id)
          .map_or(Vec3::ZERO, |parent| points[parent] - position),
        distance: output.depth(id),
      })
      .collect();

    Self {
      entries,
      goal: output.goal(),
      max_distance: output.max_depth(),
      reached: output.reached_count(),
      config,
      roadmap,
    }
  }

  /// Steering direction from an arbitrary point toward the goal.
  ///
  /// `None` means no path from here: nothing reached lies within the
  /// sampling radius in line of sight, or the visible neighbors point in
  /// directions that cancel out.
  pub fn query_direction<O: GeometryOracle + ?Sized>(&self, point: Vec3, oracle: &O) -> Option<Vec3> {
    let radius = self.config.agent_radius;
    let goal = self.goal_position();
    if !oracle.segment_blocked(point, goal, radius) {
      return Some((goal - point).clamp_length_max(1.0));
    }

    let points = self.roadmap.points();
    let mut candidates: SmallVec<[(usize, f32); INLINE_CANDIDATES]> = self
      .roadmap
      .index()
      .query_sphere_exact(points, point, self.config.sample_radius)
      .into_iter()
      .filter(|&id| self.entries[id].is_reached())
      .map(|id| (id, points[id].distance(point)))
      .collect();
    candidates.sort_unstable_by(|a, b| a.1.total_cmp(&b.1));
    candidates.truncate(self.config.neighbor_count);
    candidates.retain(|&mut (id, _)| !oracle.segment_blocked(point, points[id], radius));

    if candidates.is_empty() {
      return None;
    }

    let sum: Vec3 = match self.config.weighting {
      Weighting::Uniform => candidates.iter().map(|&(id, _)| self.entries[id].direction).sum(),
      Weighting::InverseDistance => candidates
        .iter()
        .map(|&(id, dist)| self.entries[id].direction / dist.max(f32::EPSILON))
        .sum(),
    };
    // Opposing neighbors cancel out: no usable direction either
    sum.try_normalize()
  }

  /// [`query_direction`](Self::query_direction) for many agents in parallel.
  pub fn query_many<O: GeometryOracle + ?Sized>(&self, points: &[Vec3], oracle: &O) -> Vec<Option<Vec3>> {
    points
      .par_iter()
      .map(|&point| self.query_direction(point, oracle))
      .collect()
  }

  /// Entry of a reached node.
  pub fn entry(&self, id: usize) -> Option<&GradientEntry> {
    self.entries.get(id).filter(|entry| entry.is_reached())
  }

  /// Entries for every roadmap node, reached or not.
  pub fn entries(&self) -> &[GradientEntry] {
    &self.entries
  }

  /// Stored direction of a reached node.
  pub fn direction_at_node(&self, id: usize) -> Option<Vec3> {
    self.entry(id).map(|entry| entry.direction)
  }

  /// Largest finite distance to the goal.
  pub fn max_distance(&self) -> f32 {
    self.max_distance
  }

  /// Distance of node `id` scaled into `[0, 1]` by the largest distance.
  pub fn normalized_distance(&self, id: usize) -> Option<f32> {
    let entry = self.entry(id)?;
    if self.max_distance <= 0.0 {
      return Some(0.0);
    }
    Some(entry.distance / self.max_distance)
  }

  /// Node the field descends toward.
  pub fn goal(&self) -> usize {
    self.goal
  }

  pub fn goal_position(&self) -> Vec3 {
    self.entries[self.goal].position
  }

  /// Number of nodes with a path to the goal.
  pub fn reached_count(&self) -> usize {
    self.reached
  }

  pub fn config(&self) -> &FieldConfig {
    &self.config
  }

  /// Roadmap the field was solved over.
  pub fn roadmap(&self) -> &Arc<Roadmap> {
    &self.roadmap
  }
}
