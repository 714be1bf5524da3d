//! Roadmap construction: best-candidate sampling followed by edge connection.
//!
//! For each of `sample_count` slots, `candidates_per_sample` uniform points
//! are drawn inside the safe bounds and the one farthest from every accepted
//! point wins (Mitchell's best-candidate approximation of Poisson-disc
//! sampling). A winner that overlaps an obstacle, leaves the safe bounds or
//! lands closer than `min_point_spacing` is dropped, not retried. Start and
//! goal are always inserted.

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use web_time::Instant;

use super::Roadmap;
use crate::config::RoadmapConfig;
use crate::constants::GOAL_INDEX;
use crate::octree::Aabb3;
use crate::oracle::GeometryOracle;

/// Counters and timings from a single roadmap build.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BuildStats {
  /// Sampled waypoints accepted (start and goal excluded).
  pub accepted: usize,
  /// Winners rejected because they overlap an obstacle.
  pub rejected_invalid: usize,
  /// Winners rejected because they left the safe bounds.
  pub rejected_out_of_bounds: usize,
  /// Winners rejected by `min_point_spacing`.
  pub rejected_too_close: usize,
  /// Undirected edges in the finished roadmap.
  pub edges: usize,
  /// Nodes without a single edge.
  pub isolated: usize,
  /// Edges at the goal node.
  pub goal_degree: usize,
  /// Sampling time in microseconds.
  pub sample_time_us: u64,
  /// Edge connection time in microseconds.
  pub connect_time_us: u64,
}

impl BuildStats {
  /// Total winners rejected for any reason.
  pub fn rejected(&self) -> usize {
    self.rejected_invalid + self.rejected_out_of_bounds + self.rejected_too_close
  }

  pub fn total_time_us(&self) -> u64 {
    self.sample_time_us + self.connect_time_us
  }
}

/// Builds roadmaps from a [`RoadmapConfig`] and a geometry oracle.
#[derive(Clone, Debug, Default)]
pub struct RoadmapBuilder {
  config: RoadmapConfig,
}

impl RoadmapBuilder {
  pub fn new(config: RoadmapConfig) -> Self {
    Self { config }
  }

  pub fn config(&self) -> &RoadmapConfig {
    &self.config
  }

  /// Build a roadmap from `start` to `goal`.
  pub fn build<O: GeometryOracle + ?Sized>(&self, start: Vec3, goal: Vec3, oracle: &O) -> Roadmap {
    self.build_with_stats(start, goal, oracle).0
  }

  /// Build a roadmap and report what happened along the way.
  ///
  /// Never fails: a cramped or fully blocked world yields a sparse or
  /// disconnected roadmap, visible in the returned stats.
  #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "roadmap::build"))]
  pub fn build_with_stats<O: GeometryOracle + ?Sized>(
    &self,
    start: Vec3,
    goal: Vec3,
    oracle: &O,
  ) -> (Roadmap, BuildStats) {
    let config = &self.config;
    let mut stats = BuildStats::default();

    let sample_start = Instant::now();
    let points = {
      #[cfg(feature = "tracing")]
      let _span = tracing::info_span!("sample_points").entered();

      let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
      };
      self.sample_points(start, goal, oracle, &mut rng, &mut stats)
    };
    stats.sample_time_us = sample_start.elapsed().as_micros() as u64;

    let connect_start = Instant::now();
    let roadmap = Roadmap::connect(
      points,
      config.max_connection_distance,
      config.agent_radius,
      oracle,
      config.leaf_size,
    );
    stats.connect_time_us = connect_start.elapsed().as_micros() as u64;

    stats.edges = roadmap.edge_count();
    stats.goal_degree = roadmap.degree(GOAL_INDEX);
    stats.isolated = (0..roadmap.len()).filter(|&i| roadmap.degree(i) == 0).count();

    #[cfg(feature = "tracing")]
    {
      tracing::info!(
        nodes = roadmap.len(),
        edges = stats.edges,
        rejected = stats.rejected(),
        sample_us = stats.sample_time_us,
        connect_us = stats.connect_time_us,
        "roadmap built"
      );
      if stats.goal_degree == 0 {
        tracing::warn!("goal is not connected to any roadmap node");
      }
    }

    (roadmap, stats)
  }

  /// Goal, start, then accepted samples.
  fn sample_points<O: GeometryOracle + ?Sized, R: Rng>(
    &self,
    start: Vec3,
    goal: Vec3,
    oracle: &O,
    rng: &mut R,
    stats: &mut BuildStats,
  ) -> Vec<Vec3> {
    let config = &self.config;
    let mut points = Vec::with_capacity(config.sample_count + 2);
    points.push(goal);
    points.push(start);

    let Some(safe) = config.safe_bounds() else {
      #[cfg(feature = "tracing")]
      tracing::warn!(radius = config.agent_radius, "agent does not fit inside sampling bounds");
      return points;
    };
    let min_spacing_sq = config.min_point_spacing * config.min_point_spacing;

    for _ in 0..config.sample_count {
      let mut best = safe.center();
      let mut best_dist_sq = f32::NEG_INFINITY;

      for _ in 0..config.candidates_per_sample.max(1) {
        let candidate = random_point(rng, &safe);
        let dist_sq = nearest_distance_sq(&points, candidate);
        if dist_sq > best_dist_sq {
          best_dist_sq = dist_sq;
          best = candidate;
        }
      }

      if !safe.contains_point(best) {
        stats.rejected_out_of_bounds += 1;
      } else if best_dist_sq < min_spacing_sq {
        stats.rejected_too_close += 1;
      } else if !oracle.is_point_valid(best, config.agent_radius) {
        stats.rejected_invalid += 1;
      } else {
        points.push(best);
        stats.accepted += 1;
      }
    }

    points
  }
}

/// Uniform point inside `bounds`. Flat axes collapse to their minimum.
fn random_point<R: Rng>(rng: &mut R, bounds: &Aabb3) -> Vec3 {
  let mut point = bounds.min;
  for axis in 0..3 {
    let (lo, hi) = (bounds.min[axis], bounds.max[axis]);
    if hi > lo {
      point[axis] = rng.random_range(lo..hi);
    }
  }
  point
}

/// Squared distance from `candidate` to its nearest neighbor in `points`.
fn nearest_distance_sq(points: &[Vec3], candidate: Vec3) -> f32 {
  points
    .iter()
    .map(|p| p.distance_squared(candidate))
    .fold(f32::INFINITY, f32::min)
}

#[cfg(test)]
#[path = "builder_test.rs"]
mod builder_test;
