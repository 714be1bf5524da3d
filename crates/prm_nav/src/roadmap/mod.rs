//! Roadmap graph: sampled waypoints plus a symmetric weight matrix.
//!
//! ```text
//!         0      1      2      3
//!   0  [  -    3.2    -inf   7.9 ]     W[i][j] = Euclidean distance
//!   1  [ 3.2    -     4.1   -inf ]     -inf    = no edge
//!   2  [ -inf  4.1     -    2.0  ]     W[i][i] unused
//!   3  [ 7.9  -inf    2.0     -  ]
//! ```
//!
//! Node 0 is always the goal, node 1 the start, sampled waypoints follow.
//! A roadmap is immutable once built; relocating the goal produces a new one.
//!
//! # Module Structure
//!
//! - [`builder`]: `RoadmapBuilder` - best-candidate sampling and `BuildStats`

pub mod builder;

use glam::Vec3;
use rayon::prelude::*;

use crate::constants::{GOAL_INDEX, NO_EDGE};
use crate::octree::Octree;
use crate::oracle::GeometryOracle;

pub use builder::{BuildStats, RoadmapBuilder};

// =============================================================================
// WeightMatrix
// =============================================================================

/// Dense symmetric `n x n` edge-weight matrix, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct WeightMatrix {
  size: usize,
  data: Vec<f32>,
}

impl WeightMatrix {
  /// Matrix with no edges.
  pub fn new(size: usize) -> Self {
    Self {
      size,
      data: vec![NO_EDGE; size * size],
    }
  }

  /// Side length.
  pub fn size(&self) -> usize {
    self.size
  }

  /// Raw weight, `NO_EDGE` when unconnected or either id is out of range.
  #[inline]
  pub fn get(&self, i: usize, j: usize) -> f32 {
    if i >= self.size || j >= self.size {
      return NO_EDGE;
    }
    self.data[i * self.size + j]
  }

  /// Set both `W[i][j]` and `W[j][i]`. Self-edges are ignored.
  pub fn set(&mut self, i: usize, j: usize, weight: f32) {
    if i == j {
      return;
    }
    self.data[i * self.size + j] = weight;
    self.data[j * self.size + i] = weight;
  }

  /// Remove the edge between `i` and `j`.
  pub fn clear(&mut self, i: usize, j: usize) {
    self.set(i, j, NO_EDGE);
  }

  /// Row `i` of the matrix, empty when `i` is out of range.
  #[inline]
  pub fn row(&self, i: usize) -> &[f32] {
    if i >= self.size {
      return &[];
    }
    &self.data[i * self.size..(i + 1) * self.size]
  }

  /// Number of undirected edges.
  pub fn edge_count(&self) -> usize {
    let mut count = 0;
    for i in 0..self.size {
      count += self.row(i)[i + 1..].iter().filter(|&&w| w != NO_EDGE).count();
    }
    count
  }
}

// =============================================================================
// Roadmap
// =============================================================================

/// Sampled free-space waypoints and the collision-free edges between them.
///
/// Carries an [`Octree`] over its points for proximity queries. Read-only and
/// `Sync`, so a single roadmap is shared by the solver and every query.
#[derive(Clone, Debug)]
pub struct Roadmap {
  points: Vec<Vec3>,
  weights: WeightMatrix,
  index: Octree,
}

impl Roadmap {
  /// Wrap existing points and weights, building the spatial index.
  ///
  /// # Panics
  /// If the matrix size does not match the point count.
  pub fn new(points: Vec<Vec3>, weights: WeightMatrix, leaf_size: usize) -> Self {
    assert_eq!(
      points.len(),
      weights.size(),
      "weight matrix must be points.len() square"
    );
    let index = Octree::from_points(&points, leaf_size);
    Self {
      points,
      weights,
      index,
    }
  }

  /// Connect every pair of points closer than `max_distance` whose
  /// connecting segment, swept by `radius`, is free of obstacles.
  ///
  /// Candidate pairs come from the octree so distant pairs are never tested
  /// against the oracle. Rows are processed in parallel.
  #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "roadmap::connect"))]
  pub fn connect<O: GeometryOracle + ?Sized>(
    points: Vec<Vec3>,
    max_distance: f32,
    radius: f32,
    oracle: &O,
    leaf_size: usize,
  ) -> Self {
    let index = Octree::from_points(&points, leaf_size);
    let (positions, tree) = (&points, &index);

    let edges: Vec<(usize, usize, f32)> = (0..points.len())
      .into_par_iter()
      .flat_map_iter(|i| {
        let a = positions[i];
        tree
          .query_sphere_exact(positions, a, max_distance)
          .into_iter()
          .filter(move |&j| j > i)
          .filter(move |&j| !oracle.segment_blocked(a, positions[j], radius))
          .map(move |j| (i, j, a.distance(positions[j])))
      })
      .collect();

    let mut weights = WeightMatrix::new(points.len());
    for (i, j, weight) in edges {
      weights.set(i, j, weight);
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(nodes = points.len(), edges = weights.edge_count(), "roadmap connected");

    Self {
      points,
      weights,
      index,
    }
  }

  /// Copy of this roadmap with the goal moved to `goal`.
  ///
  /// Only node 0's row and column are recomputed; every other edge is kept.
  pub fn with_goal<O: GeometryOracle + ?Sized>(
    &self,
    goal: Vec3,
    radius: f32,
    max_distance: f32,
    oracle: &O,
  ) -> Self {
    let mut points = self.points.clone();
    let mut weights = self.weights.clone();
    if points.is_empty() {
      points.push(goal);
      weights = WeightMatrix::new(1);
    } else {
      points[GOAL_INDEX] = goal;
    }

    for j in 0..points.len() {
      if j == GOAL_INDEX {
        continue;
      }
      let distance = goal.distance(points[j]);
      if distance <= max_distance && !oracle.segment_blocked(goal, points[j], radius) {
        weights.set(GOAL_INDEX, j, distance);
      } else {
        weights.clear(GOAL_INDEX, j);
      }
    }

    Self::new(points, weights, self.index.leaf_size())
  }

  /// Edge weight between `i` and `j`, `None` when unconnected.
  #[inline]
  pub fn weight(&self, i: usize, j: usize) -> Option<f32> {
    let weight = self.weights.get(i, j);
    (i != j && weight != NO_EDGE).then_some(weight)
  }

  /// True when `i` and `j` share an edge.
  #[inline]
  pub fn has_edge(&self, i: usize, j: usize) -> bool {
    self.weight(i, j).is_some()
  }

  /// `(neighbor, weight)` pairs of node `i`.
  pub fn neighbors(&self, i: usize) -> impl Iterator<Item = (usize, f32)> + '_ {
    self
      .weights
      .row(i)
      .iter()
      .enumerate()
      .filter(move |&(j, &w)| j != i && w != NO_EDGE)
      .map(|(j, &w)| (j, w))
  }

  /// Number of edges at node `i`.
  pub fn degree(&self, i: usize) -> usize {
    self.neighbors(i).count()
  }

  /// Number of undirected edges.
  pub fn edge_count(&self) -> usize {
    self.weights.edge_count()
  }

  /// Number of nodes.
  pub fn len(&self) -> usize {
    self.points.len()
  }

  pub fn is_empty(&self) -> bool {
    self.points.is_empty()
  }

  /// Position of node 0, `None` for an empty roadmap.
  pub fn goal_position(&self) -> Option<Vec3> {
    self.points.get(GOAL_INDEX).copied()
  }

  /// All node positions, indexed by node id.
  pub fn points(&self) -> &[Vec3] {
    &self.points
  }

  pub fn weights(&self) -> &WeightMatrix {
    &self.weights
  }

  /// Octree over the node positions.
  pub fn index(&self) -> &Octree {
    &self.index
  }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;
