//! Static point octree used as the broad phase for roadmap proximity queries.
//!
//! The tree is built once from a fixed point array and never mutated, so it
//! can be shared across threads without locking.
//!
//! ```text
//!        Branch (count >= leaf_size)
//!   ┌────┬────┬────┬────┬────┬────┬────┬────┐
//!   │ o0 │ o1 │ o2 │ o3 │ o4 │ o5 │ o6 │ o7 │   8 octants, half side length
//!   └─┬──┴────┴────┴────┴────┴────┴────┴────┘
//!     └─ Leaf { indices }  (count < leaf_size)
//! ```
//!
//! # Module Structure
//!
//! - [`bounds`]: `Aabb3` - box math shared with roadmap sampling
//! - [`node`]: `OctreeNode` - Branch/Leaf variants and octant math

pub mod bounds;
pub mod node;

use glam::Vec3;

pub use bounds::Aabb3;
pub use node::OctreeNode;

/// Padding added around auto-fitted root cubes so boundary points stay inside.
const FIT_PADDING: f32 = 1e-3;

/// Static octree over a point array.
///
/// Answers conservative "which points might be near this sphere" queries:
/// the result is a superset of the points within the sphere, and callers
/// re-check exact distances.
#[derive(Clone, Debug)]
pub struct Octree {
  root: OctreeNode,
  /// Points outside the root cube; returned by every query.
  overflow: Vec<usize>,
  leaf_size: usize,
  len: usize,
}

impl Octree {
  /// Build over `points` inside the cube `center ± side_length / 2`.
  ///
  /// Points outside the cube are kept in an overflow list that every query
  /// returns, so the superset guarantee holds for any input.
  pub fn build(points: &[Vec3], center: Vec3, side_length: f32, leaf_size: usize) -> Self {
    let bounds = Aabb3::cube(center, side_length);
    let leaf_size = leaf_size.max(1);

    let (inside, overflow): (Vec<usize>, Vec<usize>) =
      (0..points.len()).partition(|&i| bounds.contains_point(points[i]));

    Self {
      root: OctreeNode::build(points, inside, bounds, leaf_size, 0),
      overflow,
      leaf_size,
      len: points.len(),
    }
  }

  /// Build over `points` with a root cube fitted to their bounding box.
  pub fn from_points(points: &[Vec3], leaf_size: usize) -> Self {
    let cube = Aabb3::from_points(points)
      .map(|aabb| aabb.bounding_cube())
      .unwrap_or_else(|| Aabb3::cube(Vec3::ZERO, 1.0));
    let side = cube.size().x + 2.0 * FIT_PADDING;
    Self::build(points, cube.center(), side, leaf_size)
  }

  /// Indices of points whose leaf bounds intersect the sphere.
  ///
  /// Conservative: never misses a point within `radius` of `center`, may
  /// include points farther away.
  pub fn query_sphere(&self, center: Vec3, radius: f32) -> Vec<usize> {
    let mut out = self.overflow.clone();
    self.root.collect_sphere(center, radius, &mut out);
    out
  }

  /// Same as [`query_sphere`](Self::query_sphere) but re-checked against the
  /// real point positions.
  pub fn query_sphere_exact(&self, points: &[Vec3], center: Vec3, radius: f32) -> Vec<usize> {
    let radius_sq = radius * radius;
    let mut out = self.query_sphere(center, radius);
    out.retain(|&i| points[i].distance_squared(center) <= radius_sq);
    out
  }

  /// Root node of the tree.
  pub fn root(&self) -> &OctreeNode {
    &self.root
  }

  /// Root cube.
  pub fn bounds(&self) -> &Aabb3 {
    self.root.bounds()
  }

  /// Number of points the tree was built from.
  pub fn len(&self) -> usize {
    self.len
  }

  /// True when built from an empty point array.
  pub fn is_empty(&self) -> bool {
    self.len == 0
  }

  /// Split threshold used when building.
  pub fn leaf_size(&self) -> usize {
    self.leaf_size
  }

  /// Points that fell outside the root cube.
  pub fn overflow(&self) -> &[usize] {
    &self.overflow
  }
}
