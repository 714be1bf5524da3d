//! OctreeNode - Branch/Leaf variants of the static point octree.
//!
//! Octant numbering follows the bit layout below; a point goes to the
//! octant selected by comparing it against the cell center, so points on a
//! split plane land in exactly one child (the upper one).
//!
//! - bit 0: +X half
//! - bit 1: +Y half
//! - bit 2: +Z half

use glam::Vec3;

use super::Aabb3;
use crate::constants::MAX_OCTREE_DEPTH;

/// Node of the static point octree.
#[derive(Clone, Debug)]
pub enum OctreeNode {
  /// Interior node owning exactly 8 children that partition its cube.
  Branch {
    /// Cubic bounds of this node.
    bounds: Aabb3,
    /// Children indexed by octant.
    children: Box<[OctreeNode; 8]>,
  },
  /// Terminal node listing the point indices that fall in its cube.
  Leaf {
    /// Cubic bounds of this node.
    bounds: Aabb3,
    /// Indices into the point array the tree was built from.
    indices: Vec<usize>,
  },
}

impl OctreeNode {
  /// Recursively build a node over `indices`.
  ///
  /// Becomes a branch iff `indices.len() >= leaf_size` (and the depth limit
  /// has not been reached), otherwise a leaf.
  pub(crate) fn build(
    points: &[Vec3],
    indices: Vec<usize>,
    bounds: Aabb3,
    leaf_size: usize,
    depth: u32,
  ) -> Self {
    if indices.len() < leaf_size || depth >= MAX_OCTREE_DEPTH {
      return OctreeNode::Leaf { bounds, indices };
    }

    let center = bounds.center();
    let mut buckets: [Vec<usize>; 8] = Default::default();
    for index in indices {
      buckets[octant_of(center, points[index]) as usize].push(index);
    }

    // from_fn visits octants in order, so the bucket iterator stays aligned
    let mut buckets = buckets.into_iter();
    let children: [OctreeNode; 8] = std::array::from_fn(|octant| {
      let indices = buckets.next().unwrap_or_default();
      OctreeNode::build(
        points,
        indices,
        child_bounds(&bounds, octant as u8),
        leaf_size,
        depth + 1,
      )
    });

    OctreeNode::Branch {
      bounds,
      children: Box::new(children),
    }
  }

  /// Cubic bounds of this node.
  pub fn bounds(&self) -> &Aabb3 {
    match self {
      OctreeNode::Branch { bounds, .. } | OctreeNode::Leaf { bounds, .. } => bounds,
    }
  }

  /// True for leaf nodes.
  pub fn is_leaf(&self) -> bool {
    matches!(self, OctreeNode::Leaf { .. })
  }

  /// Number of points stored below this node.
  pub fn point_count(&self) -> usize {
    match self {
      OctreeNode::Branch { children, .. } => children.iter().map(|c| c.point_count()).sum(),
      OctreeNode::Leaf { indices, .. } => indices.len(),
    }
  }

  /// Number of leaves below (or at) this node.
  pub fn leaf_count(&self) -> usize {
    match self {
      OctreeNode::Branch { children, .. } => children.iter().map(|c| c.leaf_count()).sum(),
      OctreeNode::Leaf { .. } => 1,
    }
  }

  /// Height of the subtree (a lone leaf has depth 0).
  pub fn depth(&self) -> u32 {
    match self {
      OctreeNode::Branch { children, .. } => {
        1 + children.iter().map(|c| c.depth()).max().unwrap_or(0)
      }
      OctreeNode::Leaf { .. } => 0,
    }
  }

  /// Append the indices of every leaf whose bounds touch the sphere.
  pub(crate) fn collect_sphere(&self, center: Vec3, radius: f32, out: &mut Vec<usize>) {
    match self {
      OctreeNode::Branch { bounds, children } => {
        if !bounds.overlaps_sphere(center, radius) {
          return;
        }
        for child in children.iter() {
          child.collect_sphere(center, radius, out);
        }
      }
      OctreeNode::Leaf { bounds, indices } => {
        if indices.is_empty() || !bounds.overlaps_sphere(center, radius) {
          return;
        }
        out.extend_from_slice(indices);
      }
    }
  }
}

/// Octant (0-7) of `point` relative to a cell center.
#[inline]
pub fn octant_of(center: Vec3, point: Vec3) -> u8 {
  (point.x >= center.x) as u8 | ((point.y >= center.y) as u8) << 1 | ((point.z >= center.z) as u8) << 2
}

/// Bounds of one octant of a cubic cell.
///
/// Shares the exact center coordinate with its siblings so a point is always
/// inside the octant `octant_of` picks for it.
pub fn child_bounds(bounds: &Aabb3, octant: u8) -> Aabb3 {
  let center = bounds.center();
  let mut min = bounds.min;
  let mut max = bounds.max;
  for axis in 0..3 {
    if (octant >> axis) & 1 != 0 {
      min[axis] = center[axis];
    } else {
      max[axis] = center[axis];
    }
  }
  Aabb3::new(min, max)
}

#[cfg(test)]
#[path = "node_test.rs"]
mod node_test;
