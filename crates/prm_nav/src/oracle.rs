//! Geometry oracle - the collision queries the navigation core depends on.
//!
//! The core never touches physics primitives directly. Everything it needs to
//! know about obstacles goes through [`GeometryOracle`], which an engine
//! bridge implements on top of its own collision world.
//!
//! Two implementations ship with the crate:
//! - [`OpenSpace`]: no obstacles at all.
//! - [`ObstacleSet`]: analytic spheres and axis-aligned boxes, for tests,
//!   benches and engines without a physics backend.
//!
//! # Edge validity
//!
//! `segment_blocked` is a swept-sphere (capsule) test rather than a series of
//! point samples along the segment, so thin obstacles cannot slip between
//! samples. For boxes the capsule is approximated by the box inflated by the
//! radius, which over-reports contact near box corners by at most
//! `radius * (sqrt(3) - 1)`.

use std::sync::Arc;

use glam::Vec3;

use crate::octree::Aabb3;

/// Collision queries provided by the host environment.
pub trait GeometryOracle: Send + Sync {
  /// True when a sphere of `radius` at `point` overlaps no obstacle.
  fn is_point_valid(&self, point: Vec3, radius: f32) -> bool;

  /// True when a sphere of `radius` swept from `a` to `b` hits an obstacle.
  fn segment_blocked(&self, a: Vec3, b: Vec3, radius: f32) -> bool;

  /// Closest obstacle surface point, or `None` when there are no obstacles.
  fn nearest_surface(&self, point: Vec3) -> Option<Vec3>;

  /// Displacement that moves a sphere of `radius` at `point` out of every
  /// obstacle it penetrates. Zero when already free.
  fn penetration_resolve(&self, point: Vec3, radius: f32) -> Vec3;
}

impl<T: GeometryOracle + ?Sized> GeometryOracle for &T {
  fn is_point_valid(&self, point: Vec3, radius: f32) -> bool {
    (**self).is_point_valid(point, radius)
  }

  fn segment_blocked(&self, a: Vec3, b: Vec3, radius: f32) -> bool {
    (**self).segment_blocked(a, b, radius)
  }

  fn nearest_surface(&self, point: Vec3) -> Option<Vec3> {
    (**self).nearest_surface(point)
  }

  fn penetration_resolve(&self, point: Vec3, radius: f32) -> Vec3 {
    (**self).penetration_resolve(point, radius)
  }
}

impl<T: GeometryOracle + ?Sized> GeometryOracle for Arc<T> {
  fn is_point_valid(&self, point: Vec3, radius: f32) -> bool {
    (**self).is_point_valid(point, radius)
  }

  fn segment_blocked(&self, a: Vec3, b: Vec3, radius: f32) -> bool {
    (**self).segment_blocked(a, b, radius)
  }

  fn nearest_surface(&self, point: Vec3) -> Option<Vec3> {
    (**self).nearest_surface(point)
  }

  fn penetration_resolve(&self, point: Vec3, radius: f32) -> Vec3 {
    (**self).penetration_resolve(point, radius)
  }
}

impl<T: GeometryOracle + ?Sized> GeometryOracle for Box<T> {
  fn is_point_valid(&self, point: Vec3, radius: f32) -> bool {
    (**self).is_point_valid(point, radius)
  }

  fn segment_blocked(&self, a: Vec3, b: Vec3, radius: f32) -> bool {
    (**self).segment_blocked(a, b, radius)
  }

  fn nearest_surface(&self, point: Vec3) -> Option<Vec3> {
    (**self).nearest_surface(point)
  }

  fn penetration_resolve(&self, point: Vec3, radius: f32) -> Vec3 {
    (**self).penetration_resolve(point, radius)
  }
}

/// Oracle for a world without obstacles.
#[derive(Clone, Copy, Debug, Default)]
pub struct OpenSpace;

impl GeometryOracle for OpenSpace {
  fn is_point_valid(&self, _point: Vec3, _radius: f32) -> bool {
    true
  }

  fn segment_blocked(&self, _a: Vec3, _b: Vec3, _radius: f32) -> bool {
    false
  }

  fn nearest_surface(&self, _point: Vec3) -> Option<Vec3> {
    None
  }

  fn penetration_resolve(&self, _point: Vec3, _radius: f32) -> Vec3 {
    Vec3::ZERO
  }
}

/// Static obstacle primitive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Obstacle {
  /// Solid sphere.
  Sphere {
    /// Sphere center.
    center: Vec3,
    /// Sphere radius.
    radius: f32,
  },
  /// Solid axis-aligned box.
  Box(Aabb3),
}

impl Obstacle {
  /// Distance from `point` to the obstacle (0 when inside).
  fn distance(&self, point: Vec3) -> f32 {
    match *self {
      Obstacle::Sphere { center, radius } => (point.distance(center) - radius).max(0.0),
      Obstacle::Box(aabb) => aabb.closest_point(point).distance(point),
    }
  }

  fn segment_hits(&self, a: Vec3, b: Vec3, radius: f32) -> bool {
    match *self {
      Obstacle::Sphere { center, radius: r } => distance_to_segment(center, a, b) < r + radius,
      Obstacle::Box(aabb) => {
        let inflated = Aabb3::new(aabb.min - Vec3::splat(radius), aabb.max + Vec3::splat(radius));
        segment_intersects_box(a, b, &inflated)
      }
    }
  }

  fn surface_point(&self, point: Vec3) -> Vec3 {
    match *self {
      Obstacle::Sphere { center, radius } => center + (point - center).normalize_or(Vec3::Y) * radius,
      Obstacle::Box(aabb) => {
        if !aabb.contains_point(point) {
          return aabb.closest_point(point);
        }
        let (axis, face, _) = nearest_face(&aabb, point);
        let mut surface = point;
        surface[axis] = face;
        surface
      }
    }
  }

  fn push_out(&self, point: Vec3, radius: f32) -> Vec3 {
    match *self {
      Obstacle::Sphere { center, radius: r } => {
        let offset = point - center;
        let depth = r + radius - offset.length();
        if depth <= 0.0 {
          return Vec3::ZERO;
        }
        offset.normalize_or(Vec3::Y) * depth
      }
      Obstacle::Box(aabb) => {
        if aabb.contains_point(point) {
          let (axis, face, outward) = nearest_face(&aabb, point);
          let mut push = Vec3::ZERO;
          push[axis] = face - point[axis] + outward * radius;
          return push;
        }
        let closest = aabb.closest_point(point);
        let offset = point - closest;
        let dist = offset.length();
        if dist >= radius || dist <= f32::EPSILON {
          return Vec3::ZERO;
        }
        offset / dist * (radius - dist)
      }
    }
  }
}

/// Analytic obstacle world made of spheres and boxes.
#[derive(Clone, Debug, Default)]
pub struct ObstacleSet {
  obstacles: Vec<Obstacle>,
}

impl ObstacleSet {
  /// Create an empty set.
  pub fn new() -> Self {
    Self::default()
  }

  /// Add a sphere obstacle.
  pub fn with_sphere(mut self, center: Vec3, radius: f32) -> Self {
    self.obstacles.push(Obstacle::Sphere { center, radius });
    self
  }

  /// Add a box obstacle.
  pub fn with_box(mut self, aabb: Aabb3) -> Self {
    self.obstacles.push(Obstacle::Box(aabb));
    self
  }

  /// Add any obstacle.
  pub fn push(&mut self, obstacle: Obstacle) {
    self.obstacles.push(obstacle);
  }

  /// All obstacles.
  pub fn obstacles(&self) -> &[Obstacle] {
    &self.obstacles
  }

  /// Number of obstacles.
  pub fn len(&self) -> usize {
    self.obstacles.len()
  }

  /// True when there are no obstacles.
  pub fn is_empty(&self) -> bool {
    self.obstacles.is_empty()
  }
}

impl GeometryOracle for ObstacleSet {
  fn is_point_valid(&self, point: Vec3, radius: f32) -> bool {
    self.obstacles.iter().all(|o| o.distance(point) > radius)
  }

  fn segment_blocked(&self, a: Vec3, b: Vec3, radius: f32) -> bool {
    self.obstacles.iter().any(|o| o.segment_hits(a, b, radius))
  }

  fn nearest_surface(&self, point: Vec3) -> Option<Vec3> {
    self
      .obstacles
      .iter()
      .map(|o| o.surface_point(point))
      .min_by(|a, b| a.distance_squared(point).total_cmp(&b.distance_squared(point)))
  }

  fn penetration_resolve(&self, point: Vec3, radius: f32) -> Vec3 {
    self.obstacles.iter().map(|o| o.push_out(point, radius)).sum()
  }
}

/// Shortest distance from `point` to the segment `a`-`b`.
pub fn distance_to_segment(point: Vec3, a: Vec3, b: Vec3) -> f32 {
  let ab = b - a;
  let len_sq = ab.length_squared();
  if len_sq <= f32::EPSILON {
    return point.distance(a);
  }
  let t = ((point - a).dot(ab) / len_sq).clamp(0.0, 1.0);
  point.distance(a + ab * t)
}

/// Slab test of the segment `a`-`b` against a box (touching counts).
pub fn segment_intersects_box(a: Vec3, b: Vec3, aabb: &Aabb3) -> bool {
  let dir = b - a;
  let mut t_min = 0.0f32;
  let mut t_max = 1.0f32;

  for axis in 0..3 {
    let (origin, delta) = (a[axis], dir[axis]);
    let (lo, hi) = (aabb.min[axis], aabb.max[axis]);

    if delta.abs() <= f32::EPSILON {
      if origin < lo || origin > hi {
        return false;
      }
      continue;
    }

    let inv = 1.0 / delta;
    let (mut t0, mut t1) = ((lo - origin) * inv, (hi - origin) * inv);
    if t0 > t1 {
      std::mem::swap(&mut t0, &mut t1);
    }
    t_min = t_min.max(t0);
    t_max = t_max.min(t1);
    if t_min > t_max {
      return false;
    }
  }

  true
}

/// Axis, coordinate and outward sign of the box face closest to an interior
/// point.
fn nearest_face(aabb: &Aabb3, point: Vec3) -> (usize, f32, f32) {
  let mut best = (0, aabb.min.x, -1.0, f32::INFINITY);
  for axis in 0..3 {
    let to_min = point[axis] - aabb.min[axis];
    let to_max = aabb.max[axis] - point[axis];
    if to_min < best.3 {
      best = (axis, aabb.min[axis], -1.0, to_min);
    }
    if to_max < best.3 {
      best = (axis, aabb.max[axis], 1.0, to_max);
    }
  }
  (best.0, best.1, best.2)
}

#[cfg(test)]
#[path = "oracle_test.rs"]
mod oracle_test;
