use glam::Vec3;

use super::*;
use crate::octree::Aabb3;
use crate::oracle::{ObstacleSet, OpenSpace};

/// `side x side` grid in the XZ plane with unit spacing, origin first.
fn grid(side: usize) -> Vec<Vec3> {
  let mut points = Vec::new();
  for z in 0..side {
    for x in 0..side {
      points.push(Vec3::new(x as f32, 0.0, z as f32));
    }
  }
  points
}

fn wall_at_x(x: f32) -> ObstacleSet {
  ObstacleSet::new().with_box(Aabb3::new(
    Vec3::new(x - 0.05, -10.0, -10.0),
    Vec3::new(x + 0.05, 10.0, 10.0),
  ))
}

#[test]
fn test_weight_matrix_is_symmetric() {
  let mut weights = WeightMatrix::new(3);
  weights.set(0, 2, 1.5);
  assert_eq!(weights.get(0, 2), 1.5);
  assert_eq!(weights.get(2, 0), 1.5);
  assert_eq!(weights.edge_count(), 1);

  weights.set(1, 1, 9.0);
  assert_eq!(weights.get(1, 1), NO_EDGE);

  weights.clear(2, 0);
  assert_eq!(weights.edge_count(), 0);
}

#[test]
fn test_out_of_range_ids_have_no_edges() {
  let mut weights = WeightMatrix::new(3);
  weights.set(1, 0, 7.0);
  assert_eq!(weights.get(0, 3), NO_EDGE);
  assert_eq!(weights.get(3, 0), NO_EDGE);
  assert!(weights.row(3).is_empty());

  let roadmap = Roadmap::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y], weights, 4);
  // Row 0 followed by row 1 in memory: (0, 3) must not alias (1, 0)
  assert_eq!(roadmap.weight(0, 1), Some(7.0));
  assert_eq!(roadmap.weight(0, 3), None);
  assert!(!roadmap.has_edge(0, 3));
  assert!(!roadmap.has_edge(3, 1));
  assert_eq!(roadmap.neighbors(3).count(), 0);
  assert_eq!(roadmap.degree(5), 0);
}

#[test]
fn test_connect_respects_max_distance() {
  let roadmap = Roadmap::connect(grid(3), 1.0, 0.0, &OpenSpace, 4);

  // 3x3 grid, 4-neighborhood: 12 unit edges, diagonals (1.414) excluded
  assert_eq!(roadmap.edge_count(), 12);
  assert_eq!(roadmap.weight(0, 1), Some(1.0));
  assert_eq!(roadmap.weight(0, 4), None);
  assert_eq!(roadmap.degree(4), 4);
  assert_eq!(roadmap.degree(0), 2);
}

#[test]
fn test_connect_is_symmetric_without_self_edges() {
  let roadmap = Roadmap::connect(grid(4), 1.5, 0.0, &OpenSpace, 2);
  for i in 0..roadmap.len() {
    assert!(!roadmap.has_edge(i, i));
    for j in 0..roadmap.len() {
      assert_eq!(roadmap.weight(i, j), roadmap.weight(j, i));
    }
  }
}

#[test]
fn test_connect_blocked_by_obstacle() {
  let points = vec![Vec3::new(-1.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 1.0)];
  let roadmap = Roadmap::connect(points, 5.0, 0.1, &wall_at_x(0.0), 64);

  assert!(!roadmap.has_edge(0, 1));
  assert!(!roadmap.has_edge(1, 2));
  assert_eq!(roadmap.weight(0, 2), Some(1.0));
}

#[test]
fn test_neighbors_lists_real_edges_only() {
  let roadmap = Roadmap::connect(grid(3), 1.0, 0.0, &OpenSpace, 64);
  let mut neighbors: Vec<usize> = roadmap.neighbors(4).map(|(j, _)| j).collect();
  neighbors.sort_unstable();
  assert_eq!(neighbors, vec![1, 3, 5, 7]);
  assert!(roadmap.neighbors(4).all(|(_, w)| w == 1.0));
}

#[test]
fn test_with_goal_only_touches_goal_row() {
  let roadmap = Roadmap::connect(grid(3), 1.0, 0.0, &OpenSpace, 64);
  let moved = roadmap.with_goal(Vec3::new(2.0, 0.0, 3.0), 0.0, 1.0, &OpenSpace);

  assert_eq!(moved.goal_position(), Some(Vec3::new(2.0, 0.0, 3.0)));
  assert_eq!(moved.len(), roadmap.len());
  // Old goal edges gone, new ones present
  assert!(!moved.has_edge(0, 1));
  assert!(!moved.has_edge(0, 3));
  assert_eq!(moved.weight(0, 8), Some(1.0));
  assert_eq!(moved.degree(0), 1);
  // Unrelated edges unchanged
  assert_eq!(moved.weight(4, 5), roadmap.weight(4, 5));
  assert_eq!(moved.edge_count(), roadmap.edge_count() - 2 + 1);
  // Spatial index follows the new goal
  assert!(moved.index().query_sphere(Vec3::new(2.0, 0.0, 3.0), 0.1).contains(&0));
}

#[test]
fn test_new_wraps_existing_matrix() {
  let points = vec![Vec3::ZERO, Vec3::X, Vec3::Y];
  let mut weights = WeightMatrix::new(3);
  weights.set(0, 1, 1.0);
  let roadmap = Roadmap::new(points, weights, 8);

  assert_eq!(roadmap.len(), 3);
  assert_eq!(roadmap.edge_count(), 1);
  assert_eq!(roadmap.degree(2), 0);
  assert_eq!(roadmap.index().len(), 3);
}

#[test]
fn test_empty_roadmap() {
  let roadmap = Roadmap::new(Vec::new(), WeightMatrix::new(0), 8);
  assert!(roadmap.is_empty());
  assert_eq!(roadmap.goal_position(), None);
  assert_eq!(roadmap.edge_count(), 0);
}
