use glam::Vec3;

use super::*;
use crate::oracle::OpenSpace;
use crate::roadmap::WeightMatrix;

/// 5x5 grid with unit spacing in the XZ plane; node id = z * 5 + x, so the
/// goal corner (0,0) is node 0 and (4,4) is node 24.
fn grid_roadmap(max_distance: f32) -> Roadmap {
  let mut points = Vec::new();
  for z in 0..5 {
    for x in 0..5 {
      points.push(Vec3::new(x as f32, 0.0, z as f32));
    }
  }
  Roadmap::connect(points, max_distance, 0.0, &OpenSpace, 8)
}

fn completed(roadmap: &Roadmap, goal: usize) -> SolveOutput {
  solve(roadmap, goal, &CancelToken::new())
    .unwrap()
    .completed()
    .unwrap()
}

#[test]
fn test_grid_diagonal_connectivity() {
  // 8-connected: diagonal steps of sqrt(2)
  let output = completed(&grid_roadmap(1.5), 0);

  assert_eq!(output.depth(0), 0.0);
  assert!((output.depth(24) - 4.0 * 2f32.sqrt()).abs() < 1e-4);
  assert!((output.depth(24) - 5.657).abs() < 1e-3);
  assert_eq!(output.parent(0), None);
  assert_eq!(output.reached_count(), 25);
}

#[test]
fn test_grid_four_connectivity_chain() {
  // 4-connected: every path to the far corner takes 8 unit hops
  let output = completed(&grid_roadmap(1.0), 0);

  assert!((output.depth(24) - 8.0).abs() < 1e-5);
  let path = output.path_to_goal(24).unwrap();
  assert_eq!(path.len() - 1, 8);
  assert_eq!(path.first(), Some(&24));
  assert_eq!(path.last(), Some(&0));
}

#[test]
fn test_fully_connected_depth_is_euclidean() {
  let roadmap = grid_roadmap(100.0);
  let output = completed(&roadmap, 0);
  let goal = roadmap.points()[0];

  for (i, p) in roadmap.points().iter().enumerate() {
    assert!((output.depth(i) - p.distance(goal)).abs() < 1e-4, "node {}", i);
  }
}

#[test]
fn test_parent_chain_is_consistent() {
  let roadmap = grid_roadmap(1.5);
  let output = completed(&roadmap, 12);

  for id in 0..roadmap.len() {
    if let Some(parent) = output.parent(id) {
      let weight = roadmap.weight(id, parent).unwrap();
      assert!((output.depth(id) - (output.depth(parent) + weight)).abs() < 1e-4);
    }
  }
}

#[test]
fn test_disconnected_cluster_unreached() {
  // Cluster A: 0..3 around the origin, cluster B: 3..6 far away
  let points = vec![
    Vec3::new(0.0, 0.0, 0.0),
    Vec3::new(1.0, 0.0, 0.0),
    Vec3::new(0.0, 0.0, 1.0),
    Vec3::new(50.0, 0.0, 0.0),
    Vec3::new(51.0, 0.0, 0.0),
    Vec3::new(50.0, 0.0, 1.0),
  ];
  let roadmap = Roadmap::connect(points, 2.0, 0.0, &OpenSpace, 8);
  let output = completed(&roadmap, 0);

  for id in 0..3 {
    assert!(output.is_reached(id));
  }
  for id in 3..6 {
    assert!(!output.is_reached(id));
    assert_eq!(output.depth(id), f32::INFINITY);
    assert_eq!(output.parent(id), None);
    assert_eq!(output.path_to_goal(id), None);
  }
  assert_eq!(output.reached_count(), 3);
  assert_eq!(output.max_depth(), 1.0);
}

#[test]
fn test_cancel_before_first_pop() {
  let cancel = CancelToken::new();
  cancel.cancel();

  let outcome = solve(&grid_roadmap(1.5), 0, &cancel).unwrap();
  assert!(outcome.is_cancelled());
  assert_eq!(outcome.completed(), None);
}

#[test]
fn test_invalid_goal() {
  let roadmap = grid_roadmap(1.0);
  let err = solve(&roadmap, 25, &CancelToken::new()).unwrap_err();
  assert!(matches!(err, NavError::InvalidGoal { goal: 25, len: 25 }));
}

#[test]
fn test_isolated_goal_reaches_only_itself() {
  let points = vec![Vec3::ZERO, Vec3::X, Vec3::Y];
  let mut weights = WeightMatrix::new(3);
  weights.set(1, 2, 1.0);
  let output = completed(&Roadmap::new(points, weights, 8), 0);

  assert_eq!(output.reached_count(), 1);
  assert_eq!(output.max_depth(), 0.0);
  assert_eq!(output.path_to_goal(0), Some(vec![0]));
}

#[test]
fn test_shortcut_is_taken_via_reparent() {
  // 0 - 1 direct is long, 0 - 2 - 1 is shorter
  let points = vec![Vec3::ZERO, Vec3::X, Vec3::Y];
  let mut weights = WeightMatrix::new(3);
  weights.set(0, 1, 10.0);
  weights.set(0, 2, 1.0);
  weights.set(2, 1, 1.0);
  let output = completed(&Roadmap::new(points, weights, 8), 0);

  assert_eq!(output.depth(1), 2.0);
  assert_eq!(output.parent(1), Some(2));
}

#[test]
fn test_cancel_token_is_shared() {
  let token = CancelToken::new();
  let clone = token.clone();
  assert!(!token.is_cancelled());
  clone.cancel();
  assert!(token.is_cancelled());
}
