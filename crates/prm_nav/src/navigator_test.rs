use super::*;
use crate::config::{FieldConfig, RoadmapConfig};
use crate::octree::Aabb3;
use crate::oracle::{ObstacleSet, OpenSpace};

fn config() -> NavConfig {
  NavConfig::new()
    .with_roadmap(
      RoadmapConfig::new()
        .with_bounds(Aabb3::new(Vec3::splat(-10.0), Vec3::splat(10.0)))
        .with_agent_radius(0.5)
        .with_sample_count(60)
        .with_max_connection_distance(8.0)
        .with_seed(11),
    )
    .with_field(FieldConfig::new().with_agent_radius(0.5))
}

fn solved<O: GeometryOracle>(navigator: &mut Navigator<O>) -> SolveEvent {
  navigator.request_solve().unwrap();
  navigator.wait_for_solve().unwrap()
}

#[test]
fn test_new_rejects_invalid_config() {
  let bad = config().with_field(FieldConfig::new().with_neighbor_count(0));
  let result = Navigator::new(bad, OpenSpace, Vec3::ZERO, Vec3::X);
  assert!(matches!(result, Err(NavError::InvalidConfig(_))));
}

#[test]
fn test_new_rejects_thin_field_on_fat_roadmap() {
  let thin = config().with_field(FieldConfig::new().with_agent_radius(0.1));
  let result = Navigator::new(thin, OpenSpace, Vec3::ZERO, Vec3::X);
  assert!(matches!(result, Err(NavError::InvalidConfig(_))));
}

#[test]
fn test_no_field_before_first_solve() {
  let navigator = Navigator::new(config(), OpenSpace, Vec3::ZERO, Vec3::splat(5.0)).unwrap();

  assert_eq!(navigator.solve_state(), SolveState::Idle);
  assert_eq!(navigator.field_version(), 0);
  assert!(navigator.field().is_none());
  assert_eq!(navigator.query_direction(Vec3::ONE), None);
  assert_eq!(navigator.query_many(&[Vec3::ONE, Vec3::ZERO]), vec![None, None]);
  assert_eq!(navigator.roadmap().len(), 62);
}

#[test]
fn test_solve_publishes_field() {
  let goal = Vec3::new(8.0, 0.0, 0.0);
  let mut navigator = Navigator::new(config(), OpenSpace, Vec3::ZERO, goal).unwrap();

  match solved(&mut navigator) {
    SolveEvent::Published { version, reached } => {
      assert_eq!(version, 1);
      assert!(reached > 1);
    }
    other => panic!("unexpected {:?}", other),
  }
  assert_eq!(navigator.solve_state(), SolveState::Completed);
  assert!(!navigator.is_solving());

  let dir = navigator.query_direction(Vec3::new(-2.0, 0.0, 0.0)).unwrap();
  assert!((dir - Vec3::X).length() < 1e-6);
}

#[test]
fn test_tick_polls_until_published() {
  let mut navigator = Navigator::new(config(), OpenSpace, Vec3::ZERO, Vec3::ONE).unwrap();
  assert!(navigator.tick().is_none());
  navigator.request_solve().unwrap();

  let mut event = None;
  for _ in 0..5000 {
    event = navigator.tick();
    if event.is_some() {
      break;
    }
    std::thread::sleep(std::time::Duration::from_millis(1));
  }
  assert!(matches!(event, Some(SolveEvent::Published { version: 1, .. })));
}

#[test]
fn test_set_goal_relocates_and_resolves() {
  let mut navigator = Navigator::new(config(), OpenSpace, Vec3::ZERO, Vec3::ONE).unwrap();
  solved(&mut navigator);
  let nodes = navigator.roadmap().len();

  let goal = Vec3::new(-6.0, 2.0, 3.0);
  navigator.set_goal(goal).unwrap();
  assert!(matches!(
    navigator.wait_for_solve(),
    Some(SolveEvent::Published { version: 2, .. })
  ));

  assert_eq!(navigator.roadmap().len(), nodes);
  assert_eq!(navigator.roadmap().goal_position(), Some(goal));
  assert_eq!(navigator.field().unwrap().goal_position(), goal);
}

#[test]
fn test_cancel_keeps_previous_field() {
  let mut navigator = Navigator::new(config(), OpenSpace, Vec3::ZERO, Vec3::ONE).unwrap();
  solved(&mut navigator);
  let previous = navigator.field().unwrap();

  navigator.request_solve().unwrap();
  navigator.cancel_solve();
  match navigator.wait_for_solve().unwrap() {
    SolveEvent::Cancelled => {
      assert_eq!(navigator.field_version(), 1);
      assert!(Arc::ptr_eq(&previous, &navigator.field().unwrap()));
      assert!(navigator.query_direction(Vec3::ZERO).is_some());
    }
    // Finished before the cancel landed
    SolveEvent::Published { version, .. } => assert_eq!(version, 2),
    SolveEvent::Failed(err) => panic!("unexpected failure {}", err),
  }
}

#[test]
fn test_rebuild_starts_new_episode() {
  let mut navigator = Navigator::new(config(), OpenSpace, Vec3::ZERO, Vec3::ONE).unwrap();
  solved(&mut navigator);
  assert!(navigator.field().is_some());

  navigator.rebuild(Vec3::splat(-5.0), Vec3::splat(5.0));
  assert!(navigator.field().is_none());
  assert_eq!(navigator.field_version(), 2);
  assert_eq!(navigator.roadmap().goal_position(), Some(Vec3::splat(5.0)));
  assert_eq!(navigator.query_direction(Vec3::ZERO), None);
}

#[test]
fn test_penetration_is_resolved_before_query() {
  // Agent sunk into a sphere right below the goal
  let oracle = ObstacleSet::new().with_sphere(Vec3::ZERO, 1.0);
  let goal = Vec3::new(0.0, 8.0, 0.0);
  let field = FieldConfig::new().with_agent_radius(0.5).with_sample_radius(0.1);
  let inside = Vec3::new(0.0, 0.5, 0.0);

  let start = Vec3::new(5.0, 0.0, 0.0);

  let mut resolving = Navigator::new(config().with_field(field), oracle.clone(), start, goal).unwrap();
  solved(&mut resolving);
  // Pushed to y = 1.5, from where the goal is in sight
  let dir = resolving.query_direction(inside).unwrap();
  assert!((dir - Vec3::Y).length() < 1e-6);

  let mut raw = Navigator::new(
    config().with_field(field).with_resolve_penetration(false),
    oracle,
    start,
    goal,
  )
  .unwrap();
  solved(&mut raw);
  assert_eq!(raw.query_direction(inside), None);
}

#[cfg(feature = "metrics")]
#[test]
fn test_metrics_track_episode() {
  let mut navigator = Navigator::new(config(), OpenSpace, Vec3::ZERO, Vec3::ONE).unwrap();
  solved(&mut navigator);

  let metrics = navigator.metrics();
  assert_eq!(metrics.roadmap_nodes, navigator.roadmap().len());
  assert_eq!(metrics.build_timings.len(), 1);
  assert_eq!(metrics.solves_completed, 1);
  assert!(metrics.coverage() > 0.0);
}
