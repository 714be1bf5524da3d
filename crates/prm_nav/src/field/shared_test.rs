use std::sync::Arc;
use std::thread;

use super::*;
use crate::config::FieldConfig;
use crate::oracle::OpenSpace;
use crate::roadmap::Roadmap;
use crate::search::{solve, CancelToken, SolveOutcome};

fn line_roadmap(goal_x: f32) -> Arc<Roadmap> {
  let points = vec![
    Vec3::new(goal_x, 0.0, 0.0),
    Vec3::new(5.0, 0.0, 0.0),
    Vec3::new(6.0, 0.0, 0.0),
  ];
  Arc::new(Roadmap::connect(points, 10.0, 0.0, &OpenSpace, 8))
}

fn solved_field(roadmap: Arc<Roadmap>) -> GradientField {
  let output = solve(&roadmap, 0, &CancelToken::new())
    .unwrap()
    .completed()
    .unwrap();
  GradientField::from_solution(roadmap, &output, FieldConfig::default())
}

#[test]
fn test_nothing_published() {
  let shared = SharedField::new();
  assert_eq!(shared.version(), 0);
  assert!(!shared.is_published());
  assert!(shared.load().is_none());
  assert_eq!(shared.query_direction(Vec3::ZERO, &OpenSpace), None);
}

#[test]
fn test_publish_bumps_version() {
  let shared = SharedField::new();
  assert_eq!(shared.publish(solved_field(line_roadmap(0.0))), 1);
  assert_eq!(shared.publish(solved_field(line_roadmap(1.0))), 2);
  assert_eq!(shared.version(), 2);
  assert_eq!(shared.load().unwrap().goal_position(), Vec3::X);

  assert_eq!(shared.clear(), 3);
  assert!(!shared.is_published());
}

#[test]
fn test_reader_keeps_old_snapshot() {
  let shared = SharedField::new();
  shared.publish(solved_field(line_roadmap(0.0)));
  let old = shared.load().unwrap();

  shared.publish(solved_field(line_roadmap(10.0)));
  assert_eq!(old.goal_position(), Vec3::ZERO);
  assert_eq!(shared.load().unwrap().goal_position(), Vec3::new(10.0, 0.0, 0.0));
}

#[test]
fn test_cancelled_solve_leaves_field_unchanged() {
  let shared = SharedField::new();
  shared.publish(solved_field(line_roadmap(0.0)));
  let before = shared.version();

  let cancel = CancelToken::new();
  cancel.cancel();
  let outcome = solve(&line_roadmap(10.0), 0, &cancel).unwrap();
  assert_eq!(outcome, SolveOutcome::Cancelled);
  if let Some(output) = outcome.completed() {
    shared.publish(GradientField::from_solution(line_roadmap(10.0), &output, FieldConfig::default()));
  }

  assert_eq!(shared.version(), before);
  let dir = shared.query_direction(Vec3::new(3.0, 0.0, 0.0), &OpenSpace).unwrap();
  assert!((dir - Vec3::new(-1.0, 0.0, 0.0)).length() < 1e-6);
}

#[test]
fn test_concurrent_readers_see_whole_fields() {
  let shared = Arc::new(SharedField::new());
  shared.publish(solved_field(line_roadmap(0.0)));

  let readers: Vec<_> = (0..4)
    .map(|_| {
      let shared = Arc::clone(&shared);
      thread::spawn(move || {
        for _ in 0..200 {
          let field = shared.load().unwrap();
          let goal = field.goal_position();
          assert!(goal == Vec3::ZERO || goal == Vec3::new(10.0, 0.0, 0.0));
          assert_eq!(field.entries()[0].position, goal);
        }
      })
    })
    .collect();

  for i in 0..50 {
    let goal_x = if i % 2 == 0 { 10.0 } else { 0.0 };
    shared.publish(solved_field(line_roadmap(goal_x)));
  }
  for reader in readers {
    reader.join().unwrap();
  }
  assert_eq!(shared.version(), 51);
}
