//! Single-source Dijkstra from the goal over a roadmap.
//!
//! ```text
//!   open (PriorityQueue)          closed (ClosedSet)
//!   ┌──────────────────┐  pop    ┌──────────────────┐
//!   │ goal, depth 0    │ ──────► │ settled, final   │
//!   └──────────────────┘         └──────────────────┘
//!        ▲  push / reparent            │
//!        └──── neighbors of popped ◄───┘
//! ```
//!
//! Cancellation is polled once per iteration, before each pop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use web_time::Instant;

use super::node::{ClosedSet, SearchNode};
use super::queue::PriorityQueue;
use crate::error::{NavError, NavResult};
use crate::roadmap::Roadmap;

// =============================================================================
// CancelToken
// =============================================================================

/// Cooperative cancellation flag shared between the control loop and a solve.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
  pub fn new() -> Self {
    Self::default()
  }

  /// Ask the solve to stop at its next iteration.
  pub fn cancel(&self) {
    self.0.store(true, Ordering::Release);
  }

  #[inline]
  pub fn is_cancelled(&self) -> bool {
    self.0.load(Ordering::Acquire)
  }
}

// =============================================================================
// SolveOutput
// =============================================================================

/// Shortest distance and predecessor toward the goal for every roadmap node.
#[derive(Clone, Debug, PartialEq)]
pub struct SolveOutput {
  goal: usize,
  depths: Vec<f32>,
  parents: Vec<Option<usize>>,
  reached: usize,
  /// Wall time of the solve in microseconds.
  pub solve_time_us: u64,
}

impl SolveOutput {
  fn from_closed(goal: usize, len: usize, closed: ClosedSet) -> Self {
    let mut depths = vec![f32::INFINITY; len];
    let mut parents = vec![None; len];
    let reached = closed.len();
    for node in closed.into_slots().into_iter().flatten() {
      depths[node.id] = node.depth;
      parents[node.id] = node.parent;
    }
    Self {
      goal,
      depths,
      parents,
      reached,
      solve_time_us: 0,
    }
  }

  /// Node the solve started from.
  pub fn goal(&self) -> usize {
    self.goal
  }

  /// Number of roadmap nodes covered.
  pub fn len(&self) -> usize {
    self.depths.len()
  }

  pub fn is_empty(&self) -> bool {
    self.depths.is_empty()
  }

  /// Shortest graph distance to the goal, `f32::INFINITY` when unreached.
  pub fn depth(&self, id: usize) -> f32 {
    self.depths.get(id).copied().unwrap_or(f32::INFINITY)
  }

  /// Next node toward the goal. `None` for the goal and unreached nodes.
  pub fn parent(&self, id: usize) -> Option<usize> {
    self.parents.get(id).copied().flatten()
  }

  pub fn is_reached(&self, id: usize) -> bool {
    self.depth(id).is_finite()
  }

  /// Number of nodes with a path to the goal (goal included).
  pub fn reached_count(&self) -> usize {
    self.reached
  }

  /// Largest finite depth, zero when only the goal was reached.
  pub fn max_depth(&self) -> f32 {
    self
      .depths
      .iter()
      .copied()
      .filter(|d| d.is_finite())
      .fold(0.0, f32::max)
  }

  /// Node ids from `id` to the goal, both included.
  pub fn path_to_goal(&self, id: usize) -> Option<Vec<usize>> {
    if !self.is_reached(id) {
      return None;
    }
    let mut path = vec![id];
    let mut current = id;
    while let Some(parent) = self.parent(current) {
      // A parent chain can never be longer than the node count.
      if path.len() > self.len() {
        return None;
      }
      path.push(parent);
      current = parent;
    }
    Some(path)
  }

  pub fn depths(&self) -> &[f32] {
    &self.depths
  }
}

/// How a solve ended.
#[derive(Clone, Debug, PartialEq)]
pub enum SolveOutcome {
  /// Every reachable node settled.
  Completed(SolveOutput),
  /// Stopped by the cancel token; no output.
  Cancelled,
}

impl SolveOutcome {
  pub fn is_cancelled(&self) -> bool {
    matches!(self, SolveOutcome::Cancelled)
  }

  /// The output, if the solve completed.
  pub fn completed(self) -> Option<SolveOutput> {
    match self {
      SolveOutcome::Completed(output) => Some(output),
      SolveOutcome::Cancelled => None,
    }
  }
}

// =============================================================================
// solve
// =============================================================================

/// Dijkstra from `goal` over the undirected roadmap graph.
///
/// Returns [`NavError::InvalidGoal`] for an out-of-range goal. Unreached
/// nodes get infinite depth.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "search::solve"))]
pub fn solve(roadmap: &Roadmap, goal: usize, cancel: &CancelToken) -> NavResult<SolveOutcome> {
  let len = roadmap.len();
  if goal >= len {
    return Err(NavError::InvalidGoal { goal, len });
  }

  let started = Instant::now();
  let points = roadmap.points();
  let mut open = PriorityQueue::with_capacity(len);
  let mut closed = ClosedSet::new(len);
  open.push(SearchNode::root(goal, points[goal]));

  while !open.is_empty() {
    if cancel.is_cancelled() {
      #[cfg(feature = "tracing")]
      tracing::debug!(settled = closed.len(), "solve cancelled");
      return Ok(SolveOutcome::Cancelled);
    }

    let current = open.pop()?;
    closed.insert(current);

    for (neighbor, weight) in roadmap.neighbors(current.id) {
      if closed.contains(neighbor) {
        continue;
      }
      if open.contains(neighbor) {
        open.reparent(neighbor, &current, weight);
      } else {
        open.push(current.child(neighbor, points[neighbor], weight));
      }
    }
  }

  let mut output = SolveOutput::from_closed(goal, len, closed);
  output.solve_time_us = started.elapsed().as_micros() as u64;

  #[cfg(feature = "tracing")]
  tracing::debug!(
    reached = output.reached_count(),
    nodes = len,
    time_us = output.solve_time_us,
    "solve completed"
  );

  Ok(SolveOutcome::Completed(output))
}

#[cfg(test)]
#[path = "solver_test.rs"]
mod solver_test;
