//! Navigator - control-loop facade over roadmap, solver and field.
//!
//! One navigator is one navigation episode: a roadmap built against an
//! oracle, a background solver, and the field agents query. The control loop
//! calls [`Navigator::tick`] once per frame; agents call
//! [`Navigator::query_direction`] (or read [`Navigator::shared_field`] from
//! other threads).
//!
//! ```text
//!   new / rebuild ──► RoadmapBuilder ──► Arc<Roadmap>
//!                                          │ request_solve / set_goal
//!                                          ▼
//!                                     AsyncSolver (rayon)
//!                                          │ tick: poll_results
//!                                          ▼
//!                                     GradientField ──► SharedField ──► agents
//! ```

use std::sync::Arc;

use glam::Vec3;

use crate::config::NavConfig;
use crate::constants::GOAL_INDEX;
use crate::error::{NavError, NavResult};
use crate::field::{GradientField, SharedField};
use crate::metrics::NavMetrics;
use crate::oracle::GeometryOracle;
use crate::roadmap::{BuildStats, Roadmap, RoadmapBuilder};
use crate::search::{AsyncSolver, SolvePoll, SolveState};

/// What a finished solve did to the published field.
#[derive(Debug)]
pub enum SolveEvent {
  /// A new field is live.
  Published {
    /// Field version after publication.
    version: u64,
    /// Roadmap nodes with a path to the goal.
    reached: usize,
  },
  /// The solve was cancelled; the previous field stays live.
  Cancelled,
  /// The solve faulted; the previous field stays live.
  Failed(NavError),
}

/// Per-episode navigation state driven by a real-time loop.
pub struct Navigator<O: GeometryOracle> {
  config: NavConfig,
  oracle: O,
  roadmap: Arc<Roadmap>,
  build_stats: BuildStats,
  solver: AsyncSolver,
  field: Arc<SharedField>,
  metrics: NavMetrics,
}

impl<O: GeometryOracle> Navigator<O> {
  /// Validate `config` and build the roadmap from `start` to `goal`.
  ///
  /// No solve is started; call [`request_solve`](Self::request_solve).
  pub fn new(config: NavConfig, oracle: O, start: Vec3, goal: Vec3) -> NavResult<Self> {
    config.validate()?;

    let (roadmap, build_stats) =
      RoadmapBuilder::new(config.roadmap.clone()).build_with_stats(start, goal, &oracle);
    let mut metrics = NavMetrics::new();
    metrics.record_build(&build_stats, roadmap.len());

    Ok(Self {
      config,
      oracle,
      roadmap: Arc::new(roadmap),
      build_stats,
      solver: AsyncSolver::new(),
      field: Arc::new(SharedField::new()),
      metrics,
    })
  }

  /// Start solving the current roadmap from the goal.
  ///
  /// An in-flight solve is cancelled and waited for first.
  pub fn request_solve(&mut self) -> NavResult<()> {
    if let Some(poll) = self.solver.start(Arc::clone(&self.roadmap), GOAL_INDEX)? {
      self.record_discarded(&poll);
    }
    Ok(())
  }

  /// Request cancellation of the in-flight solve. The next
  /// [`tick`](Self::tick) that sees it stop reports [`SolveEvent::Cancelled`].
  pub fn cancel_solve(&self) {
    self.solver.cancel();
  }

  /// Poll the background solve and publish its field when done.
  ///
  /// Returns `None` while idle or still running.
  pub fn tick(&mut self) -> Option<SolveEvent> {
    let poll = self.solver.poll_results()?;
    Some(self.apply(poll))
  }

  /// Block until the in-flight solve finishes, then handle it like
  /// [`tick`](Self::tick).
  pub fn wait_for_solve(&mut self) -> Option<SolveEvent> {
    let poll = self.solver.wait()?;
    Some(self.apply(poll))
  }

  /// Move the goal and re-solve. Only the goal's edges are recomputed.
  pub fn set_goal(&mut self, goal: Vec3) -> NavResult<()> {
    let roadmap = &self.config.roadmap;
    self.roadmap = Arc::new(self.roadmap.with_goal(
      goal,
      roadmap.agent_radius,
      roadmap.max_connection_distance,
      &self.oracle,
    ));

    #[cfg(feature = "tracing")]
    tracing::debug!(?goal, degree = self.roadmap.degree(GOAL_INDEX), "goal relocated");

    self.request_solve()
  }

  /// Start a new episode: drop the field and rebuild the roadmap, e.g.
  /// after the obstacles changed.
  pub fn rebuild(&mut self, start: Vec3, goal: Vec3) {
    self.solver.cancel();
    if let Some(poll) = self.solver.wait() {
      self.record_discarded(&poll);
    }
    self.field.clear();
    self.build_roadmap(start, goal);
  }

  /// Steering direction for an agent at `point`.
  ///
  /// `None` when no field is published or no path is visible from here.
  pub fn query_direction(&self, point: Vec3) -> Option<Vec3> {
    self.field.query_direction(self.resolve(point), &self.oracle)
  }

  /// [`query_direction`](Self::query_direction) for many agents in parallel.
  pub fn query_many(&self, points: &[Vec3]) -> Vec<Option<Vec3>> {
    let Some(field) = self.field.load() else {
      return vec![None; points.len()];
    };
    if self.config.resolve_penetration {
      let resolved: Vec<Vec3> = points.iter().map(|&p| self.resolve(p)).collect();
      field.query_many(&resolved, &self.oracle)
    } else {
      field.query_many(points, &self.oracle)
    }
  }

  /// Current field snapshot.
  pub fn field(&self) -> Option<Arc<GradientField>> {
    self.field.load()
  }

  /// Shared field handle for readers on other threads.
  pub fn shared_field(&self) -> Arc<SharedField> {
    Arc::clone(&self.field)
  }

  pub fn field_version(&self) -> u64 {
    self.field.version()
  }

  pub fn roadmap(&self) -> &Arc<Roadmap> {
    &self.roadmap
  }

  /// Stats of the last roadmap build.
  pub fn build_stats(&self) -> &BuildStats {
    &self.build_stats
  }

  pub fn metrics(&self) -> &NavMetrics {
    &self.metrics
  }

  pub fn solve_state(&self) -> SolveState {
    self.solver.state()
  }

  pub fn is_solving(&self) -> bool {
    self.solver.is_busy()
  }

  pub fn config(&self) -> &NavConfig {
    &self.config
  }

  pub fn oracle(&self) -> &O {
    &self.oracle
  }

  /// Mutable oracle access. Call [`rebuild`](Self::rebuild) afterwards so
  /// the roadmap reflects the change.
  pub fn oracle_mut(&mut self) -> &mut O {
    &mut self.oracle
  }

  fn build_roadmap(&mut self, start: Vec3, goal: Vec3) {
    let builder = RoadmapBuilder::new(self.config.roadmap.clone());
    let (roadmap, stats) = builder.build_with_stats(start, goal, &self.oracle);
    self.metrics.record_build(&stats, roadmap.len());
    self.roadmap = Arc::new(roadmap);
    self.build_stats = stats;
  }

  fn resolve(&self, point: Vec3) -> Vec3 {
    if self.config.resolve_penetration {
      point + self.oracle.penetration_resolve(point, self.config.field.agent_radius)
    } else {
      point
    }
  }

  fn apply(&mut self, poll: SolvePoll) -> SolveEvent {
    match poll {
      SolvePoll::Completed(output) => {
        let roadmap = Arc::clone(&self.roadmap);
        let field = GradientField::from_solution(roadmap, &output, self.config.field);
        let version = self.field.publish(field);
        self
          .metrics
          .record_solve_completed(output.solve_time_us, output.reached_count());

        #[cfg(feature = "tracing")]
        tracing::info!(
          version,
          reached = output.reached_count(),
          nodes = self.roadmap.len(),
          time_us = output.solve_time_us,
          "gradient field ready"
        );

        SolveEvent::Published {
          version,
          reached: output.reached_count(),
        }
      }
      SolvePoll::Cancelled => {
        self.metrics.record_solve_cancelled();
        SolveEvent::Cancelled
      }
      SolvePoll::Failed(err) => {
        self.metrics.record_solve_failed();
        SolveEvent::Failed(err)
      }
      SolvePoll::Pending => SolveEvent::Failed(NavError::SolveFailed(
        "pending solve reported as finished".into(),
      )),
    }
  }

  fn record_discarded(&mut self, poll: &SolvePoll) {
    match poll {
      SolvePoll::Cancelled => self.metrics.record_solve_cancelled(),
      SolvePoll::Failed(_) => self.metrics.record_solve_failed(),
      _ => {}
    }
  }
}

#[cfg(test)]
#[path = "navigator_test.rs"]
mod navigator_test;
