//! Background solve on the rayon pool, polled from the control loop.
//!
//! # Flow
//!
//! ```text
//! Control loop                       Async (rayon)
//! ┌────────────────┐
//! │ start(roadmap, │
//! │       goal)    │
//! └───────┬────────┘
//!         │ spawn
//!         ▼
//!                                  ┌───────────────┐
//!                                  │ solve()       │
//!                                  │ (cancel check │
//!                                  │  per pop)     │
//!                                  └───────┬───────┘
//!                                          │ bounded(1) channel
//! ┌────────────────┐                       │
//! │ poll_results() │◄──────────────────────┘
//! │ Completed /    │
//! │ Cancelled /    │
//! │ Failed         │
//! └────────────────┘
//! ```
//!
//! Only one solve is in flight at a time. Starting a new one cancels the
//! previous solve and waits for it to stop first, so two workers never race
//! to publish a field.
//!
//! # Usage
//!
//! ```ignore
//! let mut solver = AsyncSolver::new();
//! solver.start(Arc::clone(&roadmap), GOAL_INDEX)?;
//!
//! // Each tick
//! if let Some(SolvePoll::Completed(output)) = solver.poll_results() {
//!     shared.publish(GradientField::from_solution(Arc::clone(&roadmap), &output, field_config));
//! }
//! ```

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crossbeam_channel::{self as channel, Receiver, TryRecvError};
use web_time::Instant;

use super::solver::{solve, CancelToken, SolveOutcome, SolveOutput};
use crate::error::{NavError, NavResult};
use crate::roadmap::Roadmap;

/// Lifecycle of the most recent solve.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SolveState {
  /// Nothing has been started.
  #[default]
  Idle,
  Running,
  Completed,
  Cancelled,
  Failed,
}

/// Result of polling a solve.
#[derive(Debug)]
pub enum SolvePoll {
  /// Still running.
  Pending,
  Completed(SolveOutput),
  /// Stopped by a cancel request; no output.
  Cancelled,
  /// The worker faulted or went away.
  Failed(NavError),
}

impl SolvePoll {
  fn from_result(result: NavResult<SolveOutcome>) -> Self {
    match result {
      Ok(SolveOutcome::Completed(output)) => SolvePoll::Completed(output),
      Ok(SolveOutcome::Cancelled) => SolvePoll::Cancelled,
      Err(err) => SolvePoll::Failed(err),
    }
  }

  fn state(&self) -> SolveState {
    match self {
      SolvePoll::Pending => SolveState::Running,
      SolvePoll::Completed(_) => SolveState::Completed,
      SolvePoll::Cancelled => SolveState::Cancelled,
      SolvePoll::Failed(_) => SolveState::Failed,
    }
  }
}

// =============================================================================
// SolveHandle
// =============================================================================

/// Handle to one background solve.
pub struct SolveHandle {
  receiver: Receiver<NavResult<SolveOutcome>>,
  cancel: CancelToken,
  goal: usize,
  started: Instant,
}

impl SolveHandle {
  /// Spawn a solve of `roadmap` from `goal` on the rayon pool.
  pub fn spawn(roadmap: Arc<Roadmap>, goal: usize) -> Self {
    let (sender, receiver) = channel::bounded(1);
    let cancel = CancelToken::new();
    let token = cancel.clone();

    rayon::spawn(move || {
      let result = run_guarded(|| solve(&roadmap, goal, &token));
      // Receiver dropped = nobody is waiting
      let _ = sender.send(result);
    });

    Self {
      receiver,
      cancel,
      goal,
      started: Instant::now(),
    }
  }

  /// Request cancellation. The worker stops before its next pop.
  pub fn cancel(&self) {
    self.cancel.cancel();
  }

  pub fn is_cancel_requested(&self) -> bool {
    self.cancel.is_cancelled()
  }

  pub fn goal(&self) -> usize {
    self.goal
  }

  /// Microseconds since the solve was spawned.
  pub fn elapsed_us(&self) -> u64 {
    self.started.elapsed().as_micros() as u64
  }

  /// Non-blocking check for the result.
  ///
  /// A terminal result is delivered once; polling again reports the worker
  /// as gone.
  pub fn poll(&self) -> SolvePoll {
    match self.receiver.try_recv() {
      Ok(result) => SolvePoll::from_result(result),
      Err(TryRecvError::Empty) => SolvePoll::Pending,
      Err(TryRecvError::Disconnected) => SolvePoll::Failed(disconnected()),
    }
  }

  /// Block until the worker reports.
  pub fn wait(self) -> SolvePoll {
    match self.receiver.recv() {
      Ok(result) => SolvePoll::from_result(result),
      Err(_) => SolvePoll::Failed(disconnected()),
    }
  }
}

// =============================================================================
// AsyncSolver
// =============================================================================

/// Single-slot background solver driven by the control loop.
#[derive(Default)]
pub struct AsyncSolver {
  handle: Option<SolveHandle>,
  state: SolveState,
}

impl AsyncSolver {
  pub fn new() -> Self {
    Self::default()
  }

  /// Check if a solve is in flight.
  pub fn is_busy(&self) -> bool {
    self.handle.is_some()
  }

  pub fn state(&self) -> SolveState {
    self.state
  }

  /// Goal of the in-flight solve.
  pub fn pending_goal(&self) -> Option<usize> {
    self.handle.as_ref().map(SolveHandle::goal)
  }

  /// Start solving `roadmap` from `goal`.
  ///
  /// An in-flight solve is cancelled and waited for first; its final
  /// result is returned so the caller can account for it.
  pub fn start(&mut self, roadmap: Arc<Roadmap>, goal: usize) -> NavResult<Option<SolvePoll>> {
    if goal >= roadmap.len() {
      return Err(NavError::InvalidGoal {
        goal,
        len: roadmap.len(),
      });
    }

    let superseded = self.handle.take().map(|previous| {
      previous.cancel();
      previous.wait()
    });

    #[cfg(feature = "tracing")]
    tracing::debug!(goal, nodes = roadmap.len(), superseded = superseded.is_some(), "solve started");

    self.handle = Some(SolveHandle::spawn(roadmap, goal));
    self.state = SolveState::Running;
    Ok(superseded)
  }

  /// Request cancellation of the in-flight solve.
  ///
  /// The solve stays in flight until a poll observes the cancellation.
  pub fn cancel(&self) {
    if let Some(handle) = &self.handle {
      handle.cancel();
    }
  }

  /// Poll for a finished solve (non-blocking).
  ///
  /// Returns `None` when idle or still running.
  pub fn poll_results(&mut self) -> Option<SolvePoll> {
    let poll = self.handle.as_ref()?.poll();
    if matches!(poll, SolvePoll::Pending) {
      return None;
    }
    self.finish(poll)
  }

  /// Block until the in-flight solve finishes.
  pub fn wait(&mut self) -> Option<SolvePoll> {
    let poll = self.handle.take()?.wait();
    self.finish(poll)
  }

  fn finish(&mut self, poll: SolvePoll) -> Option<SolvePoll> {
    self.handle = None;
    self.state = poll.state();

    #[cfg(feature = "tracing")]
    {
      match &poll {
        SolvePoll::Failed(err) => tracing::warn!(%err, "solve failed"),
        SolvePoll::Cancelled => tracing::debug!("solve cancelled"),
        _ => {}
      }
    }

    Some(poll)
  }
}

/// Run `f`, turning a panic into [`NavError::SolveFailed`].
fn run_guarded<F>(f: F) -> NavResult<SolveOutcome>
where
  F: FnOnce() -> NavResult<SolveOutcome>,
{
  panic::catch_unwind(AssertUnwindSafe(f))
    .unwrap_or_else(|payload| Err(NavError::SolveFailed(panic_message(payload.as_ref()))))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
  if let Some(message) = payload.downcast_ref::<&str>() {
    (*message).to_string()
  } else if let Some(message) = payload.downcast_ref::<String>() {
    message.clone()
  } else {
    "solver panicked".to_string()
  }
}

fn disconnected() -> NavError {
  NavError::SolveFailed("solve worker disconnected".into())
}

#[cfg(test)]
#[path = "async_solve_test.rs"]
mod async_solve_test;
