//! Error types for roadmap navigation.
//!
//! Only genuine faults are errors. A cancelled solve is reported through
//! [`SolveOutcome::Cancelled`](crate::search::SolveOutcome) and an unreachable
//! goal through a `None` direction, since both are normal runtime states.

use thiserror::Error;

/// Errors raised by the navigation core.
#[derive(Debug, Error)]
pub enum NavError {
  /// `pop`/`peek` on an empty priority queue.
  #[error("priority queue is empty")]
  EmptyQueue,

  /// Solve requested from a node id the roadmap does not have.
  #[error("goal index {goal} out of range for roadmap with {len} nodes")]
  InvalidGoal {
    /// Requested goal id.
    goal: usize,
    /// Number of roadmap nodes.
    len: usize,
  },

  /// Configuration rejected by validation.
  #[error("invalid configuration: {0}")]
  InvalidConfig(String),

  /// Unexpected fault on the background solve worker.
  #[error("solve failed: {0}")]
  SolveFailed(String),

  /// TOML configuration could not be parsed.
  #[cfg(feature = "serde")]
  #[error("failed to parse configuration: {0}")]
  ConfigParse(#[from] toml::de::Error),
}

/// Result type for navigation operations.
pub type NavResult<T> = std::result::Result<T, NavError>;
