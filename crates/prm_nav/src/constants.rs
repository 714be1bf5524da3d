//! Tuning constants shared by the roadmap, octree and gradient field.
//!
//! # Roadmap Layout
//!
//! ```text
//! index:   0      1       2 .. n-1
//!        ┌──────┬───────┬──────────────────────┐
//!        │ goal │ start │ best-candidate samples│
//!        └──────┴───────┴──────────────────────┘
//!
//! W[i][j] = |p_i - p_j|   edge (symmetric)
//! W[i][j] = -inf          no edge (NO_EDGE)
//! ```

/// Roadmap node id of the goal. Every solve runs from here.
pub const GOAL_INDEX: usize = 0;

/// Roadmap node id of the start point.
pub const START_INDEX: usize = 1;

/// Weight-matrix sentinel meaning "no edge between i and j".
pub const NO_EDGE: f32 = f32::NEG_INFINITY;

/// Octree nodes holding at least this many points are split into 8 octants.
pub const DEFAULT_LEAF_SIZE: usize = 64;

/// Hard recursion limit for octree subdivision.
///
/// Guards against unbounded splitting when more than `leaf_size` points
/// share (almost) the same coordinates.
pub const MAX_OCTREE_DEPTH: u32 = 16;

/// Number of roadmap slots filled by best-candidate sampling.
pub const DEFAULT_SAMPLE_COUNT: usize = 50;

/// Uniform candidates drawn per slot (Mitchell's best candidate).
pub const DEFAULT_CANDIDATES_PER_SAMPLE: usize = 5;

/// Maximum edge length in world units.
pub const DEFAULT_MAX_CONNECTION_DISTANCE: f32 = 10.0;

/// Agent (capsule) radius used when no agent is configured.
pub const DEFAULT_AGENT_RADIUS: f32 = 0.5;

/// Nearest roadmap nodes blended by a gradient query.
pub const DEFAULT_NEIGHBOR_COUNT: usize = 3;

/// Radius around the query point searched for roadmap nodes.
pub const DEFAULT_SAMPLE_RADIUS: f32 = 10.0;

/// Neighbor lists up to this size stay on the stack during queries.
pub const INLINE_CANDIDATES: usize = 8;

#[cfg(test)]
#[path = "constants_test.rs"]
mod constants_test;
