//! prm_nav - Engine independent roadmap navigation
//!
//! This crate steers many agents toward a shared goal through static 3D
//! obstacles. A probabilistic roadmap is sampled in free space, solved once
//! from the goal in the background, and turned into a gradient field that
//! any number of agents query every frame.
//!
//! # Features
//!
//! - **Roadmap Sampling**: Best-candidate sampling spreads nodes evenly,
//!   edges only where a swept agent clears all obstacles
//! - **Octree Index**: Radius queries over roadmap nodes for edge building
//!   and field lookups
//! - **Background Dijkstra**: Single-source solve on rayon, cancellable and
//!   polled without blocking the control loop
//! - **Gradient Field**: Versioned snapshots, lock-free to read, safe to query
//!   from many threads
//!
//! # Example
//!
//! ```ignore
//! use prm_nav::{NavConfig, Navigator, ObstacleSet, SolveEvent};
//! use glam::Vec3;
//!
//! let oracle = ObstacleSet::new().with_sphere(Vec3::ZERO, 2.0);
//! let mut nav = Navigator::new(NavConfig::default(), oracle, start, goal)?;
//! nav.request_solve()?;
//!
//! // Once per frame
//! if let Some(SolveEvent::Published { version, .. }) = nav.tick() {
//!     println!("field v{} live", version);
//! }
//! let steer = nav.query_direction(agent_position);
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod metrics;
pub mod oracle;

// Re-export commonly used items
pub use config::{FieldConfig, NavConfig, RoadmapConfig, Weighting};
pub use constants::{GOAL_INDEX, NO_EDGE, START_INDEX};
pub use error::{NavError, NavResult};
pub use metrics::NavMetrics;
pub use oracle::{GeometryOracle, Obstacle, ObstacleSet, OpenSpace};

// Octree spatial index over roadmap nodes
pub mod octree;
pub use octree::{Aabb3, Octree, OctreeNode};

// Roadmap graph and sampler
pub mod roadmap;
pub use roadmap::{BuildStats, Roadmap, RoadmapBuilder, WeightMatrix};

// Dijkstra solve, foreground and background
pub mod search;
pub use search::{
  solve, AsyncSolver, CancelToken, PriorityQueue, SearchNode, SolveHandle, SolveOutcome,
  SolveOutput, SolvePoll, SolveState,
};

// Gradient field and its shared snapshot
pub mod field;
pub use field::{GradientEntry, GradientField, SharedField};

// Per-episode facade for a real-time loop
pub mod navigator;
pub use navigator::{Navigator, SolveEvent};
