//! Configuration for roadmap construction and gradient queries.
//!
//! Every option has a default (see [`crate::constants`]) and a chained
//! `with_*` setter. With the `serde` feature the whole tree can be loaded
//! from TOML; missing keys keep their defaults.
//!
//! ```toml
//! resolve_penetration = true
//!
//! [roadmap]
//! agent_radius = 0.5
//! sample_count = 200
//! max_connection_distance = 8.0
//! bounds = { min = [-20.0, 0.0, -20.0], max = [20.0, 10.0, 20.0] }
//!
//! [field]
//! neighbor_count = 3
//! weighting = "InverseDistance"
//! ```

use crate::constants::*;
use crate::error::{NavError, NavResult};
use crate::octree::Aabb3;

/// How a gradient query blends the directions of nearby roadmap nodes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Weighting {
  /// Plain average of the stored directions.
  #[default]
  Uniform,
  /// Average weighted by the inverse distance to each node.
  InverseDistance,
}

/// Roadmap sampling and connection parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RoadmapConfig {
  /// Sampling volume before shrinking by the agent radius.
  pub bounds: Aabb3,

  /// Agent radius: shrinks the bounds and sweeps every edge.
  pub agent_radius: f32,

  /// Number of best-candidate slots (accepted samples may be fewer).
  pub sample_count: usize,

  /// Uniform candidates drawn per slot.
  pub candidates_per_sample: usize,

  /// Longest edge allowed between two roadmap nodes.
  pub max_connection_distance: f32,

  /// Winning candidates closer than this to an existing node are dropped.
  pub min_point_spacing: f32,

  /// Octree split threshold.
  pub leaf_size: usize,

  /// Fixed RNG seed for reproducible roadmaps. `None` seeds from the OS.
  pub seed: Option<u64>,
}

impl RoadmapConfig {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_bounds(mut self, bounds: Aabb3) -> Self {
    self.bounds = bounds;
    self
  }

  pub fn with_agent_radius(mut self, radius: f32) -> Self {
    self.agent_radius = radius;
    self
  }

  pub fn with_sample_count(mut self, count: usize) -> Self {
    self.sample_count = count;
    self
  }

  pub fn with_candidates_per_sample(mut self, count: usize) -> Self {
    self.candidates_per_sample = count;
    self
  }

  pub fn with_max_connection_distance(mut self, distance: f32) -> Self {
    self.max_connection_distance = distance;
    self
  }

  pub fn with_min_point_spacing(mut self, spacing: f32) -> Self {
    self.min_point_spacing = spacing;
    self
  }

  pub fn with_leaf_size(mut self, leaf_size: usize) -> Self {
    self.leaf_size = leaf_size;
    self
  }

  pub fn with_seed(mut self, seed: u64) -> Self {
    self.seed = Some(seed);
    self
  }

  /// Bounds shrunk by the agent radius, `None` if the agent does not fit.
  pub fn safe_bounds(&self) -> Option<Aabb3> {
    self.bounds.shrink(self.agent_radius)
  }

  /// Check ranges; returns the first violation.
  pub fn validate(&self) -> NavResult<()> {
    non_negative("roadmap.agent_radius", self.agent_radius)?;
    non_negative("roadmap.max_connection_distance", self.max_connection_distance)?;
    non_negative("roadmap.min_point_spacing", self.min_point_spacing)?;
    if !self.bounds.min.is_finite() || !self.bounds.max.is_finite() {
      return Err(NavError::InvalidConfig("roadmap.bounds must be finite".into()));
    }
    if self.bounds.min.cmpgt(self.bounds.max).any() {
      return Err(NavError::InvalidConfig(
        "roadmap.bounds min must be <= max on all axes".into(),
      ));
    }
    if self.candidates_per_sample == 0 {
      return Err(NavError::InvalidConfig(
        "roadmap.candidates_per_sample must be >= 1".into(),
      ));
    }
    if self.leaf_size == 0 {
      return Err(NavError::InvalidConfig("roadmap.leaf_size must be >= 1".into()));
    }
    Ok(())
  }
}

impl Default for RoadmapConfig {
  fn default() -> Self {
    Self {
      bounds: Aabb3::default(),
      agent_radius: DEFAULT_AGENT_RADIUS,
      sample_count: DEFAULT_SAMPLE_COUNT,
      candidates_per_sample: DEFAULT_CANDIDATES_PER_SAMPLE,
      max_connection_distance: DEFAULT_MAX_CONNECTION_DISTANCE,
      min_point_spacing: 0.0,
      leaf_size: DEFAULT_LEAF_SIZE,
      seed: None,
    }
  }
}

/// Gradient field query parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FieldConfig {
  /// Radius around the query point searched for roadmap nodes.
  pub sample_radius: f32,

  /// Number of nearest nodes blended (K).
  pub neighbor_count: usize,

  /// Agent radius used for line-of-sight sweeps.
  pub agent_radius: f32,

  /// Blend mode for neighbor directions.
  pub weighting: Weighting,
}

impl FieldConfig {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_sample_radius(mut self, radius: f32) -> Self {
    self.sample_radius = radius;
    self
  }

  pub fn with_neighbor_count(mut self, count: usize) -> Self {
    self.neighbor_count = count;
    self
  }

  pub fn with_agent_radius(mut self, radius: f32) -> Self {
    self.agent_radius = radius;
    self
  }

  pub fn with_weighting(mut self, weighting: Weighting) -> Self {
    self.weighting = weighting;
    self
  }

  /// Check ranges; returns the first violation.
  pub fn validate(&self) -> NavResult<()> {
    non_negative("field.sample_radius", self.sample_radius)?;
    non_negative("field.agent_radius", self.agent_radius)?;
    if self.neighbor_count == 0 {
      return Err(NavError::InvalidConfig("field.neighbor_count must be >= 1".into()));
    }
    Ok(())
  }
}

impl Default for FieldConfig {
  fn default() -> Self {
    Self {
      sample_radius: DEFAULT_SAMPLE_RADIUS,
      neighbor_count: DEFAULT_NEIGHBOR_COUNT,
      agent_radius: DEFAULT_AGENT_RADIUS,
      weighting: Weighting::Uniform,
    }
  }
}

/// Full navigator configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NavConfig {
  pub roadmap: RoadmapConfig,
  pub field: FieldConfig,
  /// Push query points out of obstacles before sampling the field.
  pub resolve_penetration: bool,
}

impl NavConfig {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_roadmap(mut self, roadmap: RoadmapConfig) -> Self {
    self.roadmap = roadmap;
    self
  }

  pub fn with_field(mut self, field: FieldConfig) -> Self {
    self.field = field;
    self
  }

  pub fn with_resolve_penetration(mut self, enabled: bool) -> Self {
    self.resolve_penetration = enabled;
    self
  }

  /// Set the agent radius of both sections.
  pub fn with_agent_radius(mut self, radius: f32) -> Self {
    self.roadmap.agent_radius = radius;
    self.field.agent_radius = radius;
    self
  }

  /// Validate both sections. Edges are swept with the roadmap radius, so the
  /// field must check line of sight with the same one.
  pub fn validate(&self) -> NavResult<()> {
    self.roadmap.validate()?;
    self.field.validate()?;
    if self.roadmap.agent_radius != self.field.agent_radius {
      return Err(NavError::InvalidConfig(format!(
        "field.agent_radius ({}) must match roadmap.agent_radius ({})",
        self.field.agent_radius, self.roadmap.agent_radius
      )));
    }
    Ok(())
  }

  /// Parse a TOML document. Missing keys take their defaults.
  #[cfg(feature = "serde")]
  pub fn from_toml_str(source: &str) -> NavResult<Self> {
    let config: Self = toml::from_str(source)?;
    config.validate()?;
    Ok(config)
  }
}

impl Default for NavConfig {
  fn default() -> Self {
    Self {
      roadmap: RoadmapConfig::default(),
      field: FieldConfig::default(),
      resolve_penetration: true,
    }
  }
}

fn non_negative(name: &str, value: f32) -> NavResult<()> {
  if value.is_finite() && value >= 0.0 {
    Ok(())
  } else {
    Err(NavError::InvalidConfig(format!(
      "{} must be finite and >= 0 (got {})",
      name, value
    )))
  }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
