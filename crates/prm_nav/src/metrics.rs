//! Engine-agnostic metrics for roadmap builds and background solves.
//!
//! Feature-gated and runtime-toggled; recording is a no-op when disabled.
//!
//! # Usage
//!
//! ```ignore
//! use prm_nav::metrics::{NavMetrics, COLLECT_METRICS};
//!
//! // Compile with --features metrics
//! // Runtime toggle:
//! COLLECT_METRICS.store(false, Ordering::Relaxed);
//!
//! metrics.record_build(&stats, roadmap.len());
//! metrics.record_solve_completed(output.solve_time_us, output.reached_count());
//! ```

use std::collections::VecDeque;
#[cfg(feature = "metrics")]
use std::sync::atomic::Ordering;
use std::sync::atomic::AtomicBool;

use crate::roadmap::BuildStats;

/// Runtime toggle for metrics collection.
/// Set to false to disable metrics gathering at runtime.
pub static COLLECT_METRICS: AtomicBool = AtomicBool::new(true);

/// Check if metrics collection is enabled (both compile-time and runtime).
#[inline]
pub fn is_enabled() -> bool {
    #[cfg(feature = "metrics")]
    {
        COLLECT_METRICS.load(Ordering::Relaxed)
    }
    #[cfg(not(feature = "metrics"))]
    {
        false
    }
}

/// Most recent timing samples in microseconds, oldest dropped first.
#[derive(Debug, Clone)]
pub struct RollingWindow {
    samples: VecDeque<u64>,
    capacity: usize,
}

impl RollingWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, sample_us: u64) {
        if self.capacity == 0 {
            return;
        }
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample_us);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Mean of the retained samples, 0.0 when empty.
    pub fn average(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let total: u64 = self.samples.iter().sum();
        total as f64 / self.samples.len() as f64
    }

    /// Fastest and slowest retained sample.
    pub fn min_max(&self) -> Option<(u64, u64)> {
        let first = *self.samples.front()?;
        Some(
            self.samples
                .iter()
                .fold((first, first), |(lo, hi), &t| (lo.min(t), hi.max(t))),
        )
    }
}

impl Default for RollingWindow {
    fn default() -> Self {
        Self::new(64)
    }
}

/// Navigation statistics: roadmap builds and solve outcomes.
#[derive(Debug, Clone, Default)]
pub struct NavMetrics {
    // Timing
    /// Rolling window of roadmap build times in microseconds.
    pub build_timings: RollingWindow,
    /// Rolling window of completed solve times in microseconds.
    pub solve_timings: RollingWindow,

    // Solve outcomes
    pub solves_completed: u64,
    pub solves_cancelled: u64,
    pub solves_failed: u64,

    // Last snapshot
    /// Node count of the last roadmap built.
    pub roadmap_nodes: usize,
    /// Edge count of the last roadmap built.
    pub roadmap_edges: usize,
    /// Sample winners rejected in the last build.
    pub rejected_samples: usize,
    /// Nodes reached by the last completed solve.
    pub reached_nodes: usize,
}

impl NavMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset timings and snapshots. Outcome counters are cumulative.
    pub fn reset(&mut self) {
        self.build_timings.clear();
        self.solve_timings.clear();
        self.roadmap_nodes = 0;
        self.roadmap_edges = 0;
        self.rejected_samples = 0;
        self.reached_nodes = 0;
    }

    /// Record a finished roadmap build.
    pub fn record_build(&mut self, stats: &BuildStats, nodes: usize) {
        if !is_enabled() {
            return;
        }
        self.build_timings.push(stats.total_time_us());
        self.roadmap_nodes = nodes;
        self.roadmap_edges = stats.edges;
        self.rejected_samples = stats.rejected();
    }

    pub fn record_solve_completed(&mut self, time_us: u64, reached: usize) {
        if !is_enabled() {
            return;
        }
        self.solve_timings.push(time_us);
        self.solves_completed += 1;
        self.reached_nodes = reached;
    }

    pub fn record_solve_cancelled(&mut self) {
        if is_enabled() {
            self.solves_cancelled += 1;
        }
    }

    pub fn record_solve_failed(&mut self) {
        if is_enabled() {
            self.solves_failed += 1;
        }
    }

    /// Average solve time in microseconds.
    pub fn avg_solve_timing_us(&self) -> f64 {
        self.solve_timings.average()
    }

    /// Average build time in microseconds.
    pub fn avg_build_timing_us(&self) -> f64 {
        self.build_timings.average()
    }

    /// Fastest and slowest recent solve, in microseconds.
    pub fn solve_timing_range_us(&self) -> Option<(u64, u64)> {
        self.solve_timings.min_max()
    }

    /// Fastest and slowest recent build, in microseconds.
    pub fn build_timing_range_us(&self) -> Option<(u64, u64)> {
        self.build_timings.min_max()
    }

    /// Fraction of roadmap nodes the last solve reached.
    pub fn coverage(&self) -> f64 {
        if self.roadmap_nodes == 0 {
            0.0
        } else {
            self.reached_nodes as f64 / self.roadmap_nodes as f64
        }
    }
}

#[cfg(all(test, feature = "metrics"))]
mod tests {
    use super::*;

    #[test]
    fn test_rolling_window() {
        let mut window = RollingWindow::new(3);
        assert!(window.is_empty());
        assert_eq!(window.average(), 0.0);
        assert!(window.min_max().is_none());

        window.push(10);
        window.push(20);
        window.push(30);
        assert_eq!(window.len(), 3);
        assert_eq!(window.average(), 20.0);

        // Oldest sample falls out
        window.push(40);
        assert_eq!(window.len(), 3);
        assert_eq!(window.average(), 30.0);
        assert_eq!(window.min_max(), Some((20, 40)));

        window.clear();
        assert!(window.is_empty());
    }

    #[test]
    fn test_zero_capacity_window_stays_empty() {
        let mut window = RollingWindow::new(0);
        window.push(5);
        assert!(window.is_empty());
        assert!(window.min_max().is_none());
    }

    #[test]
    fn test_build_recording() {
        let mut metrics = NavMetrics::new();
        let stats = BuildStats {
            accepted: 40,
            rejected_invalid: 3,
            rejected_too_close: 2,
            edges: 120,
            sample_time_us: 500,
            connect_time_us: 1500,
            ..Default::default()
        };
        metrics.record_build(&stats, 42);

        assert_eq!(metrics.roadmap_nodes, 42);
        assert_eq!(metrics.roadmap_edges, 120);
        assert_eq!(metrics.rejected_samples, 5);
        assert_eq!(metrics.avg_build_timing_us(), 2000.0);
        assert_eq!(metrics.build_timing_range_us(), Some((2000, 2000)));
    }

    #[test]
    fn test_solve_outcomes() {
        let mut metrics = NavMetrics::new();
        metrics.roadmap_nodes = 10;

        metrics.record_solve_completed(1000, 8);
        metrics.record_solve_completed(3000, 5);
        metrics.record_solve_cancelled();
        metrics.record_solve_failed();

        assert_eq!(metrics.solves_completed, 2);
        assert_eq!(metrics.solves_cancelled, 1);
        assert_eq!(metrics.solves_failed, 1);
        assert_eq!(metrics.avg_solve_timing_us(), 2000.0);
        assert_eq!(metrics.solve_timing_range_us(), Some((1000, 3000)));
        assert_eq!(metrics.build_timing_range_us(), None);
        assert_eq!(metrics.coverage(), 0.5);

        metrics.reset();
        assert!(metrics.solve_timings.is_empty());
        assert_eq!(metrics.solve_timing_range_us(), None);
        assert_eq!(metrics.solves_completed, 2);
    }
}
