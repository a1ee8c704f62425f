//! Generator metrics: rolling per-stage timings and pass counters.
//!
//! Feature-gated and runtime-toggled; recording is a no-op when disabled.
//!
//! # Usage
//!
//! ```ignore
//! use chunk_pipeline::metrics::COLLECT_METRICS;
//!
//! // Compile with --features metrics
//! // Runtime toggle:
//! COLLECT_METRICS.store(false, Ordering::Relaxed);
//!
//! // The generator records every pass itself:
//! let report = generator.process_queue(&mut batch)?;
//! println!("avg mesh stage: {}us", generator.metrics().stage(StageKind::Mesh).average());
//! ```

use std::collections::VecDeque;
#[cfg(feature = "metrics")]
use std::sync::atomic::Ordering;
use std::sync::atomic::AtomicBool;

use crate::pipeline::{PassReport, StageKind};

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

/// Rolling window for storing recent values (e.g., timing history).
#[derive(Debug, Clone)]
pub struct RollingWindow<T> {
    buffer: VecDeque<T>,
    capacity: usize,
}

impl<T> RollingWindow<T> {
    /// Create a new rolling window with the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a new value, evicting the oldest if at capacity.
    pub fn push(&mut self, value: T) {
        if self.buffer.len() >= self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(value);
    }

    /// Get the number of values in the window.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if the window is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Clear all values.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Iterate over values (oldest to newest).
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.buffer.iter()
    }

    /// Get the most recent value.
    pub fn last(&self) -> Option<&T> {
        self.buffer.back()
    }

}

impl<T: Copy + Default + std::ops::Add<Output = T>> RollingWindow<T> {
    /// Compute the sum of all values.
    pub fn sum(&self) -> T {
        self.buffer.iter().copied().fold(T::default(), |acc, x| acc + x)
    }
}

impl RollingWindow<u64> {
    /// Compute the average of all values.
    pub fn average(&self) -> f64 {
        if self.buffer.is_empty() {
            0.0
        } else {
            self.sum() as f64 / self.buffer.len() as f64
        }
    }

    /// Get min and max values.
    pub fn min_max(&self) -> Option<(u64, u64)> {
        let min = self.buffer.iter().min()?;
        let max = self.buffer.iter().max()?;
        Some((*min, *max))
    }
}

impl Default for RollingWindow<u64> {
    fn default() -> Self {
        Self::new(128)
    }
}

/// Rolling stage timings and running totals for one generator.
#[derive(Debug, Clone, Default)]
pub struct GeneratorMetrics {
    // Timing (microseconds)
    pub create_timings: RollingWindow<u64>,
    pub sample_timings: RollingWindow<u64>,
    pub dual_vertex_timings: RollingWindow<u64>,
    pub sub_octree_timings: RollingWindow<u64>,
    pub mesh_timings: RollingWindow<u64>,
    pub format_timings: RollingWindow<u64>,
    pub pass_timings: RollingWindow<u64>,

    // Totals
    pub passes: u64,
    pub nodes_processed: u64,
    pub meshes_produced: u64,
    pub nodes_retained: u64,
    pub node_failures: u64,
}

impl GeneratorMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one pass. No-op unless metrics are enabled.
    pub fn record_pass(&mut self, report: &PassReport) {
        if !is_enabled() {
            return;
        }

        let t = &report.timings;
        self.create_timings.push(t.create_us);
        for stage in StageKind::ALL {
            self.stage_mut(stage).push(t.stage_us(stage));
        }
        self.pass_timings.push(t.total_us);

        self.passes += 1;
        self.nodes_processed += report.nodes as u64;
        self.meshes_produced += report.meshes as u64;
        self.nodes_retained += report.retained as u64;
        self.node_failures += report.failures.len() as u64;
    }

    /// Timing window for a per-node stage.
    pub fn stage(&self, stage: StageKind) -> &RollingWindow<u64> {
        match stage {
            StageKind::Samples => &self.sample_timings,
            StageKind::DualVertices => &self.dual_vertex_timings,
            StageKind::SubOctree => &self.sub_octree_timings,
            StageKind::Mesh => &self.mesh_timings,
            StageKind::Format => &self.format_timings,
        }
    }

    fn stage_mut(&mut self, stage: StageKind) -> &mut RollingWindow<u64> {
        match stage {
            StageKind::Samples => &mut self.sample_timings,
            StageKind::DualVertices => &mut self.dual_vertex_timings,
            StageKind::SubOctree => &mut self.sub_octree_timings,
            StageKind::Mesh => &mut self.mesh_timings,
            StageKind::Format => &mut self.format_timings,
        }
    }

    /// Average pass time in microseconds.
    pub fn avg_pass_us(&self) -> f64 {
        self.pass_timings.average()
    }

    /// Reset timing windows. Totals are cumulative and kept.
    pub fn reset(&mut self) {
        self.create_timings.clear();
        self.sample_timings.clear();
        self.dual_vertex_timings.clear();
        self.sub_octree_timings.clear();
        self.mesh_timings.clear();
        self.format_timings.clear();
        self.pass_timings.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rolling_window() {
        let mut window = RollingWindow::new(3);
        assert!(window.is_empty());
        assert_eq!(window.min_max(), None);

        window.push(10u64);
        window.push(20);
        window.push(30);
        assert_eq!(window.len(), 3);
        assert_eq!(window.sum(), 60);
        assert_eq!(window.average(), 20.0);

        // Push one more, oldest should be evicted
        window.push(40);
        assert_eq!(window.len(), 3);
        assert_eq!(window.sum(), 90);
        assert_eq!(window.average(), 30.0);
        assert_eq!(window.last(), Some(&40));
        assert_eq!(window.min_max(), Some((20, 40)));
    }

    #[cfg(feature = "metrics")]
    #[test]
    fn test_record_pass() {
        let mut metrics = GeneratorMetrics::new();
        let mut report = PassReport {
            nodes: 8,
            meshes: 6,
            retained: 2,
            ..Default::default()
        };
        report.timings.mesh_us = 1000;
        report.timings.total_us = 1500;

        metrics.record_pass(&report);
        report.timings.mesh_us = 3000;
        metrics.record_pass(&report);

        assert_eq!(metrics.passes, 2);
        assert_eq!(metrics.nodes_processed, 16);
        assert_eq!(metrics.meshes_produced, 12);
        assert_eq!(metrics.nodes_retained, 4);
        assert_eq!(metrics.stage(StageKind::Mesh).average(), 2000.0);
        assert_eq!(metrics.avg_pass_us(), 1500.0);

        metrics.reset();
        assert!(metrics.stage(StageKind::Mesh).is_empty());
        assert_eq!(metrics.passes, 2);
    }

    #[cfg(not(feature = "metrics"))]
    #[test]
    fn test_disabled_records_nothing() {
        let mut metrics = GeneratorMetrics::new();
        metrics.record_pass(&PassReport::default());
        assert_eq!(metrics.passes, 0);
        assert!(metrics.pass_timings.is_empty());
    }
}
