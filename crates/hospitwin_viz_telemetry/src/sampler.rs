// SPDX-License-Identifier: MIT OR Apache-2.0
//! Rolling frame-rate sampler.
//!
//! Frame samples land in a fixed window; every figure in a
//! [`MetricsSnapshot`] is recomputed from that window, so nothing drifts
//! over a long session.

use crate::counters::{ResourceCounters, ResourceSnapshot};
use crate::error::TelemetryError;
use crate::ring::RingBuffer;
use serde::Serialize;

/// Samples kept by default (two seconds at 60 Hz)
pub const DEFAULT_WINDOW_CAPACITY: usize = 120;

/// Resource counters are read once every this many `update` calls
pub const RESOURCE_POLL_INTERVAL: u64 = 60;

/// One frame's timing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSample {
    /// Frame time in milliseconds
    pub frame_time_ms: f64,
    /// Instantaneous frames per second
    pub fps: f64,
}

impl FrameSample {
    /// Build a sample from a frame delta in seconds
    pub fn from_delta(dt: f64) -> Self {
        Self {
            frame_time_ms: dt * 1000.0,
            fps: 1.0 / dt,
        }
    }
}

/// Figures handed to the overlay
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    /// Latest instantaneous fps
    pub fps: f64,
    /// Mean fps over the window
    pub average_fps: f64,
    /// Lowest fps in the window
    pub min_fps: f64,
    /// Highest fps in the window
    pub max_fps: f64,
    /// Latest frame time in milliseconds
    pub frame_time: f64,
    /// Mean frame time over the window in milliseconds
    pub average_frame_time: f64,
    /// Samples currently in the window
    pub frames_sampled: usize,
    /// Samples accepted since creation
    pub total_frames: u64,
    /// Last resource poll, omitted when no counters are attached
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<ResourceSnapshot>,
}

/// Rolling-window frame telemetry
pub struct TelemetrySampler {
    samples: RingBuffer<FrameSample>,
    counters: Option<Box<dyn ResourceCounters>>,
    resources: Option<ResourceSnapshot>,
    update_calls: u64,
    total_frames: u64,
}

impl TelemetrySampler {
    /// Create a sampler without resource counters
    pub fn new(capacity: usize) -> Result<Self, TelemetryError> {
        Ok(Self {
            samples: RingBuffer::new(capacity)?,
            counters: None,
            resources: None,
            update_calls: 0,
            total_frames: 0,
        })
    }

    /// Create a sampler that polls `counters` on a decimated cadence
    pub fn with_counters(
        capacity: usize,
        counters: impl ResourceCounters + 'static,
    ) -> Result<Self, TelemetryError> {
        let mut sampler = Self::new(capacity)?;
        sampler.counters = Some(Box::new(counters));
        Ok(sampler)
    }

    /// Record a frame that took `dt` seconds.
    ///
    /// A zero, negative or non-finite delta (paused or backgrounded host) is
    /// not sampled, but still counts towards the resource poll cadence.
    pub fn update(&mut self, dt: f64) {
        self.update_calls += 1;

        if dt.is_finite() && dt > 0.0 {
            self.samples.push(FrameSample::from_delta(dt));
            self.total_frames += 1;
        }

        if (self.update_calls - 1) % RESOURCE_POLL_INTERVAL == 0 {
            self.poll_resources();
        }
    }

    fn poll_resources(&mut self) {
        let Some(counters) = &self.counters else {
            return;
        };
        let snapshot = ResourceSnapshot::capture(counters.as_ref());
        tracing::trace!(
            draw_calls = snapshot.counters.draw_calls,
            triangles = snapshot.counters.triangles,
            memory = snapshot.memory.is_some(),
            "polled renderer counters"
        );
        self.resources = Some(snapshot);
    }

    /// Recompute every figure from the current window
    pub fn metrics(&self) -> MetricsSnapshot {
        let Some(latest) = self.samples.latest() else {
            return MetricsSnapshot {
                total_frames: self.total_frames,
                resources: self.resources,
                ..MetricsSnapshot::default()
            };
        };

        let count = self.samples.len() as f64;
        let mut fps_sum = 0.0;
        let mut frame_time_sum = 0.0;
        let mut min_fps = f64::INFINITY;
        let mut max_fps = f64::NEG_INFINITY;

        for sample in self.samples.iter() {
            fps_sum += sample.fps;
            frame_time_sum += sample.frame_time_ms;
            min_fps = min_fps.min(sample.fps);
            max_fps = max_fps.max(sample.fps);
        }

        MetricsSnapshot {
            fps: latest.fps,
            average_fps: fps_sum / count,
            min_fps,
            max_fps,
            frame_time: latest.frame_time_ms,
            average_frame_time: frame_time_sum / count,
            frames_sampled: self.samples.len(),
            total_frames: self.total_frames,
            resources: self.resources,
        }
    }

    /// Samples in the window, oldest first
    pub fn samples(&self) -> impl Iterator<Item = &FrameSample> {
        self.samples.iter()
    }

    /// Window capacity
    pub fn capacity(&self) -> usize {
        self.samples.capacity()
    }

    /// Number of `update` calls so far
    pub fn update_calls(&self) -> u64 {
        self.update_calls
    }
}
