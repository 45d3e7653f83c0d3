// SPDX-License-Identifier: MIT OR Apache-2.0
//! Rolling render telemetry for the `HospiTwin` visualization.
//!
//! This crate keeps a fixed window of frame timings and periodically reads
//! the renderer's resource counters:
//! - Fixed-capacity ring buffer of frame samples
//! - Metrics recomputed from the window on demand
//! - Decimated resource polling with optional memory usage

pub mod counters;
pub mod error;
pub mod ring;
pub mod sampler;

pub use counters::{MemoryUsage, RenderCounters, ResourceCounters, ResourceSnapshot};
pub use error::TelemetryError;
pub use ring::RingBuffer;
pub use sampler::{
    FrameSample, MetricsSnapshot, TelemetrySampler, DEFAULT_WINDOW_CAPACITY, RESOURCE_POLL_INTERVAL,
};
