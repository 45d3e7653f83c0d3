// SPDX-License-Identifier: MIT OR Apache-2.0
//! Renderer resource counters.

use serde::Serialize;

/// Per-frame counters kept by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderCounters {
    /// Draw calls issued last frame
    pub draw_calls: u32,
    /// Triangles submitted last frame
    pub triangles: u64,
    /// Geometries resident on the GPU
    pub geometries: u32,
    /// Textures resident on the GPU
    pub textures: u32,
}

/// Heap usage reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryUsage {
    /// Bytes currently in use
    pub used_bytes: u64,
    /// Bytes reserved by the process
    pub total_bytes: u64,
    /// Hard limit, when the host has one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit_bytes: Option<u64>,
}

/// Read access to an externally owned renderer's counters
pub trait ResourceCounters {
    /// Counters as of the last rendered frame
    fn render_counters(&self) -> RenderCounters;

    /// Memory usage, if the host environment exposes it
    fn memory(&self) -> Option<MemoryUsage> {
        None
    }
}

/// Resource figures captured on the last poll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceSnapshot {
    /// Renderer counters
    #[serde(flatten)]
    pub counters: RenderCounters,
    /// Memory usage, omitted when unavailable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<MemoryUsage>,
}

impl ResourceSnapshot {
    /// Poll a counter source
    pub fn capture(source: &dyn ResourceCounters) -> Self {
        Self {
            counters: source.render_counters(),
            memory: source.memory(),
        }
    }
}
