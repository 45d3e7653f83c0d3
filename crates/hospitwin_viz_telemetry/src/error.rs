// SPDX-License-Identifier: MIT OR Apache-2.0
//! Telemetry errors.

/// Configuration rejected at construction time
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TelemetryError {
    /// Sample window needs room for at least one frame
    #[error("Telemetry window capacity must be at least 1")]
    ZeroCapacity,
}
