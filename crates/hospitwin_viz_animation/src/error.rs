// SPDX-License-Identifier: MIT OR Apache-2.0
//! Errors raised while constructing animation state.

use crate::zone::Zone;

/// Configuration rejected at construction time
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnimationError {
    /// Stagger interval must be finite and positive
    #[error("Stagger interval must be positive, got {0}s")]
    InvalidStaggerInterval(f64),

    /// Cycle length must be finite and positive
    #[error("Cycle length must be positive, got {0}s")]
    InvalidCycleLength(f64),

    /// Walking speed must be finite and positive
    #[error("Walk speed must be positive, got {0} units/s")]
    InvalidWalkSpeed(f32),

    /// Two consecutive waypoints of a walking leg coincide
    #[error("Zones {from:?} and {to:?} share a waypoint, walking leg has no length")]
    DegenerateSegment {
        /// Zone the leg starts in
        from: Zone,
        /// Zone the leg ends in
        to: Zone,
    },
}
