// SPDX-License-Identifier: MIT OR Apache-2.0
//! Cycle progress tracking for the loop indicator bar.

use crate::error::AnimationError;

/// Default loop length in seconds
pub const DEFAULT_CYCLE_LENGTH: f64 = 20.0;

/// Smallest bar scale handed to the renderer, keeps the transform invertible
pub const MIN_BAR_SCALE: f32 = 0.001;

/// Cyclical timer behind the progress bar.
///
/// Elapsed time wraps with exact modulo arithmetic, so the bar grows at the
/// same rate on both sides of the wrap.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleProgressTracker {
    elapsed: f64,
    cycle_length: f64,
    cycles_completed: u64,
}

impl CycleProgressTracker {
    /// Create a tracker with the default 20 second cycle
    pub fn new() -> Self {
        Self {
            elapsed: 0.0,
            cycle_length: DEFAULT_CYCLE_LENGTH,
            cycles_completed: 0,
        }
    }

    /// Create a tracker with a custom cycle length
    pub fn with_cycle_length(cycle_length: f64) -> Result<Self, AnimationError> {
        if !cycle_length.is_finite() || cycle_length <= 0.0 {
            return Err(AnimationError::InvalidCycleLength(cycle_length));
        }
        Ok(Self {
            cycle_length,
            ..Self::new()
        })
    }

    /// Advance by `dt` seconds and return the new progress in `[0, 1)`.
    ///
    /// Negative or non-finite deltas leave the tracker untouched.
    pub fn update(&mut self, dt: f64) -> f64 {
        if !dt.is_finite() || dt < 0.0 {
            return self.progress();
        }

        let total = self.elapsed + dt;
        let elapsed = total % self.cycle_length;
        let wraps = ((total - elapsed) / self.cycle_length).round() as u64;

        if wraps > 0 {
            self.cycles_completed += wraps;
            tracing::debug!(cycles = self.cycles_completed, "progress cycle wrapped");
        }
        self.elapsed = elapsed;
        self.progress()
    }

    /// Fraction of the current cycle completed, in `[0, 1)`
    pub fn progress(&self) -> f64 {
        (self.elapsed / self.cycle_length).clamp(0.0, 1.0 - f64::EPSILON)
    }

    /// Horizontal scale for the indicator bar
    pub fn bar_scale(&self) -> f32 {
        (self.progress() as f32).max(MIN_BAR_SCALE)
    }

    /// Seconds into the current cycle
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Cycle length in seconds
    pub fn cycle_length(&self) -> f64 {
        self.cycle_length
    }

    /// Number of completed cycles
    pub fn cycles_completed(&self) -> u64 {
        self.cycles_completed
    }
}

impl Default for CycleProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}
