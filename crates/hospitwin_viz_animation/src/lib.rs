// SPDX-License-Identifier: MIT OR Apache-2.0
//! Patient-flow animation for the `HospiTwin` visualization.
//!
//! This crate advances a fixed population of patients through the hospital
//! zones, one tick at a time:
//! - Cubic ease-in-out and waypoint interpolation
//! - Zone layout with walking-speed derived durations
//! - Five-state patient cycle with exact remainder carry
//! - Cycle-synchronized progress tracking
//!
//! ## Architecture
//!
//! Nothing in this crate reads a clock. Every `advance`/`update` call takes
//! the elapsed seconds explicitly, and render objects are only reached
//! through the [`TransformSink`] capability supplied by the caller.

pub mod easing;
pub mod error;
pub mod patient;
pub mod progress;
pub mod scheduler;
pub mod zone;

pub use easing::Interpolation;
pub use error::AnimationError;
pub use patient::{AnimatedPatient, PatientState, PatientTransform, StateDurations, TransformSink};
pub use progress::{CycleProgressTracker, DEFAULT_CYCLE_LENGTH};
pub use scheduler::PatientScheduler;
pub use zone::{Zone, ZoneLayout};
