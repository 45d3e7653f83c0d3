// SPDX-License-Identifier: MIT OR Apache-2.0
//! Patient state cycle and per-patient animation records.

use crate::easing::Interpolation;
use crate::error::AnimationError;
use crate::zone::{Zone, ZoneLayout};
use serde::{Deserialize, Serialize};

/// Seconds spent at the triage desk
pub const TRIAGE_SECONDS: f64 = 3.0;
/// Seconds spent in treatment
pub const TREATMENT_SECONDS: f64 = 5.0;
/// Seconds spent boarding
pub const BOARDING_SECONDS: f64 = 2.0;

/// Where a patient is in its visit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PatientState {
    /// Walking from the entrance to triage
    Entering,
    /// Waiting at triage
    Triaging,
    /// Waiting in treatment
    Treating,
    /// Waiting in boarding
    Boarding,
    /// Walking from boarding to the exit
    Exiting,
}

impl PatientState {
    /// All states in cycle order
    pub const ALL: [PatientState; 5] = [
        PatientState::Entering,
        PatientState::Triaging,
        PatientState::Treating,
        PatientState::Boarding,
        PatientState::Exiting,
    ];

    /// The state that follows this one. The cycle never terminates.
    pub fn next(self) -> Self {
        match self {
            Self::Entering => Self::Triaging,
            Self::Triaging => Self::Treating,
            Self::Treating => Self::Boarding,
            Self::Boarding => Self::Exiting,
            Self::Exiting => Self::Entering,
        }
    }

    /// Get the display name
    pub fn name(self) -> &'static str {
        match self {
            Self::Entering => "Entering",
            Self::Triaging => "Triaging",
            Self::Treating => "Treating",
            Self::Boarding => "Boarding",
            Self::Exiting => "Exiting",
        }
    }

    /// Walking leg covered by this state, if it moves between zones
    pub fn leg(self) -> Option<(Zone, Zone)> {
        match self {
            Self::Entering => Some((Zone::Entrance, Zone::Triage)),
            Self::Exiting => Some((Zone::Boarding, Zone::Exit)),
            Self::Triaging | Self::Treating | Self::Boarding => None,
        }
    }

    /// Zone the patient occupies, or walks towards
    pub fn zone(self) -> Zone {
        match self {
            Self::Entering | Self::Triaging => Zone::Triage,
            Self::Treating => Zone::Treatment,
            Self::Boarding => Zone::Boarding,
            Self::Exiting => Zone::Exit,
        }
    }

    /// Pose at a normalized time within this state.
    ///
    /// Walking states ease along their leg. Waiting states hold the zone's
    /// waypoint and face the next zone on the route.
    pub fn pose(self, layout: &ZoneLayout, t: f32) -> PatientTransform {
        if let Some((from, to)) = self.leg() {
            let a = layout.waypoint(from);
            let b = layout.waypoint(to);
            return PatientTransform {
                position: Interpolation::position(a, b, Interpolation::ease(t)),
                yaw: Interpolation::heading(a, b),
            };
        }

        let here = layout.waypoint(self.zone());
        let ahead = layout.waypoint(self.next().zone());
        PatientTransform {
            position: here,
            yaw: Interpolation::heading(here, ahead),
        }
    }
}

/// Duration table for the five states, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StateDurations {
    /// Entrance to triage walk
    pub entering: f64,
    /// Triage wait
    pub triaging: f64,
    /// Treatment wait
    pub treating: f64,
    /// Boarding wait
    pub boarding: f64,
    /// Boarding to exit walk
    pub exiting: f64,
}

impl StateDurations {
    /// Derive walking durations from the layout; waits are fixed
    pub fn from_layout(layout: &ZoneLayout) -> Result<Self, AnimationError> {
        layout.validate()?;
        Ok(Self {
            entering: layout.walk_duration(Zone::Entrance, Zone::Triage),
            triaging: TRIAGE_SECONDS,
            treating: TREATMENT_SECONDS,
            boarding: BOARDING_SECONDS,
            exiting: layout.walk_duration(Zone::Boarding, Zone::Exit),
        })
    }

    /// Duration of a state
    pub fn duration(&self, state: PatientState) -> f64 {
        match state {
            PatientState::Entering => self.entering,
            PatientState::Triaging => self.triaging,
            PatientState::Treating => self.treating,
            PatientState::Boarding => self.boarding,
            PatientState::Exiting => self.exiting,
        }
    }

    /// Length of one full Entering..Exiting pass
    pub fn cycle_length(&self) -> f64 {
        PatientState::ALL.iter().map(|s| self.duration(*s)).sum()
    }
}

/// Transform written onto a render object
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PatientTransform {
    /// World-space position
    pub position: [f32; 3],
    /// Heading about +Y in radians
    pub yaw: f32,
}

/// Write-only access to an externally owned render object
pub trait TransformSink {
    /// Replace the object's position and heading
    fn set_transform(&mut self, transform: PatientTransform);
}

impl TransformSink for PatientTransform {
    fn set_transform(&mut self, transform: PatientTransform) {
        *self = transform;
    }
}

/// Animation record for one patient
#[derive(Debug, Clone)]
pub struct AnimatedPatient<H> {
    /// Render handle supplied by the scene
    pub handle: H,
    /// Current state
    pub state: PatientState,
    /// Seconds spent in the current state
    pub state_elapsed: f64,
    /// Delay before the patient starts moving
    pub start_delay: f64,
    /// Part of the start delay not yet consumed
    pub remaining_delay: f64,
    /// Whether the start delay has elapsed
    pub active: bool,
    /// Completed Exiting -> Entering wraps
    pub cycles_completed: u64,
}

impl<H> AnimatedPatient<H> {
    /// Create a record waiting `start_delay` seconds before entering
    pub fn new(handle: H, start_delay: f64) -> Self {
        Self {
            handle,
            state: PatientState::Entering,
            state_elapsed: 0.0,
            start_delay,
            remaining_delay: start_delay,
            active: start_delay <= 0.0,
            cycles_completed: 0,
        }
    }

    /// Advance the state machine by `dt` seconds.
    ///
    /// Delay left over is carried into the first state so staggered patients
    /// keep their exact phase offsets. Returns `true` once the patient is
    /// active.
    pub fn step(&mut self, dt: f64, durations: &StateDurations) -> bool {
        let mut dt = dt;

        if !self.active {
            if dt < self.remaining_delay {
                self.remaining_delay -= dt;
                return false;
            }
            dt -= self.remaining_delay;
            self.remaining_delay = 0.0;
            self.active = true;
        }

        self.state_elapsed += dt;

        loop {
            let duration = durations.duration(self.state);
            if self.state_elapsed < duration {
                break;
            }
            self.state_elapsed -= duration;
            let next = self.state.next();
            if next == PatientState::Entering {
                self.cycles_completed += 1;
            }
            tracing::trace!(from = self.state.name(), to = next.name(), "patient state change");
            self.state = next;
        }

        true
    }

    /// Normalized time within the current state, in `[0, 1)`
    pub fn state_progress(&self, durations: &StateDurations) -> f32 {
        (self.state_elapsed / durations.duration(self.state)) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn durations() -> StateDurations {
        StateDurations::from_layout(&ZoneLayout::default()).unwrap()
    }

    #[test]
    fn test_cycle_order_wraps() {
        let mut state = PatientState::Entering;
        let mut visited = Vec::new();
        for _ in 0..5 {
            visited.push(state);
            state = state.next();
        }
        assert_eq!(visited, PatientState::ALL);
        assert_eq!(state, PatientState::Entering);
    }

    #[test]
    fn test_every_state_has_a_positive_duration() {
        let table = durations();
        for state in PatientState::ALL {
            assert!(table.duration(state) > 0.0, "{} has no duration", state.name());
        }
        assert_eq!(table.duration(PatientState::Triaging), 3.0);
        assert_eq!(table.duration(PatientState::Treating), 5.0);
        assert_eq!(table.duration(PatientState::Boarding), 2.0);
        assert!((table.cycle_length() - 20.0).abs() < 1e-6);
    }

    #[test]
    fn test_only_walking_states_have_legs() {
        for state in PatientState::ALL {
            let walking = matches!(state, PatientState::Entering | PatientState::Exiting);
            assert_eq!(state.leg().is_some(), walking);
        }
    }

    #[test]
    fn test_waiting_pose_ignores_time() {
        let layout = ZoneLayout::default();
        for state in [PatientState::Triaging, PatientState::Treating, PatientState::Boarding] {
            let early = state.pose(&layout, 0.1);
            let late = state.pose(&layout, 0.9);
            assert_eq!(early, late);
            assert_eq!(early.position, layout.waypoint(state.zone()));
        }
    }

    #[test]
    fn test_walking_pose_hits_endpoints() {
        let layout = ZoneLayout::default();
        assert_eq!(PatientState::Entering.pose(&layout, 0.0).position, layout.entrance);
        assert_eq!(PatientState::Entering.pose(&layout, 1.0).position, layout.triage);
        assert_eq!(PatientState::Exiting.pose(&layout, 0.0).position, layout.boarding);
        assert_eq!(PatientState::Exiting.pose(&layout, 1.0).position, layout.exit);
    }

    #[test]
    fn test_delay_remainder_carries_into_state() {
        let table = durations();
        let mut patient = AnimatedPatient::new((), 1.0);
        assert!(!patient.active);

        assert!(!patient.step(0.75, &table));
        assert!((patient.remaining_delay - 0.25).abs() < 1e-12);

        assert!(patient.step(0.5, &table));
        assert!(patient.active);
        assert!((patient.state_elapsed - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_large_step_skips_several_states() {
        let table = durations();
        let mut patient = AnimatedPatient::new((), 0.0);
        // 5 (entering) + 3 (triage) + 5 (treatment) + 1 into boarding
        patient.step(14.0, &table);
        assert_eq!(patient.state, PatientState::Boarding);
        assert!((patient.state_elapsed - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_wrap_keeps_overshoot() {
        let table = durations();
        let mut patient = AnimatedPatient::new((), 0.0);
        patient.step(table.cycle_length() + 0.5, &table);
        assert_eq!(patient.state, PatientState::Entering);
        assert_eq!(patient.cycles_completed, 1);
        assert!((patient.state_elapsed - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_transform_sink_for_plain_transform() {
        let mut sink = PatientTransform::default();
        sink.set_transform(PatientTransform { position: [1.0, 2.0, 3.0], yaw: 0.5 });
        assert_eq!(sink.position, [1.0, 2.0, 3.0]);
        assert_eq!(sink.yaw, 0.5);
    }
}
