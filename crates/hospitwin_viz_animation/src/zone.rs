// SPDX-License-Identifier: MIT OR Apache-2.0
//! Hospital zones and their waypoints.

use crate::easing::Interpolation;
use crate::error::AnimationError;
use serde::{Deserialize, Serialize};

/// A spatial region patients pass through, in visiting order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    /// Front door
    Entrance,
    /// Triage desk
    Triage,
    /// Treatment bays
    Treatment,
    /// Boarding / admission area
    Boarding,
    /// Way out
    Exit,
}

impl Zone {
    /// All zones in visiting order
    pub const ALL: [Zone; 5] = [
        Zone::Entrance,
        Zone::Triage,
        Zone::Treatment,
        Zone::Boarding,
        Zone::Exit,
    ];

    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Entrance => "Entrance",
            Self::Triage => "Triage",
            Self::Treatment => "Treatment",
            Self::Boarding => "Boarding",
            Self::Exit => "Exit",
        }
    }
}

/// World-space waypoints for every zone plus the walking speed between them.
///
/// The default floor plan puts both walking legs ten units long, so at the
/// default speed a full patient cycle lasts 20 seconds and lines up with
/// [`DEFAULT_CYCLE_LENGTH`](crate::progress::DEFAULT_CYCLE_LENGTH).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneLayout {
    /// Entrance waypoint
    pub entrance: [f32; 3],
    /// Triage waypoint
    pub triage: [f32; 3],
    /// Treatment waypoint
    pub treatment: [f32; 3],
    /// Boarding waypoint
    pub boarding: [f32; 3],
    /// Exit waypoint
    pub exit: [f32; 3],
    /// Walking speed in world units per second
    pub walk_speed: f32,
}

impl Default for ZoneLayout {
    fn default() -> Self {
        Self {
            entrance: [-14.0, 0.0, 0.0],
            triage: [-8.0, 0.0, 8.0],
            treatment: [0.0, 0.0, 10.0],
            boarding: [8.0, 0.0, 8.0],
            exit: [14.0, 0.0, 0.0],
            walk_speed: 2.0,
        }
    }
}

impl ZoneLayout {
    /// Get the waypoint of a zone
    pub fn waypoint(&self, zone: Zone) -> [f32; 3] {
        match zone {
            Zone::Entrance => self.entrance,
            Zone::Triage => self.triage,
            Zone::Treatment => self.treatment,
            Zone::Boarding => self.boarding,
            Zone::Exit => self.exit,
        }
    }

    /// Seconds needed to walk from one zone to another at `walk_speed`
    pub fn walk_duration(&self, from: Zone, to: Zone) -> f64 {
        let distance = Interpolation::distance(self.waypoint(from), self.waypoint(to));
        f64::from(distance) / f64::from(self.walk_speed)
    }

    /// Check that both walking legs have a positive, finite duration
    pub fn validate(&self) -> Result<(), AnimationError> {
        if !self.walk_speed.is_finite() || self.walk_speed <= 0.0 {
            return Err(AnimationError::InvalidWalkSpeed(self.walk_speed));
        }

        for (from, to) in [(Zone::Entrance, Zone::Triage), (Zone::Boarding, Zone::Exit)] {
            let duration = self.walk_duration(from, to);
            if !duration.is_finite() || duration <= 0.0 {
                return Err(AnimationError::DegenerateSegment { from, to });
            }
        }

        Ok(())
    }
}
