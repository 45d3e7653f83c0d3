// SPDX-License-Identifier: MIT OR Apache-2.0
//! Overlay report: what a stats panel would show once per second.

use hospitwin_viz_animation::{CycleProgressTracker, PatientScheduler};
use hospitwin_viz_telemetry::MetricsSnapshot;
use serde::Serialize;

/// Patients per state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Occupancy {
    /// State name
    pub state: &'static str,
    /// Active patients in that state
    pub patients: usize,
}

/// One overlay refresh
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayReport {
    /// Cycle progress in `[0, 1)`
    pub progress: f64,
    /// Completed progress cycles
    pub cycles: u64,
    /// Patients past their start delay
    pub active_patients: usize,
    /// Per-state occupancy
    pub occupancy: Vec<Occupancy>,
    /// Frame and resource telemetry
    pub metrics: MetricsSnapshot,
}

impl OverlayReport {
    /// Gather the current figures from the three subsystems
    pub fn collect<H>(
        scheduler: &PatientScheduler<H>,
        tracker: &CycleProgressTracker,
        metrics: MetricsSnapshot,
    ) -> Self {
        let occupancy = scheduler
            .state_counts()
            .iter()
            .map(|(state, patients)| Occupancy {
                state: state.name(),
                patients: *patients,
            })
            .collect();

        Self {
            progress: tracker.progress(),
            cycles: tracker.cycles_completed(),
            active_patients: scheduler.active_count(),
            occupancy,
            metrics,
        }
    }

    /// Serialize for an external overlay
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Emit the report through tracing
    pub fn log(&self) {
        match self.to_json() {
            Ok(json) => tracing::debug!(target: "hospitwin_viz::overlay", "{json}"),
            Err(e) => tracing::warn!("Overlay report could not be serialized: {e}"),
        }
        tracing::info!(
            "progress {:>5.1}% | fps {:>5.1} (avg {:.1}, min {:.1}, max {:.1}) | frame {:.2} ms | {} active",
            self.progress * 100.0,
            self.metrics.fps,
            self.metrics.average_fps,
            self.metrics.min_fps,
            self.metrics.max_fps,
            self.metrics.frame_time,
            self.active_patients,
        );
    }
}
