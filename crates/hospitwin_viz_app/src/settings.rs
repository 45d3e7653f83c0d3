// SPDX-License-Identifier: MIT OR Apache-2.0
//! Host settings, stored as RON.

use crate::error::AppError;
use hospitwin_viz_animation::{ZoneLayout, DEFAULT_CYCLE_LENGTH};
use hospitwin_viz_telemetry::DEFAULT_WINDOW_CAPACITY;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Current settings format version
pub const SETTINGS_FORMAT_VERSION: u32 = 1;

/// Patient population
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatientSettings {
    /// Number of patients in the scene
    pub count: usize,
    /// Seconds between consecutive patients entering
    pub stagger_interval: f64,
}

impl Default for PatientSettings {
    fn default() -> Self {
        Self {
            count: 12,
            stagger_interval: 1.5,
        }
    }
}

/// Progress bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressSettings {
    /// Loop length in seconds
    pub cycle_length: f64,
}

impl Default for ProgressSettings {
    fn default() -> Self {
        Self {
            cycle_length: DEFAULT_CYCLE_LENGTH,
        }
    }
}

/// Telemetry window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetrySettings {
    /// Frame samples kept in the rolling window
    pub window_capacity: usize,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            window_capacity: DEFAULT_WINDOW_CAPACITY,
        }
    }
}

/// Frame pacing and reporting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameLoopSettings {
    /// Frames per second the loop paces itself to
    pub target_fps: f64,
    /// Ceiling on the delta fed into the subsystems, in seconds
    pub max_frame_delta: f64,
    /// Seconds of simulated time between overlay reports
    pub report_interval: f64,
    /// Stop after this many seconds of wall time; run until stopped if unset
    pub run_for: Option<f64>,
}

impl Default for FrameLoopSettings {
    fn default() -> Self {
        Self {
            target_fps: 60.0,
            max_frame_delta: 1.0 / 15.0,
            report_interval: 1.0,
            run_for: None,
        }
    }
}

/// Complete host settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VizSettings {
    /// Settings format version
    pub version: u32,
    /// Patient population
    #[serde(default)]
    pub patients: PatientSettings,
    /// Zone waypoints and walking speed
    #[serde(default)]
    pub layout: ZoneLayout,
    /// Progress bar
    #[serde(default)]
    pub progress: ProgressSettings,
    /// Telemetry window
    #[serde(default)]
    pub telemetry: TelemetrySettings,
    /// Frame pacing
    #[serde(default)]
    pub frame_loop: FrameLoopSettings,
}

impl Default for VizSettings {
    fn default() -> Self {
        Self {
            version: SETTINGS_FORMAT_VERSION,
            patients: PatientSettings::default(),
            layout: ZoneLayout::default(),
            progress: ProgressSettings::default(),
            telemetry: TelemetrySettings::default(),
            frame_loop: FrameLoopSettings::default(),
        }
    }
}

impl VizSettings {
    /// Parse settings from RON text and check the frame loop values
    pub fn from_ron(content: &str) -> Result<Self, AppError> {
        let settings: VizSettings = ron::from_str(content)?;

        if settings.version > SETTINGS_FORMAT_VERSION {
            return Err(AppError::UnsupportedVersion {
                found: settings.version,
                supported: SETTINGS_FORMAT_VERSION,
            });
        }

        settings.validate()?;
        Ok(settings)
    }

    /// Serialize settings to pretty RON
    pub fn to_ron(&self) -> Result<String, AppError> {
        let config = ron::ser::PrettyConfig::default()
            .struct_names(true)
            .enumerate_arrays(false);
        Ok(ron::ser::to_string_pretty(self, config)?)
    }

    /// Load settings from a file
    pub async fn load(path: &Path) -> Result<Self, AppError> {
        let content = tokio::fs::read_to_string(path).await?;
        Self::from_ron(&content)
    }

    /// Save settings to a file
    pub async fn save(&self, path: &Path) -> Result<(), AppError> {
        let content = self.to_ron()?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }

    /// Check values the core crates do not validate themselves.
    ///
    /// Stagger interval, cycle length, window capacity and the layout are
    /// rejected by the subsystems at construction.
    pub fn validate(&self) -> Result<(), AppError> {
        let frame_loop = &self.frame_loop;
        positive("frame_loop.target_fps", frame_loop.target_fps)?;
        positive("frame_loop.max_frame_delta", frame_loop.max_frame_delta)?;
        positive("frame_loop.report_interval", frame_loop.report_interval)?;
        if let Some(run_for) = frame_loop.run_for {
            positive("frame_loop.run_for", run_for)?;
        }
        Ok(())
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), AppError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(AppError::InvalidSetting {
            name,
            reason: format!("must be a positive number of seconds or frames, got {value}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = VizSettings::default();
        assert_eq!(settings.version, SETTINGS_FORMAT_VERSION);
        assert_eq!(settings.telemetry.window_capacity, 120);
        assert_eq!(settings.progress.cycle_length, 20.0);
        assert!((settings.frame_loop.max_frame_delta - 1.0 / 15.0).abs() < 1e-12);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_serialization() {
        let mut settings = VizSettings::default();
        settings.patients.count = 3;
        settings.frame_loop.run_for = Some(2.5);
        let ron_str = settings.to_ron().unwrap();
        let loaded = VizSettings::from_ron(&ron_str).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let loaded = VizSettings::from_ron("(version: 1, patients: (count: 4))").unwrap();
        assert_eq!(loaded.patients.count, 4);
        assert_eq!(loaded.patients.stagger_interval, 1.5);
        assert_eq!(loaded.layout, ZoneLayout::default());
    }

    #[test]
    fn test_rejects_newer_version() {
        let result = VizSettings::from_ron("(version: 99)");
        assert!(matches!(
            result,
            Err(AppError::UnsupportedVersion { found: 99, .. })
        ));
    }

    #[test]
    fn test_rejects_bad_frame_loop_values() {
        let result = VizSettings::from_ron("(version: 1, frame_loop: (max_frame_delta: 0.0))");
        assert!(matches!(
            result,
            Err(AppError::InvalidSetting { name: "frame_loop.max_frame_delta", .. })
        ));

        let mut settings = VizSettings::default();
        settings.frame_loop.run_for = Some(-1.0);
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_malformed_file() {
        assert!(matches!(VizSettings::from_ron("(version: "), Err(AppError::Parse(_))));
    }

    #[test]
    fn test_save_and_load_file() {
        let path = std::env::temp_dir().join(format!("hospitwin-{}.ron", uuid::Uuid::new_v4()));
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let settings = VizSettings::default();

        runtime.block_on(settings.save(&path)).unwrap();
        let loaded = runtime.block_on(VizSettings::load(&path)).unwrap();
        assert_eq!(loaded, settings);

        std::fs::remove_file(&path).unwrap();
    }
}
