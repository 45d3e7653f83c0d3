// SPDX-License-Identifier: MIT OR Apache-2.0
//! Host errors.

use hospitwin_viz_animation::AnimationError;
use hospitwin_viz_telemetry::TelemetryError;

/// Anything that stops the host from starting its frame loop
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Settings file could not be read or written
    #[error("Settings I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Settings file is not valid RON
    #[error("Settings file is malformed: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Settings could not be serialized
    #[error("Settings could not be written: {0}")]
    Serialize(#[from] ron::Error),

    /// Settings file is from a newer format
    #[error("Settings version {found} is newer than supported version {supported}")]
    UnsupportedVersion {
        /// Version in the file
        found: u32,
        /// Newest version this build reads
        supported: u32,
    },

    /// A frame loop setting is out of range
    #[error("Invalid setting `{name}`: {reason}")]
    InvalidSetting {
        /// Setting path
        name: &'static str,
        /// What is wrong with it
        reason: String,
    },

    /// Animation construction rejected its configuration
    #[error(transparent)]
    Animation(#[from] AnimationError),

    /// Telemetry construction rejected its configuration
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
}
