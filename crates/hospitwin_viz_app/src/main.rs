// SPDX-License-Identifier: MIT OR Apache-2.0
//! Headless host for the patient-flow visualization.
//!
//! Builds a scene of zone markers, patient figures and a progress bar, then
//! drives the patient scheduler, cycle progress tracker and telemetry
//! sampler from one frame loop until Ctrl-C or the configured run time.
//!
//! Usage: `hospitwin_viz [settings.ron]`. A missing settings file is created
//! with the defaults.

mod error;
mod frame_loop;
mod overlay;
mod scene;
mod settings;

use error::AppError;
use frame_loop::{FrameLoop, RunSummary, StopHandle};
use settings::VizSettings;
use std::path::{Path, PathBuf};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const DEFAULT_FILTER: &str =
    "hospitwin_viz=info,hospitwin_viz_app=info,hospitwin_viz_animation=info,hospitwin_viz_telemetry=info";

fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting hospitwin_viz v{}", env!("CARGO_PKG_VERSION"));

    let settings_path = std::env::args().nth(1).map(PathBuf::from);
    match run(settings_path.as_deref()) {
        Ok(summary) => {
            tracing::info!(
                "Ran {} frames ({:.1}s simulated, {} clamped), average {:.1} fps",
                summary.frames,
                summary.simulated_seconds,
                summary.clamped_frames,
                summary.metrics.average_fps,
            );
        }
        Err(e) => {
            tracing::error!("Visualization failed: {e}");
            std::process::exit(1);
        }
    }
}

fn run(settings_path: Option<&Path>) -> Result<RunSummary, AppError> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()?;

    let settings = runtime.block_on(load_settings(settings_path))?;
    let mut frame_loop = FrameLoop::new(&settings)?;

    let stop = StopHandle::new();
    let on_signal = stop.clone();
    runtime.spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Interrupt received, stopping");
                on_signal.stop();
            }
            Err(e) => tracing::warn!("Could not listen for Ctrl-C: {e}"),
        }
    });

    // The frame loop owns non-Send render state, so it stays on this thread
    let summary = frame_loop.run(&stop);
    tracing::info!(
        active_patients = frame_loop.scheduler().active_count(),
        progress_cycles = frame_loop.tracker().cycles_completed(),
        scene_nodes = frame_loop.scene().node_count(),
        "final state"
    );
    frame_loop.teardown();
    runtime.shutdown_background();
    Ok(summary)
}

async fn load_settings(path: Option<&Path>) -> Result<VizSettings, AppError> {
    let Some(path) = path else {
        tracing::info!("No settings file given, using defaults");
        return Ok(VizSettings::default());
    };

    if tokio::fs::try_exists(path).await? {
        let settings = VizSettings::load(path).await?;
        tracing::info!("Loaded settings from {}", path.display());
        Ok(settings)
    } else {
        let settings = VizSettings::default();
        settings.save(path).await?;
        tracing::info!("Wrote default settings to {}", path.display());
        Ok(settings)
    }
}
