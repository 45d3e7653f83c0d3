// SPDX-License-Identifier: MIT OR Apache-2.0
//! Frame loop driving the three subsystems.
//!
//! This module handles:
//! - Clamping the raw frame delta before anything sees it
//! - Feeding the same delta to the scheduler, progress tracker and sampler
//! - Pacing frames and stopping on request
//! - Overlay reports on a once-per-interval cadence

use crate::error::AppError;
use crate::overlay::OverlayReport;
use crate::scene::{HeadlessScene, PatientHandle};
use crate::settings::{FrameLoopSettings, VizSettings};
use hospitwin_viz_animation::{CycleProgressTracker, PatientScheduler};
use hospitwin_viz_telemetry::{MetricsSnapshot, TelemetrySampler};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Revokes a running frame loop from any thread
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    stopped: Arc<AtomicBool>,
}

impl StopHandle {
    /// Create a handle in the running state
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the loop to stop after the current frame
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Release);
    }

    /// Whether a stop was requested
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }
}

/// Cap a raw frame delta. Returns the delta to use and whether it was cut.
pub fn clamp_delta(raw: f64, ceiling: f64) -> (f64, bool) {
    if raw > ceiling {
        (ceiling, true)
    } else {
        (raw.max(0.0), false)
    }
}

/// What a finished run looked like
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Frames ticked
    pub frames: u64,
    /// Seconds of simulated (clamped) time
    pub simulated_seconds: f64,
    /// Frames whose raw delta hit the ceiling
    pub clamped_frames: u64,
    /// Telemetry at the end of the run
    pub metrics: MetricsSnapshot,
}

/// Owns the scene and the three subsystems for one session
pub struct FrameLoop {
    scene: HeadlessScene,
    scheduler: PatientScheduler<PatientHandle>,
    tracker: CycleProgressTracker,
    sampler: TelemetrySampler,
    settings: FrameLoopSettings,
    frames: u64,
    clamped_frames: u64,
    simulated_seconds: f64,
    since_report: f64,
}

impl FrameLoop {
    /// Build the scene and every subsystem from settings
    pub fn new(settings: &VizSettings) -> Result<Self, AppError> {
        settings.validate()?;

        let (scene, handles) = HeadlessScene::build(&settings.layout, settings.patients.count);
        let scheduler =
            PatientScheduler::new(handles, settings.patients.stagger_interval, &settings.layout)?;
        let tracker = CycleProgressTracker::with_cycle_length(settings.progress.cycle_length)?;
        let sampler =
            TelemetrySampler::with_counters(settings.telemetry.window_capacity, scene.counters())?;

        tracing::info!(
            patients = scheduler.len(),
            patient_cycle = scheduler.durations().cycle_length(),
            progress_cycle = tracker.cycle_length(),
            "frame loop ready"
        );

        Ok(Self {
            scene,
            scheduler,
            tracker,
            sampler,
            settings: settings.frame_loop.clone(),
            frames: 0,
            clamped_frames: 0,
            simulated_seconds: 0.0,
            since_report: 0.0,
        })
    }

    /// Run one frame with a raw delta in seconds.
    ///
    /// Every subsystem receives the same clamped delta. Returns the delta
    /// that was applied.
    pub fn tick(&mut self, raw_dt: f64) -> f64 {
        let (dt, clamped) = clamp_delta(raw_dt, self.settings.max_frame_delta);
        if clamped {
            self.clamped_frames += 1;
            tracing::debug!(raw_dt, dt, "frame delta clamped");
        }

        self.scheduler.advance(dt);
        self.tracker.update(dt);
        self.scene.set_progress_scale(self.tracker.bar_scale());
        self.scene.render();

        // Sampled after render so polled counters describe this frame
        self.sampler.update(dt);

        self.frames += 1;
        self.simulated_seconds += dt;
        self.since_report += dt;
        if self.since_report >= self.settings.report_interval {
            self.since_report -= self.settings.report_interval;
            self.report().log();
        }

        dt
    }

    /// Pace frames to the target rate until stopped or `run_for` elapses
    pub fn run(&mut self, stop: &StopHandle) -> RunSummary {
        let frame_budget = Duration::from_secs_f64(1.0 / self.settings.target_fps);
        let deadline = self.settings.run_for.map(Duration::from_secs_f64);
        let started = Instant::now();
        let mut last_frame = started;

        tracing::info!(target_fps = self.settings.target_fps, "frame loop started");

        while !stop.is_stopped() {
            let frame_start = Instant::now();
            let raw_dt = frame_start.duration_since(last_frame).as_secs_f64();
            last_frame = frame_start;

            self.tick(raw_dt);

            if deadline.is_some_and(|limit| started.elapsed() >= limit) {
                break;
            }

            let spent = frame_start.elapsed();
            if spent < frame_budget {
                std::thread::sleep(frame_budget - spent);
            }
        }

        let summary = self.summary();
        tracing::info!(
            frames = summary.frames,
            simulated_seconds = summary.simulated_seconds,
            clamped_frames = summary.clamped_frames,
            "frame loop stopped"
        );
        summary
    }

    /// Overlay figures right now
    pub fn report(&self) -> OverlayReport {
        OverlayReport::collect(&self.scheduler, &self.tracker, self.sampler.metrics())
    }

    /// Counters so far
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            frames: self.frames,
            simulated_seconds: self.simulated_seconds,
            clamped_frames: self.clamped_frames,
            metrics: self.sampler.metrics(),
        }
    }

    /// Patient scheduler
    pub fn scheduler(&self) -> &PatientScheduler<PatientHandle> {
        &self.scheduler
    }

    /// Progress tracker
    pub fn tracker(&self) -> &CycleProgressTracker {
        &self.tracker
    }

    /// Scene being animated
    pub fn scene(&self) -> &HeadlessScene {
        &self.scene
    }

    /// Stop driving the subsystems and release the scene
    pub fn teardown(self) {
        let handles = self.scheduler.into_handles();
        self.scene.teardown(handles);
    }
}
