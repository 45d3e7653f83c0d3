// SPDX-License-Identifier: MIT OR Apache-2.0
//! Patient animation scheduler.
//!
//! Owns every patient's animation record and advances the whole population
//! once per tick.

use crate::error::AnimationError;
use crate::patient::{AnimatedPatient, PatientState, StateDurations, TransformSink};
use crate::zone::ZoneLayout;

/// Advances a fixed population of patients through the zone cycle
#[derive(Debug)]
pub struct PatientScheduler<H> {
    patients: Vec<AnimatedPatient<H>>,
    layout: ZoneLayout,
    durations: StateDurations,
    stagger_interval: f64,
}

impl<H: TransformSink> PatientScheduler<H> {
    /// Create the population from render handles in registry order.
    ///
    /// Patient `i` starts after `i * stagger_interval` seconds. An empty
    /// handle list gives an empty scheduler.
    pub fn new(
        handles: Vec<H>,
        stagger_interval: f64,
        layout: &ZoneLayout,
    ) -> Result<Self, AnimationError> {
        if !stagger_interval.is_finite() || stagger_interval <= 0.0 {
            return Err(AnimationError::InvalidStaggerInterval(stagger_interval));
        }
        let durations = StateDurations::from_layout(layout)?;

        let mut patients: Vec<_> = handles
            .into_iter()
            .enumerate()
            .map(|(index, handle)| AnimatedPatient::new(handle, index as f64 * stagger_interval))
            .collect();

        // Patients with no delay are visible from the first frame
        for patient in patients.iter_mut().filter(|p| p.active) {
            let pose = patient.state.pose(layout, 0.0);
            patient.handle.set_transform(pose);
        }

        tracing::debug!(
            patients = patients.len(),
            stagger_interval,
            cycle_length = durations.cycle_length(),
            "patient scheduler created"
        );

        Ok(Self {
            patients,
            layout: layout.clone(),
            durations,
            stagger_interval,
        })
    }

    /// Advance every patient by `dt` seconds and write its new pose.
    ///
    /// Non-finite or non-positive deltas are ignored. Patients still waiting
    /// on their start delay are not written.
    pub fn advance(&mut self, dt: f64) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }

        for patient in &mut self.patients {
            if !patient.step(dt, &self.durations) {
                continue;
            }
            let t = patient.state_progress(&self.durations);
            let pose = patient.state.pose(&self.layout, t);
            patient.handle.set_transform(pose);
        }
    }
}

impl<H> PatientScheduler<H> {
    /// Number of patients
    pub fn len(&self) -> usize {
        self.patients.len()
    }

    /// Whether the population is empty
    pub fn is_empty(&self) -> bool {
        self.patients.is_empty()
    }

    /// Iterate over patient records
    pub fn iter(&self) -> impl Iterator<Item = &AnimatedPatient<H>> {
        self.patients.iter()
    }

    /// Get a patient record by registry index
    pub fn patient(&self, index: usize) -> Option<&AnimatedPatient<H>> {
        self.patients.get(index)
    }

    /// Number of patients past their start delay
    pub fn active_count(&self) -> usize {
        self.patients.iter().filter(|p| p.active).count()
    }

    /// Active patients per state, in cycle order
    pub fn state_counts(&self) -> [(PatientState, usize); 5] {
        PatientState::ALL.map(|state| {
            let count = self
                .patients
                .iter()
                .filter(|p| p.active && p.state == state)
                .count();
            (state, count)
        })
    }

    /// Duration table derived from the layout
    pub fn durations(&self) -> &StateDurations {
        &self.durations
    }

    /// Zone layout the patients walk
    pub fn layout(&self) -> &ZoneLayout {
        &self.layout
    }

    /// Seconds between consecutive patients' start times
    pub fn stagger_interval(&self) -> f64 {
        self.stagger_interval
    }

    /// Tear down the scheduler and hand the render handles back
    pub fn into_handles(self) -> Vec<H> {
        self.patients.into_iter().map(|p| p.handle).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patient::PatientTransform;

    /// Sink that counts writes
    #[derive(Debug, Default)]
    struct CountingSink {
        last: Option<PatientTransform>,
        writes: usize,
    }

    impl TransformSink for CountingSink {
        fn set_transform(&mut self, transform: PatientTransform) {
            self.last = Some(transform);
            self.writes += 1;
        }
    }

    fn sinks(count: usize) -> Vec<CountingSink> {
        (0..count).map(|_| CountingSink::default()).collect()
    }

    #[test]
    fn test_create_assigns_stagger() {
        let scheduler = PatientScheduler::new(sinks(4), 0.5, &ZoneLayout::default()).unwrap();
        assert_eq!(scheduler.len(), 4);
        for (index, patient) in scheduler.iter().enumerate() {
            assert_eq!(patient.start_delay, index as f64 * 0.5);
            assert_eq!(patient.state, PatientState::Entering);
            assert_eq!(patient.state_elapsed, 0.0);
        }
        assert_eq!(scheduler.active_count(), 1);
    }

    #[test]
    fn test_create_empty() {
        let scheduler =
            PatientScheduler::<CountingSink>::new(Vec::new(), 1.0, &ZoneLayout::default()).unwrap();
        assert!(scheduler.is_empty());
        assert_eq!(scheduler.active_count(), 0);
    }

    #[test]
    fn test_create_rejects_bad_stagger() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let result = PatientScheduler::new(sinks(2), bad, &ZoneLayout::default());
            assert!(matches!(result, Err(AnimationError::InvalidStaggerInterval(_))));
        }
    }

    #[test]
    fn test_create_rejects_bad_layout() {
        let layout = ZoneLayout {
            walk_speed: -1.0,
            ..ZoneLayout::default()
        };
        let result = PatientScheduler::new(sinks(2), 1.0, &layout);
        assert_eq!(result.err(), Some(AnimationError::InvalidWalkSpeed(-1.0)));
    }

    #[test]
    fn test_waiting_patients_are_not_written() {
        let mut scheduler = PatientScheduler::new(sinks(3), 1.0, &ZoneLayout::default()).unwrap();
        scheduler.advance(0.5);

        let handles = scheduler.into_handles();
        assert_eq!(handles[0].writes, 2);
        assert_eq!(handles[1].writes, 0);
        assert_eq!(handles[2].writes, 0);
    }

    #[test]
    fn test_ignores_invalid_dt() {
        let mut scheduler = PatientScheduler::new(sinks(1), 1.0, &ZoneLayout::default()).unwrap();
        scheduler.advance(1.0);
        for bad in [0.0, -0.5, f64::NAN, f64::INFINITY] {
            scheduler.advance(bad);
        }
        let patient = scheduler.patient(0).unwrap();
        assert_eq!(patient.state, PatientState::Entering);
        assert!((patient.state_elapsed - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_state_counts_track_population() {
        let mut scheduler = PatientScheduler::new(sinks(5), 1.0, &ZoneLayout::default()).unwrap();
        // 5.5s: patient 0 is half a second into triage, the rest are walking in
        for _ in 0..11 {
            scheduler.advance(0.5);
        }
        let counts = scheduler.state_counts();
        assert_eq!(counts[0], (PatientState::Entering, 4));
        assert_eq!(counts[1], (PatientState::Triaging, 1));
        let total: usize = counts.iter().map(|(_, n)| n).sum();
        assert_eq!(total, scheduler.active_count());
    }

    #[test]
    fn test_walking_patient_moves_towards_triage() {
        let layout = ZoneLayout::default();
        let mut scheduler = PatientScheduler::new(sinks(1), 1.0, &layout).unwrap();

        let mut last_distance = f32::MAX;
        for _ in 0..9 {
            scheduler.advance(0.5);
            let patient = scheduler.patient(0).unwrap();
            let position = patient.handle.last.unwrap().position;
            let distance = crate::easing::Interpolation::distance(position, layout.triage);
            assert!(distance <= last_distance);
            last_distance = distance;
        }
    }
}
