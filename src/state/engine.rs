//! Work/break timer state machine

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::settings::{check_minutes, Settings, SettingsStore, ValidationError};
use super::{Phase, PhaseNotification, TimerState};

/// Owns the settings and the countdown, advanced one second per `tick`
pub struct TimerEngine {
    settings: Settings,
    state: TimerState,
    store: Arc<dyn SettingsStore>,
}

impl std::fmt::Debug for TimerEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerEngine")
            .field("settings", &self.settings)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl TimerEngine {
    /// Load settings from the store (or defaults) and start paused in Work
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        let settings = match store.load() {
            Ok(Some(settings)) if settings.validate().is_err() => {
                warn!(
                    "Ignoring invalid stored settings: work={}min, break={}min",
                    settings.work_duration_minutes, settings.break_duration_minutes
                );
                Settings::default()
            }
            Ok(Some(settings)) => {
                info!(
                    "Loaded settings: work={}min, break={}min",
                    settings.work_duration_minutes, settings.break_duration_minutes
                );
                settings
            }
            Ok(None) => {
                debug!("No stored settings, using defaults");
                Settings::default()
            }
            Err(e) => {
                warn!("Ignoring unreadable stored settings: {}", e);
                Settings::default()
            }
        };

        Self {
            state: TimerState::new(&settings),
            settings,
            store,
        }
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    /// Handle on the store settings are persisted through
    pub fn store(&self) -> Arc<dyn SettingsStore> {
        Arc::clone(&self.store)
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    /// Configured length of the current phase in seconds
    pub fn current_phase_seconds(&self) -> u64 {
        self.state.phase.duration_seconds(&self.settings)
    }

    /// Begin or resume the countdown
    pub fn start(&mut self) {
        if !self.state.running {
            debug!("Timer started in {} phase", self.state.phase.as_str());
            self.state.running = true;
        }
    }

    /// Stop the countdown without losing progress
    pub fn pause(&mut self) {
        if self.state.running {
            debug!("Timer paused with {}s remaining", self.state.remaining_seconds);
            self.state.running = false;
        }
    }

    /// Back to a paused Work phase with all counters cleared
    pub fn reset(&mut self) {
        info!("Timer reset");
        self.state = TimerState::new(&self.settings);
    }

    /// Advance one second. Returns the notification when a rollover happened.
    pub fn tick(&mut self) -> Option<PhaseNotification> {
        if !self.state.running {
            return None;
        }

        if self.state.remaining_seconds > 0 {
            self.state.remaining_seconds -= 1;
            match self.state.phase {
                Phase::Work => self.state.total_work_seconds += 1,
                Phase::Break => self.state.total_break_seconds += 1,
            }
        }

        if self.state.remaining_seconds == 0 {
            Some(self.roll_over())
        } else {
            None
        }
    }

    // Remaining time is restored to a positive duration here, so the next
    // tick can never fire a second rollover for the same crossing.
    fn roll_over(&mut self) -> PhaseNotification {
        let entering = self.state.phase.next();
        self.state.phase = entering;
        if entering == Phase::Break {
            self.state.completed_pomodoros += 1;
        }
        self.state.remaining_seconds = self.current_phase_seconds();

        info!(
            "Entering {} phase ({}s), {} pomodoros completed",
            entering.as_str(),
            self.state.remaining_seconds,
            self.state.completed_pomodoros
        );
        PhaseNotification::entering(entering, self.state.completed_pomodoros)
    }

    /// Change the work phase length
    pub fn set_work_duration(&mut self, minutes: i64) -> Result<(), ValidationError> {
        self.set_duration(Phase::Work, minutes)
    }

    /// Change the break phase length
    pub fn set_break_duration(&mut self, minutes: i64) -> Result<(), ValidationError> {
        self.set_duration(Phase::Break, minutes)
    }

    fn set_duration(&mut self, phase: Phase, minutes: i64) -> Result<(), ValidationError> {
        let settings = self.apply_duration(phase, minutes)?;
        persist_settings(self.store.as_ref(), &settings);
        Ok(())
    }

    /// Validate and apply a duration edit without persisting it.
    ///
    /// Returns the settings the caller is expected to hand to the store.
    pub fn apply_duration(&mut self, phase: Phase, minutes: i64) -> Result<Settings, ValidationError> {
        let minutes = check_minutes(minutes)?;

        match phase {
            Phase::Work => self.settings.work_duration_minutes = minutes,
            Phase::Break => self.settings.break_duration_minutes = minutes,
        }
        info!("{} duration set to {}min", phase.as_str(), minutes);

        // Only a paused, active phase reflects the edit immediately
        if self.state.phase == phase && !self.state.running {
            self.state.remaining_seconds = phase.duration_seconds(&self.settings);
        }
        Ok(self.settings)
    }

    /// Share of the current phase already elapsed, capped at `1.0`.
    ///
    /// Goes negative when a running phase's duration was shortened below
    /// the time still remaining.
    pub fn progress_fraction(&self) -> f64 {
        let total = self.current_phase_seconds();
        if total == 0 {
            return 0.0;
        }
        let elapsed = total as f64 - self.state.remaining_seconds as f64;
        (elapsed / total as f64).min(1.0)
    }
}

/// Write settings through the store; failures are logged, never returned
pub fn persist_settings(store: &dyn SettingsStore, settings: &Settings) {
    if let Err(e) = store.save(settings) {
        warn!("Failed to persist settings: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{MemoryStore, PersistenceError};

    fn engine_with(store: MemoryStore) -> (TimerEngine, Arc<MemoryStore>) {
        let store = Arc::new(store);
        let engine = TimerEngine::new(Arc::clone(&store) as Arc<dyn SettingsStore>);
        (engine, store)
    }

    fn default_engine() -> TimerEngine {
        engine_with(MemoryStore::new()).0
    }

    fn run_ticks(engine: &mut TimerEngine, count: u64) -> Vec<PhaseNotification> {
        (0..count).filter_map(|_| engine.tick()).collect()
    }

    #[test]
    fn starts_with_defaults_when_store_is_empty() {
        let engine = default_engine();
        assert_eq!(engine.settings(), Settings::default());
        assert_eq!(engine.state().phase, Phase::Work);
        assert_eq!(engine.state().remaining_seconds, 1500);
        assert!(!engine.is_running());
    }

    #[test]
    fn adopts_stored_settings() {
        let (engine, _) = engine_with(MemoryStore::with_settings(Settings::new(40, 10)));
        assert_eq!(engine.settings(), Settings::new(40, 10));
        assert_eq!(engine.state().remaining_seconds, 2400);
    }

    #[test]
    fn malformed_record_falls_back_to_defaults() {
        let store = MemoryStore::new();
        store.put_raw("{broken");
        let (engine, _) = engine_with(store);
        assert_eq!(engine.settings(), Settings::default());
        assert_eq!(engine.state().remaining_seconds, 1500);
    }

    #[test]
    fn tick_is_ignored_while_paused() {
        let mut engine = default_engine();
        assert!(engine.tick().is_none());
        assert_eq!(engine.state().remaining_seconds, 1500);
        assert_eq!(engine.state().total_work_seconds, 0);
    }

    #[test]
    fn start_and_pause_are_idempotent() {
        let mut engine = default_engine();
        engine.start();
        engine.start();
        assert!(engine.is_running());
        engine.tick();
        engine.pause();
        engine.pause();
        assert!(!engine.is_running());
        assert_eq!(engine.state().remaining_seconds, 1499);
    }

    #[test]
    fn full_cycle_with_default_durations() {
        let mut engine = default_engine();
        engine.start();

        let notes = run_ticks(&mut engine, 1500);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].entering_phase, Phase::Break);
        assert_eq!(engine.state().phase, Phase::Break);
        assert_eq!(engine.state().remaining_seconds, 300);
        assert_eq!(engine.state().completed_pomodoros, 1);
        assert_eq!(engine.state().total_work_seconds, 1500);

        let notes = run_ticks(&mut engine, 300);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].entering_phase, Phase::Work);
        assert_eq!(engine.state().phase, Phase::Work);
        assert_eq!(engine.state().remaining_seconds, 1500);
        assert_eq!(engine.state().completed_pomodoros, 1);
        assert_eq!(engine.state().total_break_seconds, 300);
    }

    #[test]
    fn remaining_never_increases_between_rollovers() {
        let (mut engine, _) = engine_with(MemoryStore::with_settings(Settings::new(1, 1)));
        engine.start();
        let mut previous = engine.state().remaining_seconds;
        let mut rollovers = 0;
        for _ in 0..600 {
            let fired = engine.tick().is_some();
            let remaining = engine.state().remaining_seconds;
            if fired {
                rollovers += 1;
                assert_eq!(remaining, engine.current_phase_seconds());
            } else {
                assert!(remaining < previous);
            }
            assert!(remaining <= engine.current_phase_seconds());
            previous = remaining;
        }
        assert_eq!(rollovers, 10);
        assert_eq!(engine.state().completed_pomodoros, 5);
    }

    #[test]
    fn totals_match_ticks_consumed_while_running() {
        let (mut engine, _) = engine_with(MemoryStore::with_settings(Settings::new(2, 1)));
        engine.start();
        run_ticks(&mut engine, 250);
        engine.pause();
        run_ticks(&mut engine, 40);
        engine.start();
        run_ticks(&mut engine, 17);
        assert_eq!(engine.state().total_elapsed_seconds(), 267);
    }

    #[test]
    fn reset_clears_everything() {
        let (mut engine, _) = engine_with(MemoryStore::with_settings(Settings::new(1, 1)));
        engine.start();
        run_ticks(&mut engine, 95);
        engine.reset();
        assert_eq!(engine.state(), &TimerState::new(&Settings::new(1, 1)));
    }

    #[test]
    fn reset_uses_latest_work_duration() {
        let mut engine = default_engine();
        engine.start();
        engine.set_work_duration(10).unwrap();
        assert_eq!(engine.state().remaining_seconds, 1500);
        engine.reset();
        assert_eq!(engine.state().remaining_seconds, 600);
    }

    #[test]
    fn editing_paused_active_phase_updates_countdown() {
        let (mut engine, store) = engine_with(MemoryStore::new());
        engine.set_work_duration(30).unwrap();
        assert_eq!(engine.state().remaining_seconds, 1800);
        assert_eq!(store.load().unwrap(), Some(Settings::new(30, 5)));

        engine.set_break_duration(15).unwrap();
        assert_eq!(engine.state().remaining_seconds, 1800);
        assert_eq!(store.load().unwrap(), Some(Settings::new(30, 15)));
        assert_eq!(store.write_count(), 2);
    }

    #[test]
    fn editing_break_applies_during_paused_break() {
        let (mut engine, _) = engine_with(MemoryStore::with_settings(Settings::new(1, 5)));
        engine.start();
        run_ticks(&mut engine, 60);
        engine.pause();
        assert_eq!(engine.state().phase, Phase::Break);
        engine.set_break_duration(2).unwrap();
        assert_eq!(engine.state().remaining_seconds, 120);
    }

    #[test]
    fn invalid_durations_leave_state_untouched() {
        let (mut engine, store) = engine_with(MemoryStore::new());
        engine.start();
        run_ticks(&mut engine, 5);
        let before = engine.state().clone();

        assert_eq!(engine.set_work_duration(-5), Err(ValidationError::NonPositive(-5)));
        assert_eq!(engine.set_break_duration(0), Err(ValidationError::NonPositive(0)));
        assert!(matches!(
            engine.set_work_duration(i64::MAX),
            Err(ValidationError::TooLarge(_))
        ));

        assert_eq!(engine.state(), &before);
        assert_eq!(engine.settings(), Settings::default());
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn progress_restarts_after_rollover() {
        let (mut engine, _) = engine_with(MemoryStore::with_settings(Settings::new(1, 1)));
        assert_eq!(engine.progress_fraction(), 0.0);
        engine.start();
        run_ticks(&mut engine, 30);
        assert!((engine.progress_fraction() - 0.5).abs() < f64::EPSILON);
        run_ticks(&mut engine, 30);
        assert_eq!(engine.state().phase, Phase::Break);
        assert_eq!(engine.progress_fraction(), 0.0);
    }

    #[test]
    fn progress_goes_negative_when_running_duration_shrinks() {
        let mut engine = default_engine();
        engine.start();
        run_ticks(&mut engine, 120);
        // Running edits leave the countdown alone, so remaining can exceed the new total
        engine.set_work_duration(1).unwrap();
        assert_eq!(engine.state().remaining_seconds, 1380);
        assert!((engine.progress_fraction() - (-22.0)).abs() < 1e-9);
        assert!(engine.progress_fraction() <= 1.0);
    }

    /// Store outside this crate's control handing back whatever it holds
    struct FixedStore(Settings);

    impl SettingsStore for FixedStore {
        fn load(&self) -> Result<Option<Settings>, PersistenceError> {
            Ok(Some(self.0))
        }

        fn save(&self, _settings: &Settings) -> Result<(), PersistenceError> {
            Ok(())
        }
    }

    #[test]
    fn zero_durations_from_store_fall_back_to_defaults() {
        let mut engine = TimerEngine::new(Arc::new(FixedStore(Settings::new(0, 0))));
        assert_eq!(engine.settings(), Settings::default());
        assert_eq!(engine.state().remaining_seconds, 1500);

        engine.start();
        assert!(run_ticks(&mut engine, 5).is_empty());
        assert_eq!(engine.state().completed_pomodoros, 0);
        assert_eq!(engine.state().remaining_seconds, 1495);
    }

    #[test]
    fn one_zero_duration_invalidates_the_record() {
        let engine = TimerEngine::new(Arc::new(FixedStore(Settings::new(30, 0))));
        assert_eq!(engine.settings(), Settings::default());
    }

    #[test]
    fn apply_duration_does_not_persist() {
        let (mut engine, store) = engine_with(MemoryStore::new());
        let settings = engine.apply_duration(Phase::Work, 20).unwrap();
        assert_eq!(settings, Settings::new(20, 5));
        assert_eq!(engine.state().remaining_seconds, 1200);
        assert_eq!(store.write_count(), 0);
    }
}
