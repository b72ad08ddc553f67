//! Read-only view of the timer for presentation

use serde::{Deserialize, Serialize};

use crate::utils::{format_accumulated, format_clock};
use super::{Phase, TimerEngine};

/// Raw counters plus the derived display values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub phase: Phase,
    pub session_label: String,
    pub running: bool,
    pub remaining_seconds: u64,
    pub clock: String,
    /// Elapsed share of the current phase, at most `1.0`
    pub progress: f64,
    pub completed_pomodoros: u64,
    pub total_work_seconds: u64,
    pub total_break_seconds: u64,
    pub total_work: String,
    pub total_break: String,
    pub work_duration_minutes: u32,
    pub break_duration_minutes: u32,
}

impl TimerSnapshot {
    pub fn capture(engine: &TimerEngine) -> Self {
        let state = engine.state();
        let settings = engine.settings();

        Self {
            phase: state.phase,
            session_label: state.phase.label().to_string(),
            running: state.running,
            remaining_seconds: state.remaining_seconds,
            clock: format_clock(state.remaining_seconds),
            progress: engine.progress_fraction(),
            completed_pomodoros: state.completed_pomodoros,
            total_work_seconds: state.total_work_seconds,
            total_break_seconds: state.total_break_seconds,
            total_work: format_accumulated(state.total_work_seconds),
            total_break: format_accumulated(state.total_break_seconds),
            work_duration_minutes: settings.work_duration_minutes,
            break_duration_minutes: settings.break_duration_minutes,
        }
    }
}
