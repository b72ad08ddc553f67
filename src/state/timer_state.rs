//! Timer state structure and phase definitions

use serde::{Deserialize, Serialize};

use crate::settings::Settings;

/// Kind of session currently counting down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Work,
    Break,
}

impl Phase {
    /// The phase that follows this one on rollover
    pub fn next(self) -> Self {
        match self {
            Phase::Work => Phase::Break,
            Phase::Break => Phase::Work,
        }
    }

    /// Configured length of this phase in seconds
    pub fn duration_seconds(self, settings: &Settings) -> u64 {
        match self {
            Phase::Work => settings.work_seconds(),
            Phase::Break => settings.break_seconds(),
        }
    }

    /// Human readable session label
    pub fn label(self) -> &'static str {
        match self {
            Phase::Work => "Work Session",
            Phase::Break => "Break Session",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Work => "work",
            Phase::Break => "break",
        }
    }
}

/// Countdown and counters of the running session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    pub phase: Phase,
    pub remaining_seconds: u64,
    pub running: bool,
    /// Work -> Break transitions since the last reset
    pub completed_pomodoros: u64,
    pub total_work_seconds: u64,
    pub total_break_seconds: u64,
}

impl TimerState {
    /// Fresh paused state at the start of a work phase
    pub fn new(settings: &Settings) -> Self {
        Self {
            phase: Phase::Work,
            remaining_seconds: settings.work_seconds(),
            running: false,
            completed_pomodoros: 0,
            total_work_seconds: 0,
            total_break_seconds: 0,
        }
    }

    /// Seconds consumed while running, across both phases
    pub fn total_elapsed_seconds(&self) -> u64 {
        self.total_work_seconds + self.total_break_seconds
    }
}
