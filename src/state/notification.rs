//! Phase change notifications handed to the presentation layer

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Phase;

/// Styling hint for how loudly a notification should be shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Default,
    Destructive,
}

/// Emitted exactly once per rollover
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseNotification {
    pub entering_phase: Phase,
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub completed_pomodoros: u64,
    pub timestamp: DateTime<Utc>,
}

impl PhaseNotification {
    /// Build the notification for entering the given phase
    pub fn entering(phase: Phase, completed_pomodoros: u64) -> Self {
        let (title, description, severity) = match phase {
            Phase::Work => ("Work Time!", "Starting work session...", Severity::Default),
            Phase::Break => ("Break Time!", "Starting break session...", Severity::Destructive),
        };

        Self {
            entering_phase: phase,
            title: title.to_string(),
            description: description.to_string(),
            severity,
            completed_pomodoros,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn break_notifications_are_alerts() {
        let note = PhaseNotification::entering(Phase::Break, 1);
        assert_eq!(note.title, "Break Time!");
        assert_eq!(note.severity, Severity::Destructive);

        let note = PhaseNotification::entering(Phase::Work, 1);
        assert_eq!(note.description, "Starting work session...");
        assert_eq!(note.severity, Severity::Default);
    }

    #[test]
    fn serializes_entering_phase_in_camel_case() {
        let value = serde_json::to_value(PhaseNotification::entering(Phase::Work, 0)).unwrap();
        assert_eq!(value["enteringPhase"], "work");
        assert_eq!(value["severity"], "default");
    }
}
