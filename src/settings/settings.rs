//! Timer settings structure and duration validation

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ValidationError;

/// Name of the persisted record holding the settings
pub const SETTINGS_RECORD: &str = "pomodoroSettings";

/// Default work phase length in minutes
pub const DEFAULT_WORK_MINUTES: u32 = 25;
/// Default break phase length in minutes
pub const DEFAULT_BREAK_MINUTES: u32 = 5;

/// User-chosen phase durations, the only durable state of the timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub work_duration_minutes: u32,
    pub break_duration_minutes: u32,
}

impl Settings {
    /// Create settings from already validated durations
    pub fn new(work_duration_minutes: u32, break_duration_minutes: u32) -> Self {
        Self {
            work_duration_minutes,
            break_duration_minutes,
        }
    }

    /// Work phase length in seconds
    pub fn work_seconds(&self) -> u64 {
        u64::from(self.work_duration_minutes) * 60
    }

    /// Break phase length in seconds
    pub fn break_seconds(&self) -> u64 {
        u64::from(self.break_duration_minutes) * 60
    }

    /// Check that both durations are strictly positive
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_minutes(i64::from(self.work_duration_minutes))?;
        check_minutes(i64::from(self.break_duration_minutes))?;
        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new(DEFAULT_WORK_MINUTES, DEFAULT_BREAK_MINUTES)
    }
}

/// Accept an integral minute count that is strictly positive
pub fn check_minutes(minutes: i64) -> Result<u32, ValidationError> {
    if minutes <= 0 {
        return Err(ValidationError::NonPositive(minutes));
    }
    u32::try_from(minutes).map_err(|_| ValidationError::TooLarge(minutes))
}

fn check_float_minutes(minutes: f64, raw: &str) -> Result<u32, ValidationError> {
    if !minutes.is_finite() {
        return Err(ValidationError::Unparsable(raw.to_string()));
    }
    if minutes.fract() != 0.0 {
        // A negative fraction is still reported as non-positive first
        if minutes <= 0.0 {
            return Err(ValidationError::NonPositive(minutes.trunc() as i64));
        }
        return Err(ValidationError::NotAnInteger(raw.to_string()));
    }
    if minutes > i64::MAX as f64 {
        return Err(ValidationError::TooLarge(i64::MAX));
    }
    check_minutes(minutes as i64)
}

/// Parse a duration typed in by the user, e.g. `"25"`
pub fn parse_minutes(input: &str) -> Result<u32, ValidationError> {
    let trimmed = input.trim();
    if let Ok(minutes) = trimmed.parse::<i64>() {
        return check_minutes(minutes);
    }
    match trimmed.parse::<f64>() {
        Ok(minutes) => check_float_minutes(minutes, trimmed),
        Err(_) => Err(ValidationError::Unparsable(input.to_string())),
    }
}

/// Extract a duration from a JSON request value (number or numeric string)
pub fn minutes_from_json(value: &Value) -> Result<u32, ValidationError> {
    match value {
        Value::Number(number) => {
            if let Some(minutes) = number.as_i64() {
                check_minutes(minutes)
            } else if number.is_u64() {
                Err(ValidationError::TooLarge(i64::MAX))
            } else {
                let minutes = number.as_f64().unwrap_or(f64::NAN);
                check_float_minutes(minutes, &number.to_string())
            }
        }
        Value::String(text) => parse_minutes(text),
        other => Err(ValidationError::Unparsable(other.to_string())),
    }
}
