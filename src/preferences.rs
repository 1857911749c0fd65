// Validation of user scheduling preferences.
// Out-of-range values are rejected, never clamped.

use crate::error::{Result, SchedulerError};
use crate::models::Preferences;

pub const BREAK_MIN: i64 = 5;
pub const BREAK_MAX: i64 = 60;
pub const BREAK_STEP: i64 = 5;

pub const SESSION_MIN: i64 = 30;
pub const SESSION_MAX: i64 = 240;
pub const SESSION_STEP: i64 = 15;

fn check_stepped(name: &str, value: i64, min: i64, max: i64, step: i64) -> Result<()> {
    if !(min..=max).contains(&value) {
        return Err(SchedulerError::InvalidPreferences(format!(
            "{name} must be within {min}..={max} minutes, got {value}"
        )));
    }
    if value % step != 0 {
        return Err(SchedulerError::InvalidPreferences(format!(
            "{name} must be a multiple of {step} minutes, got {value}"
        )));
    }
    Ok(())
}

/// Check break and session limits.
///
/// Having no day or no slot enabled is valid; it only produces an empty schedule.
pub fn validate(prefs: &Preferences) -> Result<()> {
    validate_limits(prefs.break_time, prefs.max_duration)
}

pub fn validate_limits(break_time: i64, max_duration: i64) -> Result<()> {
    check_stepped("break_time", break_time, BREAK_MIN, BREAK_MAX, BREAK_STEP)?;
    check_stepped(
        "max_duration",
        max_duration,
        SESSION_MIN,
        SESSION_MAX,
        SESSION_STEP,
    )?;
    Ok(())
}

/// True when at least one day and one slot are on.
pub fn has_availability(prefs: &Preferences) -> bool {
    prefs.days.any_enabled() && prefs.time_slots.enabled().next().is_some()
}
