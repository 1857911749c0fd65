/*
Availability calendar.
Turns day/slot preferences into absolute free windows and removes
time that is already committed on the user's calendar.
*/

use chrono::{
    DateTime, Datelike, Days, Duration, DurationRound, FixedOffset, NaiveDate, NaiveTime,
    TimeZone,
};
use tracing::debug;

use crate::error::{Result, SchedulerError};
use crate::models::{AvailabilityWindow, BusyInterval, Preferences};

/// Shortest stretch worth scheduling a session into.
pub const MIN_SESSION_MIN: i64 = 15;

pub const DEFAULT_HORIZON_DAYS: i64 = 14;
pub const MAX_HORIZON_DAYS: i64 = 366;

pub fn check_horizon(horizon_days: i64) -> Result<()> {
    if !(1..=MAX_HORIZON_DAYS).contains(&horizon_days) {
        return Err(SchedulerError::InvalidHorizon(horizon_days));
    }
    Ok(())
}

// Committed study sessions keep a break around them like freshly packed ones.
fn pad_sessions(existing: &[BusyInterval], break_min: i64) -> Vec<BusyInterval> {
    existing
        .iter()
        .map(|b| match b.task_id {
            Some(_) => BusyInterval {
                start: b.start - Duration::minutes(break_min),
                end: b.end + Duration::minutes(break_min),
                task_id: b.task_id,
            },
            None => *b,
        })
        .collect()
}

// Sort and merge overlapping or touching intervals.
// Empty and inverted intervals are dropped.
pub fn merge_intervals(mut busy: Vec<BusyInterval>) -> Vec<BusyInterval> {
    busy.retain(|b| b.end > b.start);
    busy.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.end.cmp(&b.end)));

    let mut merged: Vec<BusyInterval> = Vec::with_capacity(busy.len());
    for b in busy {
        match merged.last_mut() {
            Some(last) if b.start <= last.end => {
                if b.end > last.end {
                    last.end = b.end;
                }
            }
            _ => merged.push(b),
        }
    }
    merged
}

// Interval difference: [start, end) minus every merged busy interval.
// `busy` must be sorted and non-overlapping (see merge_intervals).
pub fn subtract_intervals(
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
    busy: &[BusyInterval],
) -> Vec<(DateTime<FixedOffset>, DateTime<FixedOffset>)> {
    let mut free = Vec::new();
    let mut cursor = start;

    for b in busy {
        if b.end <= cursor {
            continue;
        }
        if b.start >= end {
            break;
        }
        if b.start > cursor {
            free.push((cursor, b.start));
        }
        cursor = cursor.max(b.end);
        if cursor >= end {
            break;
        }
    }

    if cursor < end {
        free.push((cursor, end));
    }
    free
}

// Combine a date and a wall-clock time in the given offset.
fn at(date: NaiveDate, time: NaiveTime, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    offset.from_local_datetime(&date.and_time(time)).single()
}

// Round up to the next whole minute so sessions start on clean boundaries.
fn ceil_to_minute(t: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    match t.duration_trunc(Duration::minutes(1)) {
        Ok(trunc) if trunc == t => t,
        Ok(trunc) => trunc + Duration::minutes(1),
        Err(_) => t,
    }
}

/// Build free windows for `[today, today + horizon_days)`.
///
/// Process:
/// - skip weekdays that are turned off
/// - build absolute bounds for every enabled slot, in `now`'s offset
/// - nothing starts before `now` (today's slots are clipped)
/// - subtract merged existing events, committed study sessions
///   widened by the break time
/// - drop pieces shorter than `MIN_SESSION_MIN`
///
/// The result is chronological.
pub fn compute_windows(
    prefs: &Preferences,
    horizon_days: i64,
    existing: &[BusyInterval],
    now: DateTime<FixedOffset>,
) -> Result<Vec<AvailabilityWindow>> {
    check_horizon(horizon_days)?;

    let offset = *now.offset();
    let earliest = ceil_to_minute(now);
    let today = now.date_naive();
    let busy = merge_intervals(pad_sessions(existing, prefs.break_time));

    let mut windows = Vec::new();
    for i in 0..horizon_days as u64 {
        let Some(date) = today.checked_add_days(Days::new(i)) else {
            break;
        };
        if !prefs.days.is_enabled(date.weekday()) {
            continue;
        }

        for slot in prefs.time_slots.enabled() {
            let (slot_start, slot_end) = slot.bounds();
            let (Some(start), Some(end)) = (at(date, slot_start, offset), at(date, slot_end, offset))
            else {
                continue;
            };

            let start = start.max(earliest);
            if start >= end {
                continue;
            }

            for (s, e) in subtract_intervals(start, end, &busy) {
                if (e - s).num_minutes() >= MIN_SESSION_MIN {
                    windows.push(AvailabilityWindow {
                        day: date,
                        start: s.with_timezone(&offset),
                        end: e.with_timezone(&offset),
                    });
                }
            }
        }
    }

    debug!(
        "computed {} windows over {} days ({} busy intervals)",
        windows.len(),
        horizon_days,
        busy.len()
    );
    Ok(windows)
}
