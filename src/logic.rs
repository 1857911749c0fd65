/*
Schedule generation pipeline.
Module was independently written from HTTP / Axum for testing
*/

use std::collections::HashMap;
use std::time::{Duration, Instant};

use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::calendar;
use crate::error::{Result, SchedulerError};
use crate::models::{BusyInterval, Preferences, ScheduleWarning, ScheduledEvent, Task};
use crate::packer;
use crate::preferences;
use crate::preview::{self, DaySchedule};
use crate::rank;

// Everything a run needs, already fetched by the caller
#[derive(Debug, Clone, Copy)]
pub struct ScheduleRequest<'a> {
    pub tasks: &'a [Task],
    pub existing: &'a [BusyInterval],
    pub preferences: &'a Preferences,
    pub horizon_days: i64,
    pub now: DateTime<FixedOffset>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ScheduleOutcome {
    pub events: Vec<ScheduledEvent>,
    pub days: Vec<DaySchedule>,
    pub warnings: Vec<ScheduleWarning>,
    pub windows_considered: usize,
}

// Select tasks that the scheduler should look at.
//
// Rules:
// - Task status must not be Done
pub fn pending_tasks(tasks: &[Task]) -> Vec<Task> {
    tasks.iter().filter(|t| t.is_pending()).cloned().collect()
}

// Minutes of committed sessions per task that have not ended yet.
pub fn booked_minutes(
    existing: &[BusyInterval],
    now: DateTime<FixedOffset>,
) -> HashMap<Uuid, i64> {
    existing
        .iter()
        .filter(|b| b.end > now)
        .fold(HashMap::new(), |mut acc, b| {
            if let Some(task_id) = b.task_id {
                *acc.entry(task_id).or_default() += b.minutes();
            }
            acc
        })
}

// Booked time counts as effort already covered, so it is not packed again.
fn without_booked(tasks: Vec<Task>, booked: &HashMap<Uuid, i64>) -> Vec<Task> {
    tasks
        .into_iter()
        .map(|mut t| {
            if let Some(minutes) = booked.get(&t.id) {
                t.study_min = t.study_min.max(0).saturating_add(*minutes);
            }
            t
        })
        .collect()
}

fn check_budget(started: Instant, budget: Option<Duration>) -> Result<()> {
    match budget {
        Some(limit) if started.elapsed() >= limit => Err(SchedulerError::ComputationTimeout {
            budget_ms: limit.as_millis() as u64,
        }),
        _ => Ok(()),
    }
}

/// Run the whole pipeline for one user.
///
/// Process:
/// - validate preferences and horizon
/// - take committed future sessions off each task's remaining effort
/// - rank pending tasks (undated ones become warnings)
/// - compute free windows
/// - pack sessions
/// - group sessions by day
///
/// Either the full outcome is returned or an error; when `budget` is
/// reached between stages the run fails with `ComputationTimeout`.
pub fn generate_schedule(
    req: ScheduleRequest<'_>,
    budget: Option<Duration>,
) -> Result<ScheduleOutcome> {
    let started = Instant::now();

    preferences::validate(req.preferences)?;
    calendar::check_horizon(req.horizon_days)?;

    let booked = booked_minutes(req.existing, req.now);
    if !booked.is_empty() {
        debug!("{} tasks already have committed sessions", booked.len());
    }
    let pending = without_booked(pending_tasks(req.tasks), &booked);
    let ranking = rank::rank(&pending);
    debug!(
        "ranked {} tasks, {} without due date",
        ranking.ranked.len(),
        ranking.skipped.len()
    );
    check_budget(started, budget)?;

    let windows =
        calendar::compute_windows(req.preferences, req.horizon_days, req.existing, req.now)?;
    check_budget(started, budget)?;

    let packing = packer::pack(
        &ranking.ranked,
        &windows,
        req.preferences.break_time,
        req.preferences.max_duration,
    )?;
    check_budget(started, budget)?;

    let days = preview::project(&packing.events);

    let mut warnings = ranking.skipped;
    warnings.extend(packing.warnings);

    info!(
        "scheduled {} sessions across {} days, {} warnings",
        packing.events.len(),
        days.len(),
        warnings.len()
    );

    Ok(ScheduleOutcome {
        events: packing.events,
        days,
        warnings,
        windows_considered: windows.len(),
    })
}
