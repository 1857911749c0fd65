use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::AppError;
use crate::logic::{self, ScheduleOutcome, ScheduleRequest};
use crate::models::{BusyInterval, CalendarEvent, Db, Preferences};
use crate::state::{now_fixed_offset, AppState};

#[derive(Debug, Default, Deserialize)]
pub struct ScheduleQuery {
    pub horizon_days: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ScheduleResponse {
    pub now: String,
    pub horizon_days: i64,
    pub preferences: Preferences,
    #[serde(flatten)]
    pub outcome: ScheduleOutcome,
}

#[derive(Debug, Serialize)]
pub struct CommitResponse {
    pub committed: usize,
    #[serde(flatten)]
    pub schedule: ScheduleResponse,
}

// Range is checked by the calendar
fn horizon(state: &AppState, q: &ScheduleQuery) -> i64 {
    q.horizon_days.unwrap_or(state.config.horizon_days)
}

// Run the pipeline over one snapshot of the db.
// Stored events keep their task link so committed sessions count as done effort.
fn run(
    state: &AppState,
    db: &Db,
    horizon_days: i64,
    now: DateTime<FixedOffset>,
) -> Result<ScheduleResponse, AppError> {
    let busy: Vec<BusyInterval> = db.events.iter().map(CalendarEvent::busy).collect();

    let outcome = logic::generate_schedule(
        ScheduleRequest {
            tasks: &db.tasks,
            existing: &busy,
            preferences: &db.preferences,
            horizon_days,
            now,
        },
        state.config.budget(),
    )?;

    Ok(ScheduleResponse {
        now: now.to_rfc3339(),
        horizon_days,
        preferences: db.preferences,
        outcome,
    })
}

// -----------------------------
// GET /api/schedule/preview
// Generates sessions without saving them
// -----------------------------
pub async fn preview_schedule(
    State(state): State<Arc<AppState>>,
    Query(q): Query<ScheduleQuery>,
) -> Result<Json<ScheduleResponse>, AppError> {
    let horizon_days = horizon(&state, &q);
    let now = now_fixed_offset();

    let resp = state.read(|db| run(&state, db, horizon_days, now)).await?;
    Ok(Json(resp))
}

// -----------------------------
// POST /api/schedule/commit
// Generates sessions and stores them as calendar events
// -----------------------------
pub async fn commit_schedule(
    State(state): State<Arc<AppState>>,
    Query(q): Query<ScheduleQuery>,
) -> Result<Json<CommitResponse>, AppError> {
    let horizon_days = horizon(&state, &q);
    let now = now_fixed_offset();

    let resp = state
        .update(|db| {
            let schedule = run(&state, db, horizon_days, now)?;
            db.events
                .extend(schedule.outcome.events.iter().map(|e| CalendarEvent {
                    id: e.id,
                    title: e.title.clone(),
                    start: e.start,
                    end: e.end,
                    task_id: Some(e.task_id),
                }));
            Ok(CommitResponse {
                committed: schedule.outcome.events.len(),
                schedule,
            })
        })
        .await?;

    info!("committed {} study sessions", resp.committed);
    Ok(Json(resp))
}
