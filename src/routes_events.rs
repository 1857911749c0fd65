// Existing calendar commitments. The scheduler treats them as busy time.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::DateTime;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::CalendarEvent;
use crate::state::AppState;

// -----------------------------
// GET /api/events
// Returns all calendar events ordered by start
// -----------------------------
pub async fn get_events(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CalendarEvent>>, AppError> {
    let mut events = state.read(|db| Ok(db.events.clone())).await?;
    events.sort_by(|a, b| a.start.cmp(&b.start));
    Ok(Json(events))
}

#[derive(Debug, Deserialize)]
pub struct EventInput {
    pub title: String,
    pub start: String, // RFC3339
    pub end: String,   // RFC3339
    pub task_id: Option<Uuid>,
}

// -----------------------------
// POST /api/events
// Adds a calendar event
// -----------------------------
pub async fn create_event(
    State(state): State<Arc<AppState>>,
    Json(input): Json<EventInput>,
) -> Result<Json<CalendarEvent>, AppError> {
    let start = DateTime::parse_from_rfc3339(&input.start)
        .map_err(|_| AppError::BadRequest("invalid start".to_string()))?;
    let end = DateTime::parse_from_rfc3339(&input.end)
        .map_err(|_| AppError::BadRequest("invalid end".to_string()))?;
    if end <= start {
        return Err(AppError::BadRequest("end must be after start".to_string()));
    }

    let event = CalendarEvent {
        id: Uuid::new_v4(),
        title: input.title,
        start,
        end,
        task_id: input.task_id,
    };

    let created = state
        .update(|db| {
            db.events.push(event.clone());
            Ok(event)
        })
        .await?;

    Ok(Json(created))
}

// -----------------------------
// DELETE /api/events/:id
// -----------------------------
pub async fn delete_event(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    state
        .update(|db| {
            let before = db.events.len();
            db.events.retain(|e| e.id != id);
            if db.events.len() == before {
                return Err(AppError::NotFound("event"));
            }
            Ok(())
        })
        .await?;

    Ok(Json(serde_json::json!({ "ok": true })))
}
