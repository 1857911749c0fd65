// --------------------------------------------------
// Handles API endpoints related to task CRUD operations.
//
// Responsibilities:
// - Create / read / update / delete tasks
// - Toggle task status (Todo -> InProgress -> Done -> Todo)
// - Log studied minutes against a task
// -------------------------------------------------

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Priority, Subject, Task, TaskStatus};
use crate::state::{now_fixed_offset, AppState};

#[derive(Debug, Default, Deserialize)]
pub struct TasksQuery {
    #[serde(default)]
    pub all: bool, // include done tasks
}

#[derive(Debug, Serialize)]
pub struct TasksResponse {
    pub now: String,
    pub tasks: Vec<Task>,
}

// -----------------------------
// GET /api/tasks
// Returns pending tasks, or every task with ?all=true
// -----------------------------
pub async fn get_tasks(
    State(state): State<Arc<AppState>>,
    Query(q): Query<TasksQuery>,
) -> Result<Json<TasksResponse>, AppError> {
    let tasks = state
        .read(|db| {
            Ok(db
                .tasks
                .iter()
                .filter(|t| q.all || t.is_pending())
                .cloned()
                .collect())
        })
        .await?;

    Ok(Json(TasksResponse {
        now: now_fixed_offset().to_rfc3339(),
        tasks,
    }))
}

#[derive(Debug, Deserialize)]
pub struct TaskInput {
    pub title: String,
    pub priority: Priority,
    pub due_at: Option<String>, // RFC3339
    pub estimated_min: Option<i64>,
    pub study_min: Option<i64>,
    pub subject: Option<Subject>,
    pub status: Option<TaskStatus>,
    pub notes: Option<String>,
}

// Fields shared by create and update after validation
struct ValidTask {
    title: String,
    due_at: Option<DateTime<FixedOffset>>,
    estimated_min: Option<i64>,
    study_min: i64,
}

fn validate_input(input: &TaskInput) -> Result<ValidTask, AppError> {
    if input.title.trim().is_empty() {
        return Err(AppError::BadRequest("title required".to_string()));
    }
    if input.estimated_min.is_some_and(|m| m < 0) {
        return Err(AppError::BadRequest("estimated_min must be >= 0".to_string()));
    }
    let study_min = input.study_min.unwrap_or(0);
    if study_min < 0 {
        return Err(AppError::BadRequest("study_min must be >= 0".to_string()));
    }

    let due_at = match input.due_at.as_deref() {
        None | Some("") => None,
        Some(raw) => Some(
            DateTime::parse_from_rfc3339(raw)
                .map_err(|_| AppError::BadRequest("invalid due_at".to_string()))?,
        ),
    };

    Ok(ValidTask {
        title: input.title.trim().to_string(),
        due_at,
        estimated_min: input.estimated_min,
        study_min,
    })
}

// -----------------------------
// POST /api/tasks
// Creates a new task
// -----------------------------
pub async fn create_task(
    State(state): State<Arc<AppState>>,
    Json(input): Json<TaskInput>,
) -> Result<Json<Task>, AppError> {
    let valid = validate_input(&input)?;

    let task = Task {
        id: Uuid::new_v4(),
        title: valid.title,
        priority: input.priority,
        due_at: valid.due_at,
        estimated_min: valid.estimated_min,
        study_min: valid.study_min,
        subject: input.subject,
        status: input.status.unwrap_or(TaskStatus::Todo),
        created_at: now_fixed_offset(),
        notes: input.notes,
    };

    let created = state
        .update(|db| {
            db.tasks.push(task.clone());
            Ok(task)
        })
        .await?;

    info!("created task {}", created.id);
    Ok(Json(created))
}

// -----------------------------
// PUT /api/tasks/:id
// Updates an existing task by ID
// ----------------------------
pub async fn update_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(input): Json<TaskInput>,
) -> Result<Json<Task>, AppError> {
    let valid = validate_input(&input)?;

    let updated = state
        .update(|db| {
            let t = db
                .tasks
                .iter_mut()
                .find(|t| t.id == id)
                .ok_or(AppError::NotFound("task"))?;

            t.title = valid.title;
            t.priority = input.priority;
            t.due_at = valid.due_at;
            t.estimated_min = valid.estimated_min;
            t.study_min = valid.study_min;
            t.subject = input.subject;
            if let Some(status) = input.status {
                t.status = status;
            }
            t.notes = input.notes;
            Ok(t.clone())
        })
        .await?;

    Ok(Json(updated))
}

// -----------------------------
// DELETE /api/tasks/:id
// Removes a task permanently
// -----------------------------
pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    state
        .update(|db| {
            let before = db.tasks.len();
            db.tasks.retain(|t| t.id != id);
            if db.tasks.len() == before {
                return Err(AppError::NotFound("task"));
            }
            Ok(())
        })
        .await?;

    Ok(Json(serde_json::json!({ "ok": true })))
}

// -----------------------------
// POST /api/tasks/:id/toggle
// Cycles task status Todo -> InProgress -> Done -> Todo
// -----------------------------
pub async fn toggle_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Task>, AppError> {
    let updated = state
        .update(|db| {
            let t = db
                .tasks
                .iter_mut()
                .find(|t| t.id == id)
                .ok_or(AppError::NotFound("task"))?;

            t.status = match t.status {
                TaskStatus::Todo => TaskStatus::InProgress,
                TaskStatus::InProgress => TaskStatus::Done,
                TaskStatus::Done => TaskStatus::Todo,
            };
            Ok(t.clone())
        })
        .await?;

    Ok(Json(updated))
}

#[derive(Debug, Deserialize)]
pub struct StudyInput {
    pub minutes: i64,
}

// -----------------------------
// POST /api/tasks/:id/study
// Adds studied minutes to a task
// -----------------------------
pub async fn log_study(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(input): Json<StudyInput>,
) -> Result<Json<Task>, AppError> {
    if input.minutes <= 0 {
        return Err(AppError::BadRequest("minutes must be > 0".to_string()));
    }

    let updated = state
        .update(|db| {
            let t = db
                .tasks
                .iter_mut()
                .find(|t| t.id == id)
                .ok_or(AppError::NotFound("task"))?;
            t.study_min = t.study_min.saturating_add(input.minutes);
            Ok(t.clone())
        })
        .await?;

    Ok(Json(updated))
}
