// Handlers driven directly against a temporary JSON store.

use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{Duration, Local};
use tempfile::TempDir;

use study_scheduler::config::Config;
use study_scheduler::error::{AppError, SchedulerError};
use study_scheduler::models::{Preferences, Priority, TaskStatus};
use study_scheduler::routes_events::{self, EventInput};
use study_scheduler::routes_preferences;
use study_scheduler::routes_schedule::{self, ScheduleQuery};
use study_scheduler::routes_tasks::{self, StudyInput, TaskInput, TasksQuery};
use study_scheduler::state::AppState;

fn test_state(dir: &TempDir) -> Arc<AppState> {
    AppState::new(Config {
        addr: SocketAddr::from(([127, 0, 0, 1], 0)),
        db_path: dir.path().join("db.json"),
        static_dir: PathBuf::from("static"),
        horizon_days: 14,
        budget_ms: 0,
    })
}

fn task_input(title: &str, days_ahead: i64, estimated: i64) -> TaskInput {
    TaskInput {
        title: title.to_string(),
        priority: Priority::High,
        due_at: Some((Local::now() + Duration::days(days_ahead)).to_rfc3339()),
        estimated_min: Some(estimated),
        study_min: None,
        subject: None,
        status: None,
        notes: None,
    }
}

#[tokio::test]
async fn preferences_default_then_update() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir);

    let Json(prefs) = routes_preferences::get_preferences(State(state.clone()))
        .await
        .unwrap();
    assert_eq!(prefs, Preferences::default());

    let updated = Preferences {
        break_time: 30,
        max_duration: 90,
        ..Preferences::default()
    };
    routes_preferences::put_preferences(State(state.clone()), Json(updated))
        .await
        .unwrap();

    let Json(prefs) = routes_preferences::get_preferences(State(state)).await.unwrap();
    assert_eq!(prefs.break_time, 30);
    assert_eq!(prefs.max_duration, 90);
}

#[tokio::test]
async fn invalid_preferences_are_not_saved() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir);

    let bad = Preferences {
        break_time: 3,
        ..Preferences::default()
    };
    let err = routes_preferences::put_preferences(State(state.clone()), Json(bad))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Scheduler(SchedulerError::InvalidPreferences(_))
    ));

    let Json(prefs) = routes_preferences::get_preferences(State(state)).await.unwrap();
    assert_eq!(prefs.break_time, Preferences::default().break_time);
}

#[tokio::test]
async fn task_lifecycle() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir);

    let Json(task) = routes_tasks::create_task(State(state.clone()), Json(task_input("Essay", 5, 60)))
        .await
        .unwrap();
    assert_eq!(task.status, TaskStatus::Todo);

    let Json(task) = routes_tasks::log_study(
        State(state.clone()),
        Path(task.id),
        Json(StudyInput { minutes: 20 }),
    )
    .await
    .unwrap();
    assert_eq!(task.study_min, 20);
    assert_eq!(task.remaining_min(), 40);

    for expected in [TaskStatus::InProgress, TaskStatus::Done] {
        let Json(t) = routes_tasks::toggle_task(State(state.clone()), Path(task.id))
            .await
            .unwrap();
        assert_eq!(t.status, expected);
    }

    // done tasks are hidden unless asked for
    let Json(pending) = routes_tasks::get_tasks(State(state.clone()), Query(TasksQuery::default()))
        .await
        .unwrap();
    assert!(pending.tasks.is_empty());
    let Json(all) = routes_tasks::get_tasks(State(state.clone()), Query(TasksQuery { all: true }))
        .await
        .unwrap();
    assert_eq!(all.tasks.len(), 1);

    routes_tasks::delete_task(State(state.clone()), Path(task.id))
        .await
        .unwrap();
    let err = routes_tasks::delete_task(State(state), Path(task.id))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound("task")));
}

#[tokio::test]
async fn task_validation() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir);

    let mut input = task_input("  ", 3, 60);
    let err = routes_tasks::create_task(State(state.clone()), Json(input))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    input = task_input("Lab", 3, 60);
    input.due_at = Some("next tuesday".to_string());
    let err = routes_tasks::create_task(State(state), Json(input))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
}

#[tokio::test]
async fn preview_then_commit_blocks_the_time() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir);

    let Json(task) = routes_tasks::create_task(State(state.clone()), Json(task_input("Exam", 10, 60)))
        .await
        .unwrap();

    let Json(preview) =
        routes_schedule::preview_schedule(State(state.clone()), Query(ScheduleQuery::default()))
            .await
            .unwrap();
    assert_eq!(preview.horizon_days, 14);
    assert_eq!(preview.outcome.events.len(), 1);
    assert_eq!(preview.outcome.events[0].task_id, task.id);
    assert_eq!(preview.outcome.events[0].duration_min(), 60);

    // preview does not persist anything
    let Json(events) = routes_events::get_events(State(state.clone())).await.unwrap();
    assert!(events.is_empty());

    let Json(commit) =
        routes_schedule::commit_schedule(State(state.clone()), Query(ScheduleQuery::default()))
            .await
            .unwrap();
    assert_eq!(commit.committed, 1);

    let Json(events) = routes_events::get_events(State(state.clone())).await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].task_id, Some(task.id));

    // the committed session is busy time for the next run
    let Json(again) =
        routes_schedule::preview_schedule(State(state), Query(ScheduleQuery::default()))
            .await
            .unwrap();
    for e in &again.outcome.events {
        assert!(e.end <= events[0].start || e.start >= events[0].end);
    }
}

#[tokio::test]
async fn schedule_rejects_bad_horizon() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir);

    let err = routes_schedule::preview_schedule(
        State(state.clone()),
        Query(ScheduleQuery {
            horizon_days: Some(0),
        }),
    )
    .await
    .unwrap_err();
    assert!(matches!(
        err,
        AppError::Scheduler(SchedulerError::InvalidHorizon(0))
    ));

    let err = routes_schedule::preview_schedule(
        State(state),
        Query(ScheduleQuery {
            horizon_days: Some(10_000),
        }),
    )
    .await
    .unwrap_err();
    assert!(matches!(
        err,
        AppError::Scheduler(SchedulerError::InvalidHorizon(10_000))
    ));
}

#[tokio::test]
async fn committing_twice_does_not_double_book() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir);

    routes_tasks::create_task(State(state.clone()), Json(task_input("Essay", 10, 60)))
        .await
        .unwrap();

    let mut committed = Vec::new();
    for _ in 0..3 {
        let Json(commit) =
            routes_schedule::commit_schedule(State(state.clone()), Query(ScheduleQuery::default()))
                .await
                .unwrap();
        committed.push(commit.committed);
    }
    assert_eq!(committed, vec![1, 0, 0]);

    let Json(events) = routes_events::get_events(State(state.clone())).await.unwrap();
    let total: i64 = events.iter().map(|e| (e.end - e.start).num_minutes()).sum();
    assert_eq!(total, 60);

    // a new task lands at least one break away from the stored session
    routes_tasks::create_task(State(state.clone()), Json(task_input("Slides", 10, 60)))
        .await
        .unwrap();
    let Json(commit) =
        routes_schedule::commit_schedule(State(state.clone()), Query(ScheduleQuery::default()))
            .await
            .unwrap();
    assert_eq!(commit.committed, 1);

    let Json(events) = routes_events::get_events(State(state)).await.unwrap();
    assert_eq!(events.len(), 2);
    let break_time = Duration::minutes(Preferences::default().break_time);
    assert!(events[1].start - events[0].end >= break_time);
}

#[tokio::test]
async fn events_validate_range() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir);

    let err = routes_events::create_event(
        State(state.clone()),
        Json(EventInput {
            title: "Backwards".to_string(),
            start: "2026-10-19T10:00:00+00:00".to_string(),
            end: "2026-10-19T09:00:00+00:00".to_string(),
            task_id: None,
        }),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let Json(created) = routes_events::create_event(
        State(state.clone()),
        Json(EventInput {
            title: "Lecture".to_string(),
            start: "2026-10-19T09:00:00+00:00".to_string(),
            end: "2026-10-19T10:30:00+00:00".to_string(),
            task_id: None,
        }),
    )
    .await
    .unwrap();

    routes_events::delete_event(State(state.clone()), Path(created.id))
        .await
        .unwrap();
    let Json(events) = routes_events::get_events(State(state)).await.unwrap();
    assert!(events.is_empty());
}
