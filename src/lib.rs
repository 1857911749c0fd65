//! Study session scheduler.
//!
//! Turns pending study tasks and the user's time preferences into a
//! non-overlapping list of calendar sessions.
//!
//! Pipeline:
//! - [`rank`] orders tasks by priority tier, then due date
//! - [`calendar`] builds free windows from enabled days/slots minus existing events
//! - [`packer`] greedily places sessions into those windows
//! - [`preview`] groups the sessions by day
//!
//! [`logic::generate_schedule`] runs all of the above. The `routes_*` modules
//! expose it, together with task/preference/event storage, over HTTP.

use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

pub mod calendar;
pub mod config;
pub mod error;
pub mod logic;
pub mod models;
pub mod packer;
pub mod preferences;
pub mod preview;
pub mod rank;
pub mod routes_events;
pub mod routes_preferences;
pub mod routes_schedule;
pub mod routes_tasks;
pub mod state;
pub mod store;

use state::AppState;

pub fn app(state: Arc<AppState>) -> Router {
    let api = Router::new()
        // schedule
        .route("/schedule/preview", get(routes_schedule::preview_schedule))
        .route("/schedule/commit", post(routes_schedule::commit_schedule))
        // tasks
        .route("/tasks", get(routes_tasks::get_tasks).post(routes_tasks::create_task))
        .route("/tasks/:id", put(routes_tasks::update_task).delete(routes_tasks::delete_task))
        .route("/tasks/:id/toggle", post(routes_tasks::toggle_task))
        .route("/tasks/:id/study", post(routes_tasks::log_study))
        // preferences
        .route(
            "/preferences",
            get(routes_preferences::get_preferences).put(routes_preferences::put_preferences),
        )
        // calendar
        .route("/events", get(routes_events::get_events).post(routes_events::create_event))
        .route("/events/:id", delete(routes_events::delete_event));

    let static_dir = state.config.static_dir.clone();

    Router::new()
        .nest("/api", api)
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
