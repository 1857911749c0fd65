use std::sync::Arc;

use axum::{extract::State, Json};
use tracing::info;

use crate::error::AppError;
use crate::models::Preferences;
use crate::preferences;
use crate::state::AppState;

// -----------------------------
// GET /api/preferences
// Returns the active scheduling preferences (defaults on first use)
// -----------------------------
pub async fn get_preferences(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Preferences>, AppError> {
    let prefs = state.read(|db| Ok(db.preferences)).await?;
    Ok(Json(prefs))
}

// -----------------------------
// PUT /api/preferences
// Replaces preferences; out-of-range values are rejected with 422
// -----------------------------
pub async fn put_preferences(
    State(state): State<Arc<AppState>>,
    Json(prefs): Json<Preferences>,
) -> Result<Json<Preferences>, AppError> {
    preferences::validate(&prefs)?;

    if !preferences::has_availability(&prefs) {
        info!("preferences saved with no enabled day or slot");
    }

    let saved = state
        .update(|db| {
            db.preferences = prefs;
            Ok(db.preferences)
        })
        .await?;

    Ok(Json(saved))
}
