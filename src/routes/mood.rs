// SPDX-License-Identifier: MIT

//! Mood entry routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::Mood;
use crate::routes::journal::check;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/moods", get(list_moods).post(create_mood))
        .route(
            "/api/moods/{id}",
            get(get_mood).put(update_mood).delete(delete_mood),
        )
}

#[derive(Deserialize, Validate)]
struct CreateMoodRequest {
    #[validate(range(min = 1, max = 5, message = "Mood score must be between 1 and 5"))]
    score: u8,
    #[validate(length(min = 1, message = "Mood entry must have a mood description"))]
    mood: String,
    note: Option<String>,
    /// Defaults to now when omitted
    date: Option<DateTime<Utc>>,
}

#[derive(Deserialize, Validate)]
struct UpdateMoodRequest {
    #[validate(range(min = 1, max = 5, message = "Mood score must be between 1 and 5"))]
    score: Option<u8>,
    mood: Option<String>,
    note: Option<String>,
    date: Option<DateTime<Utc>>,
}

/// All of the caller's mood entries, newest first.
async fn list_moods(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<Mood>>> {
    Ok(Json(state.db.moods_for_user(&user.uid).await?))
}

async fn create_mood(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateMoodRequest>,
) -> Result<(StatusCode, Json<Mood>)> {
    check(&payload)?;

    let mood = Mood {
        id: Uuid::new_v4().to_string(),
        user_id: user.uid.clone(),
        score: payload.score,
        mood: payload.mood,
        note: payload.note,
        date: payload.date.unwrap_or_else(Utc::now),
    };
    state.db.set_mood(&mood).await?;

    Ok((StatusCode::CREATED, Json(mood)))
}

async fn get_mood(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Mood>> {
    let mood = state
        .db
        .get_mood(&user.uid, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Mood entry not found".to_string()))?;
    Ok(Json(mood))
}

async fn update_mood(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateMoodRequest>,
) -> Result<Json<Mood>> {
    check(&payload)?;

    let mut mood = state
        .db
        .get_mood(&user.uid, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Mood entry not found".to_string()))?;

    if let Some(score) = payload.score {
        mood.score = score;
    }
    if let Some(label) = payload.mood {
        mood.mood = label;
    }
    if let Some(note) = payload.note {
        mood.note = Some(note);
    }
    if let Some(date) = payload.date {
        mood.date = date;
    }

    state.db.set_mood(&mood).await?;

    Ok(Json(mood))
}

async fn delete_mood(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    if !state.db.delete_mood(&user.uid, &id).await? {
        return Err(AppError::NotFound("Mood entry not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}
