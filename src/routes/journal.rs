// SPDX-License-Identifier: MIT

//! Journal entry routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::Journal;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/journal", get(list_journals).post(create_journal))
        .route("/api/journal/{id}", put(update_journal).delete(delete_journal))
}

/// Map field validation failures to a 400 with the first message.
pub(crate) fn check<T: Validate>(payload: &T) -> Result<()> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))
}

#[derive(Deserialize, Validate)]
struct CreateJournalRequest {
    #[validate(length(min = 1, message = "Journal entry must have a title"))]
    title: String,
    #[validate(length(min = 1, message = "Journal entry must have content"))]
    content: String,
    emotion: Option<String>,
    /// Defaults to now when omitted
    date: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct UpdateJournalRequest {
    title: Option<String>,
    content: Option<String>,
    emotion: Option<String>,
    date: Option<DateTime<Utc>>,
}

/// All of the caller's journal entries, newest first.
async fn list_journals(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<Journal>>> {
    Ok(Json(state.db.journals_for_user(&user.uid).await?))
}

async fn create_journal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateJournalRequest>,
) -> Result<(StatusCode, Json<Journal>)> {
    check(&payload)?;

    let now = Utc::now();
    let journal = Journal {
        id: Uuid::new_v4().to_string(),
        user_id: user.uid.clone(),
        title: payload.title,
        content: payload.content,
        emotion: payload.emotion,
        date: payload.date.unwrap_or(now),
        created_at: now,
    };
    state.db.set_journal(&journal).await?;

    Ok((StatusCode::CREATED, Json(journal)))
}

async fn update_journal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateJournalRequest>,
) -> Result<Json<Journal>> {
    let mut journal = state
        .db
        .get_journal(&user.uid, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Journal entry not found".to_string()))?;

    if let Some(title) = payload.title {
        journal.title = title;
    }
    if let Some(content) = payload.content {
        journal.content = content;
    }
    if let Some(emotion) = payload.emotion {
        journal.emotion = Some(emotion);
    }
    if let Some(date) = payload.date {
        journal.date = date;
    }

    state.db.set_journal(&journal).await?;

    Ok(Json(journal))
}

async fn delete_journal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    if !state.db.delete_journal(&user.uid, &id).await? {
        return Err(AppError::NotFound("Journal entry not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}
