// SPDX-License-Identifier: MIT

//! Activity statistics routes.

use axum::{extract::State, routing::get, Extension, Json, Router};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::compute_streak;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/stats", get(get_stats))
}

/// Streak response.
#[derive(Serialize)]
pub struct StatsResponse {
    pub streak: u32,
    pub total_active_days: u32,
}

/// Current streak over the caller's journal and mood activity.
async fn get_stats(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<StatsResponse>> {
    let (mut dates, mood_dates) = tokio::try_join!(
        state.db.journal_dates(&user.uid),
        state.db.mood_dates(&user.uid),
    )?;
    dates.extend(mood_dates);

    let summary = compute_streak(&dates, Utc::now().date_naive());

    Ok(Json(StatsResponse {
        streak: summary.streak,
        total_active_days: summary.total_active_days,
    }))
}
