// SPDX-License-Identifier: MIT

//! Authenticated user profile routes.

use axum::{extract::State, routing::get, Extension, Json, Router};
use chrono::{SecondsFormat, Utc};
use std::sync::Arc;

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::User;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/auth/me", get(get_me))
}

/// Get the caller's profile, creating it on first sign-in.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<User>> {
    if let Some(profile) = state.db.get_user(&user.uid).await? {
        return Ok(Json(profile));
    }

    let profile = User {
        uid: user.uid.clone(),
        email: user.email.clone(),
        preferences: Default::default(),
        created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    };
    state.db.upsert_user(&profile).await?;

    tracing::info!(uid = %profile.uid, "Created user profile");

    Ok(Json(profile))
}
