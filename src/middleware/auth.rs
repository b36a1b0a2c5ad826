// SPDX-License-Identifier: MIT

//! Firebase bearer-token authentication middleware.

use crate::error::AppError;
use crate::services::firebase_auth::AuthError;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Authenticated user extracted from a verified ID token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub uid: String,
    pub email: Option<String>,
}

/// Middleware that requires a valid Firebase ID token.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request.headers().get(header::AUTHORIZATION);

    let verified = state
        .auth_verifier
        .verify_id_token(auth_header)
        .await
        .map_err(|e| match e {
            AuthError::InvalidToken(msg) => {
                tracing::debug!(error = %msg, "Rejected ID token");
                AppError::InvalidToken
            }
            AuthError::Transient(msg) => {
                AppError::Internal(anyhow::anyhow!("token verification unavailable: {msg}"))
            }
        })?;

    let auth_user = AuthUser {
        uid: verified.uid,
        email: verified.email,
    };
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}
