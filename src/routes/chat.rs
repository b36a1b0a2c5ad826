// SPDX-License-Identifier: MIT

//! Chat routes: sending messages, listing conversations and turns.

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::{ChatMessage, Conversation};
use crate::services::chat::MESSAGE_PAGE_LIMIT;
use crate::AppState;

const MAX_PAGE_LIMIT: u32 = 100;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/chat/message", post(send_message))
        .route("/api/chat/conversations", get(list_conversations))
        .route("/api/chat/messages/{conversation_id}", get(list_messages))
}

#[derive(Deserialize)]
struct SendMessageRequest {
    message: String,
    conversation_id: Option<String>,
}

/// Both turns of a completed exchange.
#[derive(Serialize)]
pub struct SendMessageResponse {
    pub conversation_id: String,
    pub user_message: ChatMessage,
    pub assistant_message: ChatMessage,
}

/// Send a message to the assistant, creating a conversation if needed.
async fn send_message(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<SendMessageRequest>,
) -> Result<Json<SendMessageResponse>> {
    let exchange = state
        .chat_service
        .send_message(&user.uid, &payload.message, payload.conversation_id.as_deref())
        .await?;

    Ok(Json(SendMessageResponse {
        conversation_id: exchange.conversation_id,
        user_message: exchange.user_message,
        assistant_message: exchange.assistant_message,
    }))
}

/// The caller's conversations, most recently updated first.
async fn list_conversations(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<Conversation>>> {
    Ok(Json(state.chat_service.conversations(&user.uid).await?))
}

#[derive(Deserialize)]
struct MessagesQuery {
    /// Pagination: page number (1-indexed)
    #[serde(default = "default_page")]
    page: u32,
    /// Pagination: items per page
    #[serde(default = "default_limit")]
    limit: u32,
}

fn default_page() -> u32 {
    1
}
fn default_limit() -> u32 {
    MESSAGE_PAGE_LIMIT
}

/// A chronological page of one conversation's turns.
async fn list_messages(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(conversation_id): Path<String>,
    Query(query): Query<MessagesQuery>,
) -> Result<Json<Vec<ChatMessage>>> {
    let limit = query.limit.clamp(1, MAX_PAGE_LIMIT);
    let page = query.page.max(1);

    let messages = state
        .chat_service
        .messages(&user.uid, &conversation_id, page, limit)
        .await?;

    Ok(Json(messages))
}
