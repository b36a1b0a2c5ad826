// SPDX-License-Identifier: MIT

//! Conversation lifecycle and model-context assembly.
//!
//! Handles the chat workflow:
//! 1. Validate the incoming message
//! 2. Resolve or lazily create the conversation
//! 3. Persist the user turn and refresh the conversation summary
//! 4. Assemble a bounded prompt (persona + recent history + live message)
//! 5. Call the model, persist the reply, refresh the summary again

use chrono::Utc;
use uuid::Uuid;

use crate::db::Database;
use crate::error::{AppError, Result};
use crate::models::{ChatMessage, Conversation, Sender};
use crate::services::assistant::{ApiMessage, AssistantClient};

/// Turns fetched per request; bounds the context window no matter how long
/// the conversation is.
pub const HISTORY_LIMIT: u32 = 10;

/// Reply-length cap passed to the model.
pub const REPLY_MAX_TOKENS: u32 = 300;

/// Conversations returned by the listing endpoint.
pub const CONVERSATION_LIST_LIMIT: u32 = 50;

/// Messages per page when listing a conversation.
pub const MESSAGE_PAGE_LIMIT: u32 = 50;

const TITLE_WORDS: usize = 5;

/// Persona instruction sent verbatim as the first prompt element.
/// Enforcement is entirely the model's job; nothing here is interpreted.
pub const SYSTEM_PROMPT: &str = "\
You are MindMate, a dedicated AI companion for mental health and well-being. \
Your sole purpose is to provide emotional support, guidance on mental wellness, \
and empathetic listening.

STRICT RULES:
1. EXCLUSIVELY discuss topics related to mental health, emotions, stress, \
relationships, self-care, and well-being.
2. If the user asks about coding, math, general trivia, sports, politics, or \
any topic unrelated to mental health, politely decline. Say something like: \
\"I am designed to focus only on your mental well-being and emotional health. \
How are you feeling today?\"
3. Be empathetic, validating, and non-judgmental.
4. Never claim to replace a therapist or professional help.
5. CRISIS PROTOCOL: If the user expresses self-harm, suicide, or severe \
distress, immediately urge them to seek professional help and provide general \
emergency context, but do not provide medical advice.
6. Keep responses concise, warm, and natural.";

/// Result of a successful message exchange.
#[derive(Debug, Clone)]
pub struct ChatExchange {
    pub conversation_id: String,
    pub user_message: ChatMessage,
    pub assistant_message: ChatMessage,
}

/// Chat workflow service.
#[derive(Clone)]
pub struct ChatService {
    db: Database,
    assistant: AssistantClient,
}

impl ChatService {
    pub fn new(db: Database, assistant: AssistantClient) -> Self {
        Self { db, assistant }
    }

    /// Send a user message and obtain the assistant's reply.
    ///
    /// Without a `conversation_id`, a new conversation is created from the
    /// message. If the model call fails, the already-persisted user turn is
    /// kept (a conversation may legitimately end on an unanswered message)
    /// and no assistant turn is written.
    pub async fn send_message(
        &self,
        user_id: &str,
        message: &str,
        conversation_id: Option<&str>,
    ) -> Result<ChatExchange> {
        let message = message.trim();
        if message.is_empty() {
            return Err(AppError::BadRequest("Message cannot be empty".to_string()));
        }

        let conversation = match conversation_id {
            Some(id) => self
                .db
                .get_conversation(user_id, id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Conversation {} not found", id)))?,
            None => {
                let now = Utc::now();
                let conversation = Conversation {
                    id: Uuid::new_v4().to_string(),
                    user_id: user_id.to_string(),
                    title: derive_title(message),
                    last_message: message.to_string(),
                    created_at: now,
                    updated_at: now,
                };
                self.db.create_conversation(&conversation).await?;
                tracing::info!(
                    conversation_id = %conversation.id,
                    title = %conversation.title,
                    "Created conversation"
                );
                conversation
            }
        };

        let user_message = ChatMessage {
            id: Uuid::new_v4().to_string(),
            conversation_id: conversation.id.clone(),
            user_id: user_id.to_string(),
            message: message.to_string(),
            sender: Sender::User,
            created_at: Utc::now(),
        };
        self.db.append_chat_message(&user_message).await?;
        self.db
            .update_conversation_summary(&conversation.id, message, user_message.created_at)
            .await?;

        let history = self
            .db
            .recent_chat_messages(&conversation.id, HISTORY_LIMIT)
            .await?;
        let prompt = build_context(&history, message);

        let reply = self.assistant.complete(&prompt, REPLY_MAX_TOKENS).await?;

        let assistant_message = ChatMessage {
            id: Uuid::new_v4().to_string(),
            conversation_id: conversation.id.clone(),
            user_id: user_id.to_string(),
            message: reply.clone(),
            sender: Sender::Assistant,
            created_at: Utc::now(),
        };
        self.db.append_chat_message(&assistant_message).await?;
        self.db
            .update_conversation_summary(&conversation.id, &reply, assistant_message.created_at)
            .await?;

        Ok(ChatExchange {
            conversation_id: conversation.id,
            user_message,
            assistant_message,
        })
    }

    /// The caller's conversations, most recently updated first.
    pub async fn conversations(&self, user_id: &str) -> Result<Vec<Conversation>> {
        self.db
            .conversations_for_user(user_id, CONVERSATION_LIST_LIMIT)
            .await
    }

    /// A chronological page of one conversation's turns.
    pub async fn messages(
        &self,
        user_id: &str,
        conversation_id: &str,
        page: u32,
        limit: u32,
    ) -> Result<Vec<ChatMessage>> {
        let offset = page.saturating_sub(1).saturating_mul(limit);
        self.db
            .chat_messages(user_id, conversation_id, offset, limit)
            .await
    }
}

/// Conversation title from the first user message: first five words plus an
/// ellipsis marker.
pub fn derive_title(message: &str) -> String {
    let words: Vec<&str> = message.split_whitespace().take(TITLE_WORDS).collect();
    format!("{}...", words.join(" "))
}

/// Assemble the prompt: persona first, then the fetched history in
/// chronological order, then the live user message last.
///
/// `history` arrives most-recent-first from the store. The live message is
/// appended unconditionally so it is present even when the history read
/// raced with the turn write and already (or not yet) contains it.
pub fn build_context(history: &[ChatMessage], message: &str) -> Vec<ApiMessage> {
    let mut prompt = Vec::with_capacity(history.len() + 2);
    prompt.push(ApiMessage::system(SYSTEM_PROMPT));
    for turn in history.iter().rev() {
        prompt.push(ApiMessage {
            role: turn.sender.role(),
            content: turn.message.clone(),
        });
    }
    prompt.push(ApiMessage::user(message));
    prompt
}
