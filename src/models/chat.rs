// SPDX-License-Identifier: MIT

//! Conversation and chat-turn models for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A conversation between a user and the assistant.
///
/// `last_message` mirrors the text of the most recent turn, either sender,
/// and `updated_at` is refreshed every time a turn is appended. Concurrent
/// sends to the same conversation may race on both fields; last write wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    /// Document ID (UUID)
    pub id: String,
    /// Owning user's Firebase UID
    pub user_id: String,
    /// Derived from the first user message (first five words + "...")
    pub title: String,
    /// Text of the most recent turn
    pub last_message: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Who produced a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

impl Sender {
    /// Role string for the model API.
    pub fn role(self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Assistant => "assistant",
        }
    }
}

/// One turn within a conversation. Turns are append-only; they are never
/// edited or deleted once written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Document ID (UUID)
    pub id: String,
    /// Conversation this turn belongs to
    pub conversation_id: String,
    /// Owning user's Firebase UID
    pub user_id: String,
    /// Message text (non-empty)
    pub message: String,
    pub sender: Sender,
    /// Append timestamp, used for ordering
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sender_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Sender::User).unwrap(), "\"user\"");
        assert_eq!(
            serde_json::to_string(&Sender::Assistant).unwrap(),
            "\"assistant\""
        );
    }

    #[test]
    fn sender_role_matches_wire_format() {
        assert_eq!(Sender::User.role(), "user");
        assert_eq!(Sender::Assistant.role(), "assistant");
    }
}
