//! In-process storage backend.
//!
//! Used when no Firebase project is configured or Firestore is unreachable
//! at startup (data is lost on restart), and by the test suite for
//! deterministic runs without an emulator.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::models::{ChatMessage, Conversation, Journal, Mood, User};

/// All collections behind one lock; operations are short and synchronous
/// once the lock is held.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    users: HashMap<String, User>,
    journals: HashMap<String, Journal>,
    moods: HashMap<String, Mood>,
    conversations: HashMap<String, Conversation>,
    chats: HashMap<String, ChatMessage>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ─── Users ───────────────────────────────────────────────────

    pub async fn get_user(&self, uid: &str) -> Option<User> {
        self.inner.read().await.users.get(uid).cloned()
    }

    pub async fn upsert_user(&self, user: &User) {
        self.inner
            .write()
            .await
            .users
            .insert(user.uid.clone(), user.clone());
    }

    // ─── Journals ────────────────────────────────────────────────

    pub async fn journals_for_user(&self, user_id: &str) -> Vec<Journal> {
        let inner = self.inner.read().await;
        let mut journals: Vec<Journal> = inner
            .journals
            .values()
            .filter(|j| j.user_id == user_id)
            .cloned()
            .collect();
        journals.sort_by(|a, b| b.date.cmp(&a.date));
        journals
    }

    pub async fn get_journal(&self, user_id: &str, id: &str) -> Option<Journal> {
        self.inner
            .read()
            .await
            .journals
            .get(id)
            .filter(|j| j.user_id == user_id)
            .cloned()
    }

    pub async fn set_journal(&self, journal: &Journal) {
        self.inner
            .write()
            .await
            .journals
            .insert(journal.id.clone(), journal.clone());
    }

    pub async fn delete_journal(&self, user_id: &str, id: &str) -> bool {
        let mut inner = self.inner.write().await;
        if inner.journals.get(id).is_some_and(|j| j.user_id == user_id) {
            inner.journals.remove(id);
            true
        } else {
            false
        }
    }

    pub async fn journal_dates(&self, user_id: &str) -> Vec<DateTime<Utc>> {
        self.inner
            .read()
            .await
            .journals
            .values()
            .filter(|j| j.user_id == user_id)
            .map(|j| j.date)
            .collect()
    }

    // ─── Moods ───────────────────────────────────────────────────

    pub async fn moods_for_user(&self, user_id: &str) -> Vec<Mood> {
        let inner = self.inner.read().await;
        let mut moods: Vec<Mood> = inner
            .moods
            .values()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect();
        moods.sort_by(|a, b| b.date.cmp(&a.date));
        moods
    }

    pub async fn get_mood(&self, user_id: &str, id: &str) -> Option<Mood> {
        self.inner
            .read()
            .await
            .moods
            .get(id)
            .filter(|m| m.user_id == user_id)
            .cloned()
    }

    pub async fn set_mood(&self, mood: &Mood) {
        self.inner
            .write()
            .await
            .moods
            .insert(mood.id.clone(), mood.clone());
    }

    pub async fn delete_mood(&self, user_id: &str, id: &str) -> bool {
        let mut inner = self.inner.write().await;
        if inner.moods.get(id).is_some_and(|m| m.user_id == user_id) {
            inner.moods.remove(id);
            true
        } else {
            false
        }
    }

    pub async fn mood_dates(&self, user_id: &str) -> Vec<DateTime<Utc>> {
        self.inner
            .read()
            .await
            .moods
            .values()
            .filter(|m| m.user_id == user_id)
            .map(|m| m.date)
            .collect()
    }

    // ─── Conversations ───────────────────────────────────────────

    pub async fn set_conversation(&self, conversation: &Conversation) {
        self.inner
            .write()
            .await
            .conversations
            .insert(conversation.id.clone(), conversation.clone());
    }

    pub async fn get_conversation(&self, user_id: &str, id: &str) -> Option<Conversation> {
        self.inner
            .read()
            .await
            .conversations
            .get(id)
            .filter(|c| c.user_id == user_id)
            .cloned()
    }

    pub async fn conversations_for_user(&self, user_id: &str, limit: u32) -> Vec<Conversation> {
        let inner = self.inner.read().await;
        let mut conversations: Vec<Conversation> = inner
            .conversations
            .values()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        conversations.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        conversations.truncate(limit as usize);
        conversations
    }

    pub async fn update_conversation_summary(
        &self,
        id: &str,
        last_message: &str,
        updated_at: DateTime<Utc>,
    ) {
        let mut inner = self.inner.write().await;
        if let Some(conversation) = inner.conversations.get_mut(id) {
            conversation.last_message = last_message.to_string();
            conversation.updated_at = updated_at;
        }
    }

    // ─── Chat messages ───────────────────────────────────────────

    pub async fn append_chat_message(&self, message: &ChatMessage) {
        self.inner
            .write()
            .await
            .chats
            .insert(message.id.clone(), message.clone());
    }

    /// Most recent turns first.
    pub async fn recent_chat_messages(
        &self,
        conversation_id: &str,
        limit: u32,
    ) -> Vec<ChatMessage> {
        let inner = self.inner.read().await;
        let mut messages: Vec<ChatMessage> = inner
            .chats
            .values()
            .filter(|m| m.conversation_id == conversation_id)
            .cloned()
            .collect();
        messages.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        messages.truncate(limit as usize);
        messages
    }

    /// Chronological page of a conversation's turns.
    pub async fn chat_messages(
        &self,
        user_id: &str,
        conversation_id: &str,
        offset: u32,
        limit: u32,
    ) -> Vec<ChatMessage> {
        let inner = self.inner.read().await;
        let mut messages: Vec<ChatMessage> = inner
            .chats
            .values()
            .filter(|m| m.conversation_id == conversation_id && m.user_id == user_id)
            .cloned()
            .collect();
        messages.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        messages
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect()
    }
}
