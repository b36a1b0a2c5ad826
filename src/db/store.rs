// SPDX-License-Identifier: MIT

//! Storage handle with typed operations over users, journal entries,
//! mood entries, conversations, and chat turns.
//!
//! Two backends share one interface: Firestore for deployments, and an
//! in-process store used as a dev/test fallback (mirroring the original
//! service's in-memory database fallback when no real database is
//! reachable).

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::{collections, memory::MemoryStore};
use crate::error::AppError;
use crate::models::{ChatMessage, Conversation, Journal, Mood, User};

#[derive(Clone)]
enum Backend {
    Firestore(firestore::FirestoreDb),
    Memory(Arc<MemoryStore>),
}

/// Database handle shared across request handlers and services.
#[derive(Clone)]
pub struct Database {
    backend: Backend,
}

/// Partial write for refreshing a conversation's summary fields.
#[derive(Serialize, Deserialize)]
struct ConversationSummary {
    last_message: String,
    updated_at: DateTime<Utc>,
}

impl Database {
    /// Connect to Firestore.
    ///
    /// For local development with an emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn connect(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated
        // connection to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::connect_emulator(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            backend: Backend::Firestore(client),
        })
    }

    /// Connect to the Firestore emulator with a dummy token source.
    async fn connect_emulator(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            backend: Backend::Firestore(client),
        })
    }

    /// Create an in-process store. Data is lost when the server stops.
    pub fn in_memory() -> Self {
        Self {
            backend: Backend::Memory(Arc::new(MemoryStore::new())),
        }
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user by Firebase UID.
    pub async fn get_user(&self, uid: &str) -> Result<Option<User>, AppError> {
        match &self.backend {
            Backend::Firestore(client) => client
                .fluent()
                .select()
                .by_id_in(collections::USERS)
                .obj()
                .one(uid)
                .await
                .map_err(|e| AppError::Database(e.to_string())),
            Backend::Memory(store) => Ok(store.get_user(uid).await),
        }
    }

    /// Create or update a user profile.
    pub async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        match &self.backend {
            Backend::Firestore(client) => {
                let _: () = client
                    .fluent()
                    .update()
                    .in_col(collections::USERS)
                    .document_id(&user.uid)
                    .object(user)
                    .execute()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
                Ok(())
            }
            Backend::Memory(store) => {
                store.upsert_user(user).await;
                Ok(())
            }
        }
    }

    // ─── Journal Operations ──────────────────────────────────────

    /// All journal entries for a user, newest first.
    pub async fn journals_for_user(&self, user_id: &str) -> Result<Vec<Journal>, AppError> {
        match &self.backend {
            Backend::Firestore(client) => {
                let user_id = user_id.to_string();
                client
                    .fluent()
                    .select()
                    .from(collections::JOURNALS)
                    .filter(move |q| q.field("user_id").eq(user_id.clone()))
                    .order_by([("date", firestore::FirestoreQueryDirection::Descending)])
                    .obj()
                    .query()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))
            }
            Backend::Memory(store) => Ok(store.journals_for_user(user_id).await),
        }
    }

    /// Get one journal entry, scoped to its owner.
    pub async fn get_journal(&self, user_id: &str, id: &str) -> Result<Option<Journal>, AppError> {
        match &self.backend {
            Backend::Firestore(client) => {
                let journal: Option<Journal> = client
                    .fluent()
                    .select()
                    .by_id_in(collections::JOURNALS)
                    .obj()
                    .one(id)
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
                Ok(journal.filter(|j| j.user_id == user_id))
            }
            Backend::Memory(store) => Ok(store.get_journal(user_id, id).await),
        }
    }

    /// Create or update a journal entry.
    pub async fn set_journal(&self, journal: &Journal) -> Result<(), AppError> {
        match &self.backend {
            Backend::Firestore(client) => {
                let _: () = client
                    .fluent()
                    .update()
                    .in_col(collections::JOURNALS)
                    .document_id(&journal.id)
                    .object(journal)
                    .execute()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
                Ok(())
            }
            Backend::Memory(store) => {
                store.set_journal(journal).await;
                Ok(())
            }
        }
    }

    /// Delete a journal entry. Returns false when the entry does not exist
    /// or belongs to someone else.
    pub async fn delete_journal(&self, user_id: &str, id: &str) -> Result<bool, AppError> {
        match &self.backend {
            Backend::Firestore(client) => {
                if self.get_journal(user_id, id).await?.is_none() {
                    return Ok(false);
                }
                client
                    .fluent()
                    .delete()
                    .from(collections::JOURNALS)
                    .document_id(id)
                    .execute()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
                Ok(true)
            }
            Backend::Memory(store) => Ok(store.delete_journal(user_id, id).await),
        }
    }

    /// Entry timestamps for the streak calculation.
    pub async fn journal_dates(&self, user_id: &str) -> Result<Vec<DateTime<Utc>>, AppError> {
        match &self.backend {
            Backend::Firestore(client) => {
                let user_id = user_id.to_string();
                let journals: Vec<Journal> = client
                    .fluent()
                    .select()
                    .from(collections::JOURNALS)
                    .filter(move |q| q.field("user_id").eq(user_id.clone()))
                    .obj()
                    .query()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
                Ok(journals.into_iter().map(|j| j.date).collect())
            }
            Backend::Memory(store) => Ok(store.journal_dates(user_id).await),
        }
    }

    // ─── Mood Operations ─────────────────────────────────────────

    /// All mood entries for a user, newest first.
    pub async fn moods_for_user(&self, user_id: &str) -> Result<Vec<Mood>, AppError> {
        match &self.backend {
            Backend::Firestore(client) => {
                let user_id = user_id.to_string();
                client
                    .fluent()
                    .select()
                    .from(collections::MOODS)
                    .filter(move |q| q.field("user_id").eq(user_id.clone()))
                    .order_by([("date", firestore::FirestoreQueryDirection::Descending)])
                    .obj()
                    .query()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))
            }
            Backend::Memory(store) => Ok(store.moods_for_user(user_id).await),
        }
    }

    /// Get one mood entry, scoped to its owner.
    pub async fn get_mood(&self, user_id: &str, id: &str) -> Result<Option<Mood>, AppError> {
        match &self.backend {
            Backend::Firestore(client) => {
                let mood: Option<Mood> = client
                    .fluent()
                    .select()
                    .by_id_in(collections::MOODS)
                    .obj()
                    .one(id)
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
                Ok(mood.filter(|m| m.user_id == user_id))
            }
            Backend::Memory(store) => Ok(store.get_mood(user_id, id).await),
        }
    }

    /// Create or update a mood entry.
    pub async fn set_mood(&self, mood: &Mood) -> Result<(), AppError> {
        match &self.backend {
            Backend::Firestore(client) => {
                let _: () = client
                    .fluent()
                    .update()
                    .in_col(collections::MOODS)
                    .document_id(&mood.id)
                    .object(mood)
                    .execute()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
                Ok(())
            }
            Backend::Memory(store) => {
                store.set_mood(mood).await;
                Ok(())
            }
        }
    }

    /// Delete a mood entry. Returns false when the entry does not exist or
    /// belongs to someone else.
    pub async fn delete_mood(&self, user_id: &str, id: &str) -> Result<bool, AppError> {
        match &self.backend {
            Backend::Firestore(client) => {
                if self.get_mood(user_id, id).await?.is_none() {
                    return Ok(false);
                }
                client
                    .fluent()
                    .delete()
                    .from(collections::MOODS)
                    .document_id(id)
                    .execute()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
                Ok(true)
            }
            Backend::Memory(store) => Ok(store.delete_mood(user_id, id).await),
        }
    }

    /// Entry timestamps for the streak calculation.
    pub async fn mood_dates(&self, user_id: &str) -> Result<Vec<DateTime<Utc>>, AppError> {
        match &self.backend {
            Backend::Firestore(client) => {
                let user_id = user_id.to_string();
                let moods: Vec<Mood> = client
                    .fluent()
                    .select()
                    .from(collections::MOODS)
                    .filter(move |q| q.field("user_id").eq(user_id.clone()))
                    .obj()
                    .query()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
                Ok(moods.into_iter().map(|m| m.date).collect())
            }
            Backend::Memory(store) => Ok(store.mood_dates(user_id).await),
        }
    }

    // ─── Conversation Operations ─────────────────────────────────

    /// Store a new conversation.
    pub async fn create_conversation(&self, conversation: &Conversation) -> Result<(), AppError> {
        match &self.backend {
            Backend::Firestore(client) => {
                let _: () = client
                    .fluent()
                    .update()
                    .in_col(collections::CONVERSATIONS)
                    .document_id(&conversation.id)
                    .object(conversation)
                    .execute()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
                Ok(())
            }
            Backend::Memory(store) => {
                store.set_conversation(conversation).await;
                Ok(())
            }
        }
    }

    /// Get one conversation, scoped to its owner.
    pub async fn get_conversation(
        &self,
        user_id: &str,
        id: &str,
    ) -> Result<Option<Conversation>, AppError> {
        match &self.backend {
            Backend::Firestore(client) => {
                let conversation: Option<Conversation> = client
                    .fluent()
                    .select()
                    .by_id_in(collections::CONVERSATIONS)
                    .obj()
                    .one(id)
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
                Ok(conversation.filter(|c| c.user_id == user_id))
            }
            Backend::Memory(store) => Ok(store.get_conversation(user_id, id).await),
        }
    }

    /// A user's conversations, most recently updated first.
    pub async fn conversations_for_user(
        &self,
        user_id: &str,
        limit: u32,
    ) -> Result<Vec<Conversation>, AppError> {
        match &self.backend {
            Backend::Firestore(client) => {
                let user_id = user_id.to_string();
                client
                    .fluent()
                    .select()
                    .from(collections::CONVERSATIONS)
                    .filter(move |q| q.field("user_id").eq(user_id.clone()))
                    .order_by([("updated_at", firestore::FirestoreQueryDirection::Descending)])
                    .limit(limit)
                    .obj()
                    .query()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))
            }
            Backend::Memory(store) => Ok(store.conversations_for_user(user_id, limit).await),
        }
    }

    /// Refresh a conversation's `last_message`/`updated_at` after a turn is
    /// appended. Concurrent sends race here; last write wins.
    pub async fn update_conversation_summary(
        &self,
        id: &str,
        last_message: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        match &self.backend {
            Backend::Firestore(client) => {
                let summary = ConversationSummary {
                    last_message: last_message.to_string(),
                    updated_at,
                };
                let _: () = client
                    .fluent()
                    .update()
                    .fields(["last_message", "updated_at"])
                    .in_col(collections::CONVERSATIONS)
                    .document_id(id)
                    .object(&summary)
                    .execute()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
                Ok(())
            }
            Backend::Memory(store) => {
                store
                    .update_conversation_summary(id, last_message, updated_at)
                    .await;
                Ok(())
            }
        }
    }

    // ─── Chat Turn Operations ────────────────────────────────────

    /// Append one turn. Turns are never updated in place.
    pub async fn append_chat_message(&self, message: &ChatMessage) -> Result<(), AppError> {
        match &self.backend {
            Backend::Firestore(client) => {
                let _: () = client
                    .fluent()
                    .update()
                    .in_col(collections::CHATS)
                    .document_id(&message.id)
                    .object(message)
                    .execute()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
                Ok(())
            }
            Backend::Memory(store) => {
                store.append_chat_message(message).await;
                Ok(())
            }
        }
    }

    /// The most recent turns of a conversation, newest first.
    pub async fn recent_chat_messages(
        &self,
        conversation_id: &str,
        limit: u32,
    ) -> Result<Vec<ChatMessage>, AppError> {
        match &self.backend {
            Backend::Firestore(client) => {
                let conversation_id = conversation_id.to_string();
                client
                    .fluent()
                    .select()
                    .from(collections::CHATS)
                    .filter(move |q| q.field("conversation_id").eq(conversation_id.clone()))
                    .order_by([("created_at", firestore::FirestoreQueryDirection::Descending)])
                    .limit(limit)
                    .obj()
                    .query()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))
            }
            Backend::Memory(store) => Ok(store.recent_chat_messages(conversation_id, limit).await),
        }
    }

    /// A chronological page of a conversation's turns.
    pub async fn chat_messages(
        &self,
        user_id: &str,
        conversation_id: &str,
        offset: u32,
        limit: u32,
    ) -> Result<Vec<ChatMessage>, AppError> {
        match &self.backend {
            Backend::Firestore(client) => {
                let user_id = user_id.to_string();
                let conversation_id = conversation_id.to_string();
                client
                    .fluent()
                    .select()
                    .from(collections::CHATS)
                    .filter(move |q| {
                        q.for_all([
                            q.field("user_id").eq(user_id.clone()),
                            q.field("conversation_id").eq(conversation_id.clone()),
                        ])
                    })
                    .order_by([("created_at", firestore::FirestoreQueryDirection::Ascending)])
                    .offset(offset)
                    .limit(limit)
                    .obj()
                    .query()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))
            }
            Backend::Memory(store) => {
                Ok(store
                    .chat_messages(user_id, conversation_id, offset, limit)
                    .await)
            }
        }
    }
}
