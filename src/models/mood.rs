//! Mood entry model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored mood entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mood {
    /// Document ID (UUID)
    pub id: String,
    /// Owning user's Firebase UID
    pub user_id: String,
    /// Mood score, 1 (lowest) to 5 (highest)
    pub score: u8,
    /// Mood label ("calm", "stressed", ...)
    pub mood: String,
    /// Optional free-text note
    pub note: Option<String>,
    /// The day this entry is about; defaults to creation time
    pub date: DateTime<Utc>,
}
