//! Journal entry model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored journal entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Journal {
    /// Document ID (UUID)
    pub id: String,
    /// Owning user's Firebase UID
    pub user_id: String,
    /// Entry title
    pub title: String,
    /// Entry body
    pub content: String,
    /// Optional emotion label ("grateful", "anxious", ...)
    pub emotion: Option<String>,
    /// The day this entry is about; defaults to creation time
    pub date: DateTime<Utc>,
    /// When the entry was created
    pub created_at: DateTime<Utc>,
}
