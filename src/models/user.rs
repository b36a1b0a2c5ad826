//! User model for storage and API.

use serde::{Deserialize, Serialize};

/// User profile stored in Firestore.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Firebase UID (also used as document ID)
    pub uid: String,
    /// Email address from the verified ID token
    pub email: Option<String>,
    /// UI preferences
    #[serde(default)]
    pub preferences: Preferences,
    /// When the user first signed in (ISO 8601)
    pub created_at: String,
}

/// Per-user UI preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_language")]
    pub language: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            language: default_language(),
        }
    }
}

fn default_theme() -> String {
    "light".to_string()
}

fn default_language() -> String {
    "en".to_string()
}
