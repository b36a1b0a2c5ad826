//! Application configuration loaded from environment variables.
//!
//! Everything is read once at startup. For local development a `.env`
//! file is honored; only the OpenAI key is strictly required.

use std::env;

/// Default OpenAI model when OPENAI_MODEL is unset.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Firebase project ID. Used both as the Firestore project and as the
    /// expected audience of Firebase ID tokens. When unset, the server runs
    /// in dev mode: in-memory storage and no token verification.
    pub firebase_project_id: Option<String>,
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,

    /// OpenAI API key
    pub openai_api_key: String,
    /// OpenAI chat model
    pub openai_model: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            firebase_project_id: env::var("FIREBASE_PROJECT_ID")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .unwrap_or(5000),
            openai_api_key: env::var("OPENAI_API_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("OPENAI_API_KEY"))?,
            openai_model: env::var("OPENAI_MODEL")
                .unwrap_or_else(|_| DEFAULT_OPENAI_MODEL.to_string()),
        })
    }

    /// Fixed config for tests.
    pub fn test_default() -> Self {
        Self {
            firebase_project_id: None,
            frontend_url: "http://localhost:5173".to_string(),
            port: 5000,
            openai_api_key: "test_api_key".to_string(),
            openai_model: DEFAULT_OPENAI_MODEL.to_string(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        env::set_var("OPENAI_API_KEY", "sk-test");
        env::remove_var("OPENAI_MODEL");
        env::remove_var("PORT");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.openai_api_key, "sk-test");
        assert_eq!(config.openai_model, DEFAULT_OPENAI_MODEL);
        assert_eq!(config.port, 5000);
    }

    #[test]
    fn test_blank_project_id_treated_as_unset() {
        env::set_var("OPENAI_API_KEY", "sk-test");
        env::set_var("FIREBASE_PROJECT_ID", "   ");

        let config = Config::from_env().expect("Config should load");
        assert!(config.firebase_project_id.is_none());

        env::remove_var("FIREBASE_PROJECT_ID");
    }
}
