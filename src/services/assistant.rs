// SPDX-License-Identifier: MIT

//! OpenAI chat-completions client.
//!
//! Handles:
//! - Prompt submission with a reply-length cap
//! - Mapping upstream HTTP failures to actionable error categories
//! - A scripted mock mode for tests (no network)

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Categorized failures from the model API.
///
/// The messages double as remediation hints surfaced to the client; the
/// HTTP status mapping lives in [`crate::error::AppError`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum AssistantError {
    #[error("AI service quota exceeded. Please check your billing or use demo mode.")]
    QuotaExceeded,

    #[error("Invalid or missing OpenAI API key. Please check backend configuration.")]
    InvalidApiKey,

    #[error("OpenAI API access forbidden. Please verify your API key and permissions.")]
    Forbidden,

    #[error("OpenAI service temporarily unavailable. Please try again in a moment.")]
    Unavailable,

    #[error("OpenAI API error: {0}")]
    Api(String),
}

/// One prompt element in model wire order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiMessage {
    pub role: &'static str,
    pub content: String,
}

impl ApiMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system",
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user",
            content: content.into(),
        }
    }
}

#[derive(Clone)]
enum MockBehavior {
    Reply(String),
    Fail(AssistantError),
}

/// OpenAI API client.
#[derive(Clone)]
pub struct AssistantClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    mock: Option<MockBehavior>,
    /// Prompts seen by the mock, for test assertions.
    captured: Arc<Mutex<Vec<Vec<ApiMessage>>>>,
}

impl AssistantClient {
    /// Create a client for the live OpenAI API.
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: OPENAI_BASE_URL.to_string(),
            api_key,
            model,
            mock: None,
            captured: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock client that answers every prompt with `reply`.
    ///
    /// Intended for tests; no network calls are made.
    pub fn new_mock(reply: impl Into<String>) -> Self {
        Self::with_mock(MockBehavior::Reply(reply.into()))
    }

    /// Create a mock client that fails every prompt with `error`.
    pub fn new_mock_failure(error: AssistantError) -> Self {
        Self::with_mock(MockBehavior::Fail(error))
    }

    fn with_mock(mock: MockBehavior) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: OPENAI_BASE_URL.to_string(),
            api_key: String::new(),
            model: "mock".to_string(),
            mock: Some(mock),
            captured: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Prompts submitted to a mock client, oldest first.
    pub fn mock_requests(&self) -> Vec<Vec<ApiMessage>> {
        self.captured.lock().expect("captured lock").clone()
    }

    /// Submit a prompt and return the assistant's reply text.
    pub async fn complete(
        &self,
        messages: &[ApiMessage],
        max_tokens: u32,
    ) -> Result<String, AssistantError> {
        if let Some(mock) = &self.mock {
            self.captured
                .lock()
                .expect("captured lock")
                .push(messages.to_vec());
            return match mock {
                MockBehavior::Reply(reply) => Ok(reply.clone()),
                MockBehavior::Fail(error) => Err(error.clone()),
            };
        }

        let request = ChatCompletionRequest {
            model: &self.model,
            messages,
            max_tokens,
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AssistantError::Api(e.to_string()))?;

        let response = check_response(response).await?;

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AssistantError::Api(format!("JSON parse error: {}", e)))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| AssistantError::Api("completion had no choices".to_string()))
    }
}

/// Check response status and map failures to categories.
async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, AssistantError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    if status.as_u16() == 429 {
        tracing::warn!("OpenAI quota/rate limit hit (429)");
    }
    Err(error_for_status(status.as_u16(), &body))
}

fn error_for_status(status: u16, body: &str) -> AssistantError {
    match status {
        429 => AssistantError::QuotaExceeded,
        401 => AssistantError::InvalidApiKey,
        403 => AssistantError::Forbidden,
        500 | 502 | 503 => AssistantError::Unavailable,
        _ => AssistantError::Api(format!("HTTP {}: {}", status, body)),
    }
}

/// Chat-completions request body.
#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ApiMessage],
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatCompletionChoice>,
}

#[derive(Deserialize)]
struct ChatCompletionChoice {
    message: ChatCompletionChoiceMessage,
}

#[derive(Deserialize)]
struct ChatCompletionChoiceMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_reply_round_trip() {
        let client = AssistantClient::new_mock("I hear you.");
        let prompt = vec![ApiMessage::system("be kind"), ApiMessage::user("hello")];

        let reply = client.complete(&prompt, 300).await.unwrap();

        assert_eq!(reply, "I hear you.");
        let requests = client.mock_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0], prompt);
    }

    #[tokio::test]
    async fn mock_failure_is_returned_verbatim() {
        let client = AssistantClient::new_mock_failure(AssistantError::QuotaExceeded);

        let err = client
            .complete(&[ApiMessage::user("hello")], 300)
            .await
            .unwrap_err();

        assert!(matches!(err, AssistantError::QuotaExceeded));
    }

    #[test]
    fn status_codes_map_to_categories() {
        assert!(matches!(
            error_for_status(429, ""),
            AssistantError::QuotaExceeded
        ));
        assert!(matches!(
            error_for_status(401, ""),
            AssistantError::InvalidApiKey
        ));
        assert!(matches!(
            error_for_status(403, ""),
            AssistantError::Forbidden
        ));
        for status in [500, 502, 503] {
            assert!(matches!(
                error_for_status(status, ""),
                AssistantError::Unavailable
            ));
        }
        assert!(matches!(error_for_status(418, "teapot"), AssistantError::Api(_)));
    }

    #[test]
    fn request_serializes_wire_shape() {
        let messages = vec![ApiMessage::system("sys"), ApiMessage::user("hi")];
        let request = ChatCompletionRequest {
            model: "gpt-3.5-turbo",
            messages: &messages,
            max_tokens: 300,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-3.5-turbo");
        assert_eq!(json["max_tokens"], 300);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "hi");
    }
}
