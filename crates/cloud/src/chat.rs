//! REST client for the external support chat service.
//!
//! Ticket creation asks the service for a new room and stores the returned
//! room id on the ticket.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

/// HTTP request timeout for a single chat API call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Header carrying the chat service API key.
const API_KEY_HEADER: &str = "X-API-Key";

/// Errors from the chat service client.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The chat service returned a non-2xx status code.
    #[error("Chat API error ({status}): {body}")]
    Api { status: u16, body: String },
}

/// Creates chat rooms for support tickets.
#[async_trait]
pub trait ChatService: Send + Sync {
    /// Create a room named `name` and return its id.
    async fn create_room(&self, name: &str) -> Result<String, ChatError>;
}

/// Chat service settings.
///
/// | Env var         | Default                 |
/// |-----------------|-------------------------|
/// | `CHAT_BASE_URL` | `http://localhost:3001` |
/// | `CHAT_API_KEY`  | `""`                    |
#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub base_url: String,
    pub api_key: String,
}

impl ChatConfig {
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("CHAT_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3001".into()),
            api_key: std::env::var("CHAT_API_KEY").unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RoomResponse {
    id: String,
}

/// HTTP implementation of [`ChatService`].
pub struct ChatClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ChatClient {
    pub fn new(config: &ChatConfig) -> Result<Self, ChatError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn rooms_url(&self) -> String {
        format!("{}/rooms", self.base_url)
    }
}

#[async_trait]
impl ChatService for ChatClient {
    async fn create_room(&self, name: &str) -> Result<String, ChatError> {
        let response = self
            .client
            .post(self.rooms_url())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&serde_json::json!({ "name": name }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let room: RoomResponse = response.json().await?;
        Ok(room.id)
    }
}
