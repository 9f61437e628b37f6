use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// OpenAI-compatible chat completion body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionBody {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub endpoint: String,
    /// Full `Authorization` header value.
    pub authorization: Option<String>,
    pub body: ChatCompletionBody,
}

#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("autocomplete is disabled")]
    Disabled,
    #[error("completion timed out after {0:?}")]
    Timeout(Duration),
    #[error("completion response has no text")]
    EmptyResponse,
    #[error("completion request failed: {0}")]
    Client(String),
}

/// Transport for completion requests.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError>;
}
