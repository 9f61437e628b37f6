//! Inline completion requests for the autocomplete model.

use crate::kernel::services::ports::completion::{
    ChatCompletionBody, ChatMessage, CompletionClient, CompletionError, CompletionRequest,
};
use crate::kernel::services::ports::settings::{AutocompleteSettings, Settings};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

pub const TEMPERATURE: f32 = 0.1;
pub const MAX_TOKENS: u32 = 256;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionPrompt {
    pub context: String,
    pub file_content: String,
    pub instruction: String,
}

impl CompletionPrompt {
    pub fn render(&self) -> String {
        format!(
            "Context: {}\nFile: {}\nTask: {}",
            self.context, self.file_content, self.instruction
        )
    }
}

impl CompletionRequest {
    pub fn new(settings: &AutocompleteSettings, prompt: &CompletionPrompt) -> Self {
        let authorization =
            (!settings.api_key.is_empty()).then(|| format!("Bearer {}", settings.api_key));
        Self {
            endpoint: format!(
                "{}/chat/completions",
                settings.base_url.trim_end_matches('/')
            ),
            authorization,
            body: ChatCompletionBody {
                model: settings.model.clone(),
                messages: vec![ChatMessage {
                    role: "user".to_string(),
                    content: prompt.render(),
                }],
                temperature: TEMPERATURE,
                max_tokens: MAX_TOKENS,
            },
        }
    }
}

/// First choice text of an OpenAI-compatible response.
pub fn response_text(response: &Value) -> Result<String, CompletionError> {
    let choice = response
        .get("choices")
        .and_then(|choices| choices.get(0))
        .ok_or(CompletionError::EmptyResponse)?;
    choice
        .pointer("/message/content")
        .or_else(|| choice.get("text"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(CompletionError::EmptyResponse)
}

pub async fn complete(
    client: &dyn CompletionClient,
    settings: &Settings,
    prompt: &CompletionPrompt,
    timeout: Duration,
) -> Result<String, CompletionError> {
    let autocomplete = &settings.ai.autocomplete;
    if !autocomplete.enabled {
        return Err(CompletionError::Disabled);
    }

    let request = CompletionRequest::new(autocomplete, prompt);
    tracing::debug!(model = %request.body.model, endpoint = %request.endpoint, "requesting completion");
    match tokio::time::timeout(timeout, client.complete(&request)).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(?timeout, model = %request.body.model, "completion timed out");
            Err(CompletionError::Timeout(timeout))
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/completion.rs"]
mod tests;
