use super::*;
use crate::test_support::block_on;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Mutex;

struct FakeClient {
    delay: Duration,
    reply: Result<String, String>,
    seen: Mutex<Vec<CompletionRequest>>,
}

impl FakeClient {
    fn replying(text: &str) -> Self {
        Self {
            delay: Duration::ZERO,
            reply: Ok(text.to_string()),
            seen: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl CompletionClient for FakeClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        self.seen.lock().unwrap().push(request.clone());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.reply.clone().map_err(CompletionError::Client)
    }
}

fn prompt() -> CompletionPrompt {
    CompletionPrompt {
        context: "ts".to_string(),
        file_content: "const a = ".to_string(),
        instruction: "complete".to_string(),
    }
}

#[test]
fn prompt_renders_three_sections() {
    assert_eq!(
        prompt().render(),
        "Context: ts\nFile: const a = \nTask: complete"
    );
}

#[test]
fn request_is_shaped_from_settings() {
    let mut settings = AutocompleteSettings::default();
    settings.base_url = "https://llm.example/v1/".to_string();
    settings.api_key = "secret".to_string();

    let request = CompletionRequest::new(&settings, &prompt());

    assert_eq!(request.endpoint, "https://llm.example/v1/chat/completions");
    assert_eq!(request.authorization.as_deref(), Some("Bearer secret"));
    assert_eq!(request.body.model, settings.model);
    assert_eq!(request.body.temperature, TEMPERATURE);
    assert_eq!(request.body.max_tokens, 256);
    assert_eq!(request.body.messages.len(), 1);
    assert_eq!(request.body.messages[0].content, prompt().render());

    let body = serde_json::to_value(&request.body).unwrap();
    assert_eq!(body["max_tokens"], json!(256));
    assert_eq!(body["messages"][0]["role"], json!("user"));
}

#[test]
fn missing_api_key_sends_no_auth_header() {
    let request = CompletionRequest::new(&AutocompleteSettings::default(), &prompt());
    assert_eq!(request.authorization, None);
}

#[test]
fn response_text_reads_chat_and_legacy_shapes() {
    let chat = json!({ "choices": [{ "message": { "content": "1;" } }] });
    assert_eq!(response_text(&chat).unwrap(), "1;");

    let legacy = json!({ "choices": [{ "text": "2;" }] });
    assert_eq!(response_text(&legacy).unwrap(), "2;");

    let empty = json!({ "choices": [] });
    assert!(matches!(
        response_text(&empty),
        Err(CompletionError::EmptyResponse)
    ));
}

#[test]
fn disabled_autocomplete_never_calls_client() {
    let client = FakeClient::replying("x");
    let mut settings = Settings::default();
    settings.ai.autocomplete.enabled = false;

    let err = block_on(complete(&client, &settings, &prompt(), Duration::from_secs(1)))
        .unwrap_err();

    assert!(matches!(err, CompletionError::Disabled));
    assert!(client.seen.lock().unwrap().is_empty());
}

#[test]
fn completes_through_client() {
    let client = FakeClient::replying("42;");
    let text = block_on(complete(
        &client,
        &Settings::default(),
        &prompt(),
        Duration::from_secs(1),
    ))
    .unwrap();

    assert_eq!(text, "42;");
    assert_eq!(client.seen.lock().unwrap().len(), 1);
}

#[test]
fn slow_client_times_out() {
    let mut client = FakeClient::replying("late");
    client.delay = Duration::from_millis(200);

    let err = block_on(complete(
        &client,
        &Settings::default(),
        &prompt(),
        Duration::from_millis(10),
    ))
    .unwrap_err();

    assert!(matches!(err, CompletionError::Timeout(d) if d == Duration::from_millis(10)));
}

#[test]
fn client_errors_propagate() {
    let client = FakeClient {
        delay: Duration::ZERO,
        reply: Err("503".to_string()),
        seen: Mutex::new(Vec::new()),
    };
    let err = block_on(complete(
        &client,
        &Settings::default(),
        &prompt(),
        Duration::from_secs(1),
    ))
    .unwrap_err();
    assert!(matches!(err, CompletionError::Client(message) if message == "503"));
}
