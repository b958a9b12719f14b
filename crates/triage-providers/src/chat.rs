//! Shared client for OpenAI-compatible `/chat/completions` backends.
//!
//! Grok and the Hugging Face router speak the same wire dialect; only the
//! base URL, credential, and message framing differ, so the request/response
//! plumbing lives here once.

use serde::{Deserialize, Serialize};
use tracing::debug;

use triage_core::AnalyzeError;

/// Max tokens requested from chat-completion backends.
pub(crate) const MAX_COMPLETION_TOKENS: u32 = 2048;

#[derive(Clone, Debug, Serialize)]
pub(crate) struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

impl ChatMessage {
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

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f64,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Issue one chat-completion call and return the assistant text.
pub(crate) async fn complete(
    client: &reqwest::Client,
    backend: &str,
    api_base: &str,
    api_key: &str,
    model: &str,
    messages: &[ChatMessage],
    temperature: f64,
) -> Result<String, AnalyzeError> {
    let url = format!("{}/chat/completions", api_base.trim_end_matches('/'));
    debug!(backend, model, url = %url, "calling chat-completion backend");

    let body = ChatCompletionRequest {
        model,
        messages,
        temperature,
        max_tokens: MAX_COMPLETION_TOKENS,
    };

    let response = client
        .post(&url)
        .bearer_auth(api_key)
        .json(&body)
        .send()
        .await
        .map_err(|e| AnalyzeError::Transport(format!("{backend} request failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "failed to read error body".to_string());
        return Err(AnalyzeError::Transport(format!(
            "{backend} api error: {status}: {error_text}"
        )));
    }

    let parsed: ChatCompletionResponse = response
        .json()
        .await
        .map_err(|e| AnalyzeError::Transport(format!("{backend} returned malformed envelope: {e}")))?;

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.is_empty())
        .ok_or_else(|| AnalyzeError::Transport(format!("{backend} returned an empty completion")))
}
