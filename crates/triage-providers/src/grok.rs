//! xAI Grok adapter — hosted OpenAI-compatible chat completions.

use async_trait::async_trait;

use triage_core::config::{GrokConfig, ServerConfig};
use triage_core::{AnalysisRequest, AnalyzeError, Strictness};

use crate::chat::{self, ChatMessage};
use crate::prompt;
use crate::retry::{with_retry, RetryPolicy};
use crate::traits::ErrorAnalyzer;

const DEFAULT_API_BASE: &str = "https://api.x.ai/v1";

pub struct GrokAdapter {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
    temperature: f64,
    strictness: Strictness,
    retry: RetryPolicy,
}

impl std::fmt::Debug for GrokAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GrokAdapter")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .finish()
    }
}

impl GrokAdapter {
    pub fn new(config: &GrokConfig, server: &ServerConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(server.request_timeout))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            api_base: config
                .api_base
                .clone()
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            strictness: config.strictness.unwrap_or(Strictness::Confident),
            retry: RetryPolicy::with_max_attempts(server.max_retries),
        }
    }

    /// Override the backoff policy (mainly for fast tests).
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

#[async_trait]
impl ErrorAnalyzer for GrokAdapter {
    fn build_prompt(&self, request: &AnalysisRequest) -> String {
        prompt::build_prompt(self.strictness, request)
    }

    async fn call_backend(&self, prompt: &str) -> Result<String, AnalyzeError> {
        let messages = [ChatMessage::user(prompt)];
        with_retry(&self.retry, || {
            chat::complete(
                &self.client,
                "grok",
                &self.api_base,
                &self.api_key,
                &self.model,
                &messages,
                self.temperature,
            )
        })
        .await
    }

    async fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn display_name(&self) -> &str {
        "Grok"
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn adapter_for(server_uri: &str) -> GrokAdapter {
        let config = GrokConfig {
            api_key: "xai-test-key".into(),
            api_base: Some(server_uri.to_string()),
            ..Default::default()
        };
        GrokAdapter::new(&config, &ServerConfig::default()).with_retry_policy(RetryPolicy {
            max_attempts: 2,
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(2),
        })
    }

    fn completion_body(content: &str) -> serde_json::Value {
        serde_json::json!({
            "choices": [{ "message": { "content": content } }]
        })
    }

    #[tokio::test]
    async fn call_backend_success() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer xai-test-key"))
            .and(body_partial_json(serde_json::json!({
                "model": "grok-beta",
                "temperature": 0.3,
                "max_tokens": 2048
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("{\"severity\": \"high\"}")))
            .mount(&mock_server)
            .await;

        let adapter = adapter_for(&mock_server.uri());
        let text = adapter.call_backend("analyze this").await.unwrap();
        assert_eq!(text, "{\"severity\": \"high\"}");
    }

    #[tokio::test]
    async fn api_error_surfaces_as_transport() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
            .mount(&mock_server)
            .await;

        let adapter = adapter_for(&mock_server.uri());
        let err = adapter.call_backend("analyze this").await.unwrap_err();
        match err {
            AnalyzeError::Transport(msg) => assert!(msg.contains("401")),
            other => panic!("expected Transport, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_completion_is_transport_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})))
            .mount(&mock_server)
            .await;

        let adapter = adapter_for(&mock_server.uri());
        let err = adapter.call_backend("analyze this").await.unwrap_err();
        assert!(matches!(err, AnalyzeError::Transport(_)));
    }

    #[test]
    fn default_base_is_xai() {
        let config = GrokConfig {
            api_key: "xai".into(),
            ..Default::default()
        };
        let adapter = GrokAdapter::new(&config, &ServerConfig::default());
        assert_eq!(adapter.api_base, "https://api.x.ai/v1");
    }
}
