//! Google Gemini adapter — hosted REST `generateContent` endpoint.
//!
//! The one adapter with retry: Gemini calls are wrapped in bounded
//! exponential backoff (transport failures only).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use triage_core::config::{GeminiConfig, ServerConfig};
use triage_core::{AnalysisRequest, AnalyzeError, Strictness};

use crate::prompt;
use crate::retry::{with_retry, RetryPolicy};
use crate::traits::ErrorAnalyzer;

const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

// ─────────────────────────────────────────────
// Wire types
// ─────────────────────────────────────────────

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    top_p: f64,
    top_k: u32,
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<TextPart>,
}

#[derive(Deserialize)]
struct TextPart {
    #[serde(default)]
    text: String,
}

// ─────────────────────────────────────────────
// Adapter
// ─────────────────────────────────────────────

pub struct GeminiAdapter {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
    temperature: f64,
    strictness: Strictness,
    retry: RetryPolicy,
}

impl std::fmt::Debug for GeminiAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiAdapter")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .finish()
    }
}

impl GeminiAdapter {
    pub fn new(config: &GeminiConfig, server: &ServerConfig) -> Self {
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

    fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            self.model
        )
    }

    /// One `generateContent` call, no retry.
    async fn generate(&self, prompt: &str) -> Result<String, AnalyzeError> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
                top_p: 0.95,
                top_k: 40,
                max_output_tokens: 2048,
            },
        };

        let url = self.generate_url();
        debug!(model = %self.model, "calling gemini");

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| AnalyzeError::Transport(format!("gemini request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read error body".to_string());
            return Err(AnalyzeError::Transport(format!(
                "gemini api error: {status}: {error_text}"
            )));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AnalyzeError::Transport(format!("gemini returned malformed envelope: {e}")))?;

        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .map(|part| part.text)
            .filter(|text| !text.is_empty())
            .ok_or_else(|| AnalyzeError::Transport("gemini returned no candidates".into()))
    }
}

#[async_trait]
impl ErrorAnalyzer for GeminiAdapter {
    fn build_prompt(&self, request: &AnalysisRequest) -> String {
        prompt::build_prompt(self.strictness, request)
    }

    async fn call_backend(&self, prompt: &str) -> Result<String, AnalyzeError> {
        with_retry(&self.retry, || self.generate(prompt)).await
    }

    async fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn display_name(&self) -> &str {
        "Gemini"
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn adapter_for(server_uri: &str) -> GeminiAdapter {
        let config = GeminiConfig {
            api_key: "test-gemini-key".into(),
            api_base: Some(server_uri.to_string()),
            ..Default::default()
        };
        GeminiAdapter::new(&config, &ServerConfig::default()).with_retry_policy(RetryPolicy {
            max_attempts: 3,
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(4),
        })
    }

    fn candidate_body(text: &str) -> serde_json::Value {
        serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "text": text }] }
            }]
        })
    }

    #[test]
    fn generate_url_shape() {
        let adapter = adapter_for("https://generativelanguage.googleapis.com/");
        assert_eq!(
            adapter.generate_url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[tokio::test]
    async fn call_backend_success() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
            .and(query_param("key", "test-gemini-key"))
            .and(body_partial_json(serde_json::json!({
                "generationConfig": { "temperature": 0.3, "topK": 40 }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(candidate_body("{\"severity\": \"low\"}")))
            .mount(&mock_server)
            .await;

        let adapter = adapter_for(&mock_server.uri());
        let text = adapter.call_backend("analyze this").await.unwrap();
        assert_eq!(text, "{\"severity\": \"low\"}");
    }

    #[tokio::test]
    async fn retries_transport_failures_then_recovers() {
        let mock_server = MockServer::start().await;
        // First two attempts fail, third succeeds.
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .mount(&mock_server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(candidate_body("ok")))
            .mount(&mock_server)
            .await;

        let adapter = adapter_for(&mock_server.uri());
        let text = adapter.call_backend("analyze this").await.unwrap();
        assert_eq!(text, "ok");
    }

    #[tokio::test]
    async fn exhausted_retries_surface_transport_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
            .expect(3)
            .mount(&mock_server)
            .await;

        let adapter = adapter_for(&mock_server.uri());
        let err = adapter.call_backend("analyze this").await.unwrap_err();
        assert!(matches!(err, AnalyzeError::Transport(_)));
    }

    #[tokio::test]
    async fn empty_candidates_are_transport_errors() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"candidates": []})))
            .mount(&mock_server)
            .await;

        let adapter = adapter_for(&mock_server.uri());
        let err = adapter.call_backend("analyze this").await.unwrap_err();
        assert!(matches!(err, AnalyzeError::Transport(_)));
    }

    #[tokio::test]
    async fn is_configured_reflects_key() {
        let configured = adapter_for("http://localhost:1");
        assert!(configured.is_configured().await);

        let config = GeminiConfig::default();
        let unconfigured = GeminiAdapter::new(&config, &ServerConfig::default());
        assert!(!unconfigured.is_configured().await);
    }

    #[test]
    fn prompt_defaults_to_confident() {
        let adapter = adapter_for("http://localhost:1");
        let request = AnalysisRequest::new("boom", "Error");
        let prompt = adapter.build_prompt(&request);
        assert!(prompt.contains("expert backend debugging assistant"));
    }
}
