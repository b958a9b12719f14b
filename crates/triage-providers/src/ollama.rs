//! Ollama adapter — local inference server, no credential.
//!
//! Local inference is slow, so the call timeout is a fixed 120 seconds. Any
//! non-success HTTP status is fatal for that call; there is no retry, since
//! a local server that answered with an error will keep doing so.
//! `is_configured` probes the model-listing endpoint instead of checking a
//! credential.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use triage_core::config::OllamaConfig;
use triage_core::{AnalysisRequest, AnalyzeError, Strictness};

use crate::prompt;
use crate::traits::ErrorAnalyzer;

/// Generous budget for on-machine inference.
const GENERATE_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(120);
/// The reachability probe must stay cheap.
const PROBE_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(5);

// ─────────────────────────────────────────────
// Wire types
// ─────────────────────────────────────────────

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f64,
    num_predict: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

// ─────────────────────────────────────────────
// Adapter
// ─────────────────────────────────────────────

pub struct OllamaAdapter {
    client: reqwest::Client,
    base_url: String,
    model: String,
    temperature: f64,
    strictness: Strictness,
}

impl std::fmt::Debug for OllamaAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OllamaAdapter")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

impl OllamaAdapter {
    pub fn new(config: &OllamaConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(GENERATE_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            strictness: config.strictness.unwrap_or(Strictness::Cautious),
        }
    }
}

#[async_trait]
impl ErrorAnalyzer for OllamaAdapter {
    fn build_prompt(&self, request: &AnalysisRequest) -> String {
        prompt::build_prompt(self.strictness, request)
    }

    async fn call_backend(&self, prompt: &str) -> Result<String, AnalyzeError> {
        let url = format!("{}/api/generate", self.base_url);
        debug!(model = %self.model, url = %url, "calling ollama");

        let body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: self.temperature,
                num_predict: 2048,
            },
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AnalyzeError::Transport(format!("ollama request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read error body".to_string());
            return Err(AnalyzeError::Transport(format!(
                "ollama api error: {status}: {error_text}"
            )));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AnalyzeError::Transport(format!("ollama returned malformed envelope: {e}")))?;

        if parsed.response.is_empty() {
            return Err(AnalyzeError::Transport(
                "ollama returned an empty response".into(),
            ));
        }
        Ok(parsed.response)
    }

    /// Reachability probe against the model-listing endpoint.
    async fn is_configured(&self) -> bool {
        let url = format!("{}/api/tags", self.base_url);
        match self.client.get(&url).timeout(PROBE_TIMEOUT).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn display_name(&self) -> &str {
        "Ollama"
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
