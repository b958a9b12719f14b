//! Hugging Face adapter — OpenAI-compatible inference router.
//!
//! Defaults to the cautious prompt personality: the smaller instruct models
//! served here are the quickest to fabricate plausible-sounding root causes,
//! so the prompt forbids speculation and a system message pins the output
//! format.

use async_trait::async_trait;

use triage_core::config::{HuggingFaceConfig, ServerConfig};
use triage_core::{AnalysisRequest, AnalyzeError, Strictness};

use crate::chat::{self, ChatMessage};
use crate::prompt;
use crate::retry::{with_retry, RetryPolicy};
use crate::traits::ErrorAnalyzer;

const DEFAULT_API_BASE: &str = "https://router.huggingface.co/v1";

const SYSTEM_MESSAGE: &str =
    "You are an expert debugging assistant. Always respond with valid JSON only.";

pub struct HuggingFaceAdapter {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
    temperature: f64,
    strictness: Strictness,
    retry: RetryPolicy,
}

impl std::fmt::Debug for HuggingFaceAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HuggingFaceAdapter")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .finish()
    }
}

impl HuggingFaceAdapter {
    pub fn new(config: &HuggingFaceConfig, server: &ServerConfig) -> Self {
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
            strictness: config.strictness.unwrap_or(Strictness::Cautious),
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
impl ErrorAnalyzer for HuggingFaceAdapter {
    fn build_prompt(&self, request: &AnalysisRequest) -> String {
        prompt::build_prompt(self.strictness, request)
    }

    async fn call_backend(&self, prompt: &str) -> Result<String, AnalyzeError> {
        let messages = [
            ChatMessage::system(SYSTEM_MESSAGE),
            ChatMessage::user(prompt),
        ];
        with_retry(&self.retry, || {
            chat::complete(
                &self.client,
                "huggingface",
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
        "Hugging Face"
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
