//! The backend adapter trait.
//!
//! Every LLM backend (Gemini, Grok, Hugging Face, Ollama) implements this
//! trait. Adapters are stateless across calls: model name, temperature, and
//! credential are immutable configuration, so one instance serves any number
//! of concurrent requests without locking.

use async_trait::async_trait;
use triage_core::{AnalysisRequest, AnalyzeError};

/// One integration with an external LLM backend.
///
/// An adapter owns exactly three concerns: building its prompt, making one
/// network call, and reporting whether it is usable. Parsing, validation,
/// and confidence calibration live in the dispatcher pipeline and are shared
/// by all adapters.
#[async_trait]
pub trait ErrorAnalyzer: Send + Sync {
    /// Deterministic prompt embedding all four request fields plus the fixed
    /// JSON-schema instruction block.
    fn build_prompt(&self, request: &AnalysisRequest) -> String;

    /// Perform exactly one backend call (plus the adapter's own retry
    /// policy, where it has one) and return the raw response text.
    async fn call_backend(&self, prompt: &str) -> Result<String, AnalyzeError>;

    /// Cheap liveness/config check. Hosted backends report whether a
    /// credential is present; the local backend probes its listing endpoint.
    async fn is_configured(&self) -> bool;

    /// Model identifier, for result metadata.
    fn model_name(&self) -> &str;

    /// Display name for logging.
    fn display_name(&self) -> &str;

    /// Build the prompt and call the backend for one request.
    async fn analyze(&self, request: &AnalysisRequest) -> Result<String, AnalyzeError> {
        let prompt = self.build_prompt(request);
        self.call_backend(&prompt).await
    }
}
