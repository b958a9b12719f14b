//! The dispatcher — selects one backend adapter at startup and runs the
//! analysis pipeline per request.
//!
//! Two states, one transition: `uninitialized()` gives a dispatcher that
//! refuses every request with `Unavailable`; `from_config` constructs the
//! Ready state or fails fast with `Configuration` when the selected hosted
//! provider has no credential. There are no further transitions; the
//! dispatcher is not reconfigurable at runtime.
//!
//! Per request: adapter builds its prompt and makes one backend call, then
//! the shared normalizer extracts JSON, validation shapes it, the calibrator
//! adjusts confidence for input completeness, and metadata is stamped on.
//! Adapters hold no mutable state, so any number of concurrent requests can
//! share one dispatcher without locking.

use std::time::Instant;

use tracing::{debug, info};

use triage_core::{
    AnalysisMetadata, AnalysisRequest, AnalysisResult, AnalyzeError, Config, HealthStatus,
    ParsedAnalysis, Provider,
};

use crate::calibrate::{self, DEFAULT_BASE_CONFIDENCE};
use crate::gemini::GeminiAdapter;
use crate::grok::GrokAdapter;
use crate::huggingface::HuggingFaceAdapter;
use crate::normalize;
use crate::ollama::OllamaAdapter;
use crate::traits::ErrorAnalyzer;

pub struct Dispatcher {
    adapter: Option<Box<dyn ErrorAnalyzer>>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("ready", &self.is_ready())
            .field(
                "provider",
                &self.adapter.as_ref().map(|a| a.display_name()),
            )
            .finish()
    }
}

impl Dispatcher {
    /// A dispatcher that has not been given an adapter. Every analysis
    /// request fails with [`AnalyzeError::Unavailable`]; nothing panics.
    pub fn uninitialized() -> Self {
        Self { adapter: None }
    }

    /// Construct the Ready dispatcher for the configured provider.
    ///
    /// Fails fast when the selected hosted provider has no credential; a
    /// process that cannot analyze anything should not start.
    pub fn from_config(config: &Config) -> Result<Self, AnalyzeError> {
        let adapter: Box<dyn ErrorAnalyzer> = match config.provider {
            Provider::Gemini => {
                if !config.gemini.is_configured() {
                    return Err(AnalyzeError::Configuration(
                        "gemini selected but no API key configured (set GEMINI_API_KEY)".into(),
                    ));
                }
                Box::new(GeminiAdapter::new(&config.gemini, &config.server))
            }
            Provider::Grok => {
                if !config.grok.is_configured() {
                    return Err(AnalyzeError::Configuration(
                        "grok selected but no API key configured (set GROK_API_KEY)".into(),
                    ));
                }
                Box::new(GrokAdapter::new(&config.grok, &config.server))
            }
            Provider::HuggingFace => {
                if !config.huggingface.is_configured() {
                    return Err(AnalyzeError::Configuration(
                        "huggingface selected but no API key configured (set HUGGINGFACE_API_KEY)"
                            .into(),
                    ));
                }
                Box::new(HuggingFaceAdapter::new(&config.huggingface, &config.server))
            }
            // Local backend, no credential needed.
            Provider::Ollama => Box::new(OllamaAdapter::new(&config.ollama)),
        };

        info!(
            provider = adapter.display_name(),
            model = adapter.model_name(),
            "analysis dispatcher ready"
        );

        Ok(Self {
            adapter: Some(adapter),
        })
    }

    /// Wrap an already-built adapter. Useful for embedders that construct
    /// adapters themselves.
    pub fn with_adapter(adapter: Box<dyn ErrorAnalyzer>) -> Self {
        Self {
            adapter: Some(adapter),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.adapter.is_some()
    }

    /// Model identifier of the active adapter, if Ready.
    pub fn model_name(&self) -> Option<&str> {
        self.adapter.as_deref().map(|adapter| adapter.model_name())
    }

    /// Run one analysis end to end.
    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, AnalyzeError> {
        let adapter = self.adapter.as_deref().ok_or(AnalyzeError::Unavailable)?;
        request.validate()?;

        let started = Instant::now();
        debug!(
            provider = adapter.display_name(),
            error_type = %request.error_type,
            "dispatching analysis"
        );

        let raw = adapter.analyze(request).await?;
        let value = normalize::parse_analysis(&raw)?;
        let parsed: ParsedAnalysis = serde_json::from_value(value)
            .map_err(|e| AnalyzeError::Validation(e.to_string()))?;

        let base = parsed.confidence_score.unwrap_or(DEFAULT_BASE_CONFIDENCE);
        let confidence = calibrate::adjust_confidence(base, request);

        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        let metadata = AnalysisMetadata {
            model: adapter.model_name().to_string(),
            timestamp: triage_core::utils::unix_timestamp(),
            processing_time_ms: (elapsed_ms * 100.0).round() / 100.0,
        };

        let result = AnalysisResult::from_parsed(parsed, confidence, metadata)?;
        info!(
            provider = adapter.display_name(),
            severity = %result.severity,
            category = %result.category,
            confidence = result.confidence_score,
            "analysis complete"
        );
        Ok(result)
    }

    /// Health report for the embedding transport's `/health` endpoint.
    pub async fn health(&self, version: &str) -> HealthStatus {
        match self.adapter.as_deref() {
            Some(adapter) => HealthStatus {
                status: "healthy".to_string(),
                version: version.to_string(),
                configured: adapter.is_configured().await,
            },
            None => HealthStatus {
                status: "unavailable".to_string(),
                version: version.to_string(),
                configured: false,
            },
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
