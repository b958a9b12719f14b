//! Analysis request/result types.
//!
//! `AnalysisRequest` is what callers hand in; `AnalysisResult` is what they
//! get back. `ParsedAnalysis` sits between the two: it is the loosely-shaped
//! JSON a backend model produced, before confidence calibration and metadata
//! stamping turn it into a final result.
//!
//! JSON field names follow the wire contract consumed by the web transport
//! (snake_case, `analysis_metadata`, `gemini_configured`).

use serde::{Deserialize, Serialize};

use crate::error::AnalyzeError;

// ─────────────────────────────────────────────
// Request
// ─────────────────────────────────────────────

/// One error to analyze. Constructed per call, immutable, never persisted.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// The error message. Must be non-empty.
    pub error_message: String,
    /// Type of error (e.g. `TypeError`, `NetworkError`). Must be non-empty.
    pub error_type: String,
    /// Stack trace, if available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_trace: Option<String>,
    /// Additional context about the error (environment, code, payload).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl AnalysisRequest {
    pub fn new(error_message: impl Into<String>, error_type: impl Into<String>) -> Self {
        Self {
            error_message: error_message.into(),
            error_type: error_type.into(),
            stack_trace: None,
            context: None,
        }
    }

    pub fn with_stack_trace(mut self, stack_trace: impl Into<String>) -> Self {
        self.stack_trace = Some(stack_trace.into());
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Reject requests with an empty message or type before any network call.
    pub fn validate(&self) -> Result<(), AnalyzeError> {
        if self.error_message.trim().is_empty() {
            return Err(AnalyzeError::Validation(
                "error_message must not be empty".into(),
            ));
        }
        if self.error_type.trim().is_empty() {
            return Err(AnalyzeError::Validation(
                "error_type must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Stack trace with surrounding whitespace removed, empty if absent.
    pub fn stack_trace_trimmed(&self) -> &str {
        self.stack_trace.as_deref().unwrap_or("").trim()
    }

    /// Context with surrounding whitespace removed, empty if absent.
    pub fn context_trimmed(&self) -> &str {
        self.context.as_deref().unwrap_or("").trim()
    }
}

// ─────────────────────────────────────────────
// Result
// ─────────────────────────────────────────────

/// Severity level of an analyzed error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        };
        f.write_str(s)
    }
}

/// Metadata stamped onto every result by the dispatcher.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    /// Model identifier used for the analysis.
    pub model: String,
    /// Unix timestamp (seconds) of the analysis.
    pub timestamp: i64,
    /// Wall-clock processing time in milliseconds.
    pub processing_time_ms: f64,
}

/// The shape a backend model is asked to produce, deserialized leniently.
///
/// Missing list fields default to empty; the strict bounds (at least one
/// recommendation, at most six) are enforced when converting to
/// [`AnalysisResult`], so a model that omits them fails validation rather
/// than producing a silently-empty report.
#[derive(Clone, Debug, Deserialize)]
pub struct ParsedAnalysis {
    pub severity: Severity,
    pub category: String,
    pub root_cause: String,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub related_errors: Vec<String>,
    #[serde(default)]
    pub code_snippet: Option<String>,
    #[serde(default)]
    pub request_payload: Option<String>,
    #[serde(default)]
    pub confidence_score: Option<f64>,
}

/// Bounds on the recommendations list, matching the response schema the
/// prompts demand.
pub const MIN_RECOMMENDATIONS: usize = 1;
pub const MAX_RECOMMENDATIONS: usize = 6;

/// A complete diagnostic report. Constructed once per request from provider
/// output; never mutated afterwards; not persisted.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub severity: Severity,
    /// Error category (e.g. "Runtime Error", "Database", "Network").
    pub category: String,
    /// Why the error happened, per the model.
    pub root_cause: String,
    /// 1–6 actionable recommendations, most important first.
    pub recommendations: Vec<String>,
    /// Related error patterns. Deduplicated, may be empty.
    #[serde(default)]
    pub related_errors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_snippet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_payload: Option<String>,
    /// Calibrated confidence, always within [0.0, 1.0].
    pub confidence_score: f64,
    pub analysis_metadata: AnalysisMetadata,
}

impl AnalysisResult {
    /// Assemble a final result from a parsed model response, an
    /// already-calibrated confidence score, and call metadata.
    ///
    /// Enforces the recommendations bounds and clamps the confidence score
    /// regardless of what the caller passed in.
    pub fn from_parsed(
        parsed: ParsedAnalysis,
        confidence_score: f64,
        analysis_metadata: AnalysisMetadata,
    ) -> Result<Self, AnalyzeError> {
        if parsed.recommendations.len() < MIN_RECOMMENDATIONS {
            return Err(AnalyzeError::Validation(
                "recommendations must contain at least one entry".into(),
            ));
        }
        if parsed.recommendations.len() > MAX_RECOMMENDATIONS {
            return Err(AnalyzeError::Validation(format!(
                "recommendations must contain at most {} entries, got {}",
                MAX_RECOMMENDATIONS,
                parsed.recommendations.len()
            )));
        }

        Ok(Self {
            severity: parsed.severity,
            category: parsed.category,
            root_cause: parsed.root_cause,
            recommendations: parsed.recommendations,
            related_errors: dedup_preserving_order(parsed.related_errors),
            code_snippet: parsed.code_snippet,
            request_payload: parsed.request_payload,
            confidence_score: confidence_score.clamp(0.0, 1.0),
            analysis_metadata,
        })
    }
}

/// Related errors behave as an ordered set: first occurrence wins.
fn dedup_preserving_order(items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

// ─────────────────────────────────────────────
// Health
// ─────────────────────────────────────────────

/// Health-report shape consumed by the web transport's `/health` endpoint
/// and the CLI `status` command.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    /// Whether the active adapter reports itself configured. The field name
    /// is kept from the original wire contract, which predates multi-provider
    /// support.
    #[serde(rename = "gemini_configured")]
    pub configured: bool,
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
