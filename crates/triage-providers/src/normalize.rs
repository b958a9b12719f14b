//! Response normalization — loose model output text to a JSON mapping.
//!
//! Backends are instructed to emit a bare JSON object but frequently wrap it
//! in prose or markdown anyway, so parsing is two-tier: strip code fences and
//! try a direct parse, then fall back to extracting the first outermost
//! `{...}` span. Only when both fail does the call surface a parse error,
//! carrying an excerpt of the offending text.

use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

use triage_core::utils::truncate_excerpt;
use triage_core::AnalyzeError;

/// How much of an unparseable response to carry in the error.
const EXCERPT_CHARS: usize = 500;

/// Greedy outermost-brace span, dot matching newlines.
fn json_span_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\{.*\}").expect("static regex"))
}

/// Parse a backend's raw response text into a JSON object.
pub fn parse_analysis(raw: &str) -> Result<serde_json::Value, AnalyzeError> {
    let text = strip_fences(raw);

    let direct_err = match serde_json::from_str::<serde_json::Value>(text) {
        Ok(value) if value.is_object() => return Ok(value),
        Ok(_) => "response is valid JSON but not an object".to_string(),
        Err(e) => e.to_string(),
    };

    // Fallback: the model wrapped the object in prose.
    if let Some(span) = json_span_re().find(text) {
        debug!(
            span_len = span.as_str().len(),
            "direct JSON parse failed, trying extracted brace span"
        );
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(span.as_str()) {
            if value.is_object() {
                return Ok(value);
            }
        }
    }

    Err(AnalyzeError::Parse {
        reason: direct_err,
        excerpt: truncate_excerpt(text, EXCERPT_CHARS),
    })
}

/// Strip a leading fenced code-block marker (with or without a `json`
/// language tag) and a trailing fence.
fn strip_fences(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
    {
        text = rest;
    }
    let trimmed = text.trim_end();
    if let Some(rest) = trimmed.strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
