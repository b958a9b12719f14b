//! Confidence calibration.
//!
//! LLMs report high confidence even on sparse input, so the model's
//! self-reported score is not trusted verbatim: independent additive
//! penalties and bonuses derived from input completeness are summed onto it,
//! then the result is clamped and rounded. Pure function, no side effects.

use triage_core::AnalysisRequest;

/// Confidence assumed when the model reports none.
pub const DEFAULT_BASE_CONFIDENCE: f64 = 0.7;

/// Adjust a model-reported confidence score for input completeness.
///
/// Adjustments (independent, summed):
/// - stack trace absent or shorter than 10 chars after trim: −0.10
/// - context absent or shorter than 5 chars after trim: −0.05
/// - error message shorter than 20 chars after trim: −0.05
/// - stack trace longer than 100 chars after trim: +0.05
///
/// The result is clamped to [0.0, 1.0] and rounded to 2 decimal places.
pub fn adjust_confidence(base: f64, request: &AnalysisRequest) -> f64 {
    let mut adjustment = 0.0;

    let stack_len = request.stack_trace_trimmed().chars().count();
    if stack_len < 10 {
        adjustment -= 0.10;
    }
    if stack_len > 100 {
        adjustment += 0.05;
    }

    if request.context_trimmed().chars().count() < 5 {
        adjustment -= 0.05;
    }

    if request.error_message.trim().chars().count() < 20 {
        adjustment -= 0.05;
    }

    let adjusted = (base + adjustment).clamp(0.0, 1.0);
    (adjusted * 100.0).round() / 100.0
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
