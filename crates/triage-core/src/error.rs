//! Error taxonomy for the analysis pipeline.
//!
//! Every failure mode a caller can observe is one of these variants. The
//! web transport embedding this crate maps each variant to a status code via
//! [`AnalyzeError::status_code`]; nothing here is allowed to crash the
//! process at request time.

use thiserror::Error;

/// All errors the analysis pipeline can surface.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// Fatal at startup: the selected provider requires a credential that is
    /// absent. The dispatcher never reaches Ready.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Network or backend failure for a single call. Retried per the
    /// adapter's policy; exhausted retries surface this to the caller.
    #[error("transport error: {0}")]
    Transport(String),

    /// The backend's text contained no extractable JSON after the fenced
    /// and brace-span fallbacks. Carries a truncated excerpt of the
    /// offending text for diagnostics.
    #[error("failed to parse analysis response: {reason}\nresponse excerpt: {excerpt}")]
    Parse { reason: String, excerpt: String },

    /// Extracted JSON did not satisfy the analysis schema (missing or empty
    /// recommendations, unknown severity, wrong field shapes).
    #[error("analysis response failed validation: {0}")]
    Validation(String),

    /// The dispatcher has not been initialized with a provider adapter.
    #[error("analysis service not available; check provider configuration")]
    Unavailable,
}

impl AnalyzeError {
    /// Status code the web transport should answer with for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            AnalyzeError::Configuration(_) | AnalyzeError::Transport(_) => 500,
            AnalyzeError::Parse { .. } | AnalyzeError::Validation(_) => 422,
            AnalyzeError::Unavailable => 503,
        }
    }

    /// Whether a retry of the same call could plausibly succeed.
    ///
    /// Only transport failures qualify; a response that failed to parse will
    /// fail to parse again, and configuration problems need operator action.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AnalyzeError::Transport(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_maps_to_500() {
        assert_eq!(AnalyzeError::Transport("boom".into()).status_code(), 500);
    }

    #[test]
    fn parse_and_validation_map_to_422() {
        let parse = AnalyzeError::Parse {
            reason: "no json".into(),
            excerpt: "hello".into(),
        };
        assert_eq!(parse.status_code(), 422);
        assert_eq!(AnalyzeError::Validation("bad".into()).status_code(), 422);
    }

    #[test]
    fn unavailable_maps_to_503() {
        assert_eq!(AnalyzeError::Unavailable.status_code(), 503);
    }

    #[test]
    fn only_transport_is_retryable() {
        assert!(AnalyzeError::Transport("timeout".into()).is_retryable());
        assert!(!AnalyzeError::Unavailable.is_retryable());
        assert!(!AnalyzeError::Validation("bad".into()).is_retryable());
        assert!(!AnalyzeError::Parse {
            reason: "x".into(),
            excerpt: "y".into()
        }
        .is_retryable());
    }

    #[test]
    fn parse_error_display_includes_excerpt() {
        let err = AnalyzeError::Parse {
            reason: "expected value".into(),
            excerpt: "the model rambled".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("the model rambled"));
    }
}
