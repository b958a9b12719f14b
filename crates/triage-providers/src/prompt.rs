//! Prompt templates for error analysis.
//!
//! Two personalities, selected by [`Strictness`]:
//!
//! - **Confident** pushes the model toward detailed root-cause narratives
//!   tied to the stack-trace location, with code examples in the
//!   recommendations.
//! - **Cautious** forbids speculation outright: when diagnostic data is
//!   missing the model must say so instead of inventing function names,
//!   file names, or logic.
//!
//! Both embed the same error-details block and demand a single bare JSON
//! object matching the same schema. Prompt construction is deterministic.

use triage_core::{AnalysisRequest, Strictness};

/// Build the analysis prompt for a request under the given strictness policy.
pub fn build_prompt(strictness: Strictness, request: &AnalysisRequest) -> String {
    match strictness {
        Strictness::Confident => confident_prompt(request),
        Strictness::Cautious => cautious_prompt(request),
    }
}

/// The error-details block shared by both templates. Absent optional fields
/// render as "Not provided" so the model never sees an empty slot.
fn error_details(request: &AnalysisRequest) -> String {
    let stack_trace = match request.stack_trace.as_deref() {
        Some(s) if !s.trim().is_empty() => s,
        _ => "Not provided",
    };
    let context = match request.context.as_deref() {
        Some(c) if !c.trim().is_empty() => c,
        _ => "Not provided",
    };
    format!(
        "ERROR DETAILS:\n\
         - Error Type: {}\n\
         - Error Message: {}\n\
         - Stack Trace: {}\n\
         - Context: {}",
        request.error_type, request.error_message, stack_trace, context
    )
}

/// The JSON object every response must match.
const OUTPUT_SCHEMA: &str = r#"{
  "severity": "critical|high|medium|low",
  "category": "string (industry-friendly category)",
  "root_cause": "string (WHY the error happened, not a restatement of it)",
  "recommendations": [
    "string (specific action, most important first)",
    "string (preventive measure)"
  ],
  "related_errors": ["string (similar error pattern)"],
  "code_snippet": "string or null (relevant code from the context, if any)",
  "request_payload": "string or null (payload from the context, if any)",
  "confidence_score": 0.0
}"#;

fn confident_prompt(request: &AnalysisRequest) -> String {
    format!(
        "You are an expert backend debugging assistant with deep knowledge of multiple \
programming languages and frameworks. Analyze the following error thoroughly and provide \
a comprehensive, actionable response.\n\n\
{details}\n\n\
CRITICAL INSTRUCTIONS:\n\
1. Read the stack trace carefully to identify the EXACT line and file where the error occurred.\n\
2. Analyze the error message to understand the ROOT CAUSE, not just symptoms.\n\
3. Identify the tech stack from file extensions, import statements, and framework patterns.\n\
4. Provide SPECIFIC, ACTIONABLE recommendations with code examples when possible.\n\
5. Your root cause must EXPLAIN WHY the error happened, not repeat the error message.\n\n\
Respond ONLY with a single valid JSON object, no markdown, matching:\n\
{schema}\n\n\
ANALYSIS GUIDELINES:\n\
- Category: choose the MOST SPECIFIC of Runtime Error, Database, Network, Memory, \
Permission, Validation, Syntax, Configuration, Dependency, Type Error, Attribute Error, \
Import Error. Null/undefined access is a Runtime Error, not Database.\n\
- Root cause: 2-3 sentences covering WHAT failed, WHERE (file and line from the stack \
trace), and WHY. Be technical and precise.\n\
- Recommendations: 1 to 6 entries, specific to the detected tech stack, with code \
examples where relevant, prioritized most important first.\n\
- Severity: critical = crashes, data loss, production down; high = major functionality \
broken, user-facing; medium = degraded with workarounds; low = minor or cosmetic.\n\
- Confidence: 0.9-1.0 with a complete stack trace and identified stack; 0.7-0.9 with \
good information and some assumptions; 0.5-0.7 with limited trace or context; below 0.5 \
when information is minimal.\n\n\
Now analyze the error above with this level of detail and precision:",
        details = error_details(request),
        schema = OUTPUT_SCHEMA,
    )
}

fn cautious_prompt(request: &AnalysisRequest) -> String {
    format!(
        "You are a backend debugging assistant used by professional engineers. Your goal \
is ACCURACY and HONESTY, not confidence.\n\n\
STRICT RULES (DO NOT BREAK):\n\
1. Do NOT guess root causes when diagnostic data is missing.\n\
2. If the stack trace or code context is missing, say \"The root cause cannot be \
determined conclusively.\"\n\
3. Never invent function names, file names, or logic not present in the input.\n\
4. Do NOT suggest code-level fixes unless the error location is clear.\n\
5. Prefer \"insufficient data\" over speculative explanations.\n\
6. Use cautious language when certainty is low.\n\
7. If the error message is generic (e.g. \"Internal Server Error\"), classify it as \
\"Runtime Error - Unknown\".\n\n\
CONFIDENCE GUIDANCE:\n\
- Suggest LOW confidence (0.3-0.5) when the stack trace is missing, the error message \
is generic, or the context is vague.\n\
- Suggest HIGH confidence (0.8-0.95) ONLY when the stack trace is present, the error \
pattern is explicit, and the failure point is identifiable.\n\n\
{details}\n\n\
Respond ONLY with a single valid JSON object, no markdown, matching:\n\
{schema}\n\n\
Recommendations must contain 1 to 6 entries: diagnostic steps when the cause is \
unclear, specific fixes only when it is. Now analyze the error above, adhering \
STRICTLY to these rules:",
        details = error_details(request),
        schema = OUTPUT_SCHEMA,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_request() -> AnalysisRequest {
        AnalysisRequest::new("Cannot read property 'map' of undefined", "TypeError")
            .with_stack_trace("at Object.<anonymous> (/app/index.js:10:5)")
            .with_context("Production environment, user signup flow")
    }

    #[test]
    fn prompt_embeds_all_fields() {
        let prompt = build_prompt(Strictness::Confident, &full_request());
        assert!(prompt.contains("Cannot read property 'map' of undefined"));
        assert!(prompt.contains("TypeError"));
        assert!(prompt.contains("/app/index.js:10:5"));
        assert!(prompt.contains("user signup flow"));
    }

    #[test]
    fn absent_fields_render_as_not_provided() {
        let request = AnalysisRequest::new("boom", "Error");
        let prompt = build_prompt(Strictness::Cautious, &request);
        assert_eq!(prompt.matches("Not provided").count(), 2);
    }

    #[test]
    fn whitespace_only_fields_render_as_not_provided() {
        let request = AnalysisRequest::new("boom", "Error")
            .with_stack_trace("   ")
            .with_context("\n");
        let prompt = build_prompt(Strictness::Confident, &request);
        assert_eq!(prompt.matches("Not provided").count(), 2);
    }

    #[test]
    fn cautious_forbids_speculation() {
        let prompt = build_prompt(Strictness::Cautious, &full_request());
        assert!(prompt.contains("insufficient data"));
        assert!(prompt.contains("Never invent function names"));
    }

    #[test]
    fn confident_demands_code_examples() {
        let prompt = build_prompt(Strictness::Confident, &full_request());
        assert!(prompt.contains("code examples"));
        assert!(!prompt.contains("insufficient data"));
    }

    #[test]
    fn both_styles_demand_bare_json() {
        for style in [Strictness::Confident, Strictness::Cautious] {
            let prompt = build_prompt(style, &full_request());
            assert!(prompt.contains("single valid JSON object, no markdown"));
            assert!(prompt.contains("\"confidence_score\""));
            assert!(prompt.contains("\"recommendations\""));
        }
    }

    #[test]
    fn prompt_is_deterministic() {
        let request = full_request();
        let a = build_prompt(Strictness::Confident, &request);
        let b = build_prompt(Strictness::Confident, &request);
        assert_eq!(a, b);
    }
}
