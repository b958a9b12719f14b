//! LLM backend adapters and the analysis pipeline for Triage.
//!
//! # Architecture
//!
//! - [`traits::ErrorAnalyzer`] — trait every backend adapter implements
//! - [`gemini`], [`grok`], [`huggingface`], [`ollama`] — the four adapters
//! - [`prompt`] — shared prompt templates, keyed by strictness policy
//! - [`normalize`] — turns loose model output text into a JSON mapping
//! - [`calibrate`] — input-completeness confidence adjustment
//! - [`retry`] — bounded exponential backoff for transport failures
//! - [`dispatcher::Dispatcher`] — selects one adapter at startup and runs
//!   the full analyze pipeline per request
//!
//! The normalizer and calibrator are implemented once and shared by all
//! adapters; adapters differ only in prompt personality, transport, and
//! default model.

pub mod calibrate;
mod chat;
pub mod dispatcher;
pub mod gemini;
pub mod grok;
pub mod huggingface;
pub mod normalize;
pub mod ollama;
pub mod prompt;
pub mod retry;
pub mod traits;

pub use dispatcher::Dispatcher;
pub use gemini::GeminiAdapter;
pub use grok::GrokAdapter;
pub use huggingface::HuggingFaceAdapter;
pub use ollama::OllamaAdapter;
pub use retry::{with_retry, RetryPolicy};
pub use traits::ErrorAnalyzer;
