//! Core types, configuration, and error taxonomy for Triage.
//!
//! Triage turns a structured error description (message, type, stack trace,
//! context) into a structured diagnostic report by delegating to an LLM
//! backend. This crate holds everything the provider layer and the CLI share:
//!
//! - [`types`] — analysis request/result types and validation
//! - [`config`] — configuration schema and loader
//! - [`error`] — the [`error::AnalyzeError`] taxonomy with transport-code mapping
//! - [`utils`] — small helpers (excerpt truncation, timestamps)

pub mod config;
pub mod error;
pub mod types;
pub mod utils;

pub use config::{load_config, Config, Provider, Strictness};
pub use error::AnalyzeError;
pub use types::{
    AnalysisMetadata, AnalysisRequest, AnalysisResult, HealthStatus, ParsedAnalysis, Severity,
};
