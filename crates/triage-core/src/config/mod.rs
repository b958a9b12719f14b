//! Configuration — schema and loader.
//!
//! Loaded once at process start; immutable for the process lifetime.

pub mod loader;
pub mod schema;

pub use loader::{get_config_path, load_config, save_config};
pub use schema::{
    Config, GeminiConfig, GrokConfig, HuggingFaceConfig, OllamaConfig, Provider, ServerConfig,
    Strictness,
};
