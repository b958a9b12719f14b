//! Configuration schema.
//!
//! Hierarchy: `Config` → one section per provider backend plus `ServerConfig`.
//! JSON on disk uses **camelCase** keys; Rust uses snake_case
//! (`#[serde(rename_all = "camelCase")]` handles the conversion).

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────
// Provider selection
// ─────────────────────────────────────────────

/// Which backend handles analysis requests. Exactly one is active per
/// process; selected once at startup.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Gemini,
    Grok,
    #[serde(rename = "huggingface")]
    HuggingFace,
    /// Local backend; needs no credential.
    #[default]
    Ollama,
}

impl std::str::FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini" => Ok(Provider::Gemini),
            "grok" => Ok(Provider::Grok),
            "huggingface" => Ok(Provider::HuggingFace),
            "ollama" => Ok(Provider::Ollama),
            other => Err(format!(
                "unknown provider '{other}' (expected gemini, grok, huggingface, or ollama)"
            )),
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Provider::Gemini => "gemini",
            Provider::Grok => "grok",
            Provider::HuggingFace => "huggingface",
            Provider::Ollama => "ollama",
        };
        f.write_str(s)
    }
}

/// Response-strictness policy baked into the analysis prompt.
///
/// `Confident` asks for detailed, code-example-rich root-cause narratives;
/// `Cautious` forbids speculation and prefers "insufficient data" framing
/// when diagnostics are missing. Each provider has a default, overridable
/// per provider in config.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strictness {
    Confident,
    Cautious,
}

// ─────────────────────────────────────────────
// Per-provider sections
// ─────────────────────────────────────────────

/// Google Gemini (hosted, REST `generateContent`).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeminiConfig {
    #[serde(default)]
    pub api_key: String,
    pub model: String,
    pub temperature: f64,
    /// Custom API base URL (overrides the hosted default).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
    /// Prompt strictness override; defaults to confident for Gemini.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strictness: Option<Strictness>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "gemini-1.5-flash".to_string(),
            temperature: 0.3,
            api_base: None,
            strictness: None,
        }
    }
}

impl GeminiConfig {
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

/// xAI Grok (hosted, OpenAI-compatible chat completions).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GrokConfig {
    #[serde(default)]
    pub api_key: String,
    pub model: String,
    pub temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
    /// Prompt strictness override; defaults to confident for Grok.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strictness: Option<Strictness>,
}

impl Default for GrokConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "grok-beta".to_string(),
            temperature: 0.3,
            api_base: None,
            strictness: None,
        }
    }
}

impl GrokConfig {
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

/// Hugging Face Inference (hosted, OpenAI-compatible router).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HuggingFaceConfig {
    #[serde(default)]
    pub api_key: String,
    pub model: String,
    pub temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
    /// Prompt strictness override; defaults to cautious for Hugging Face.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strictness: Option<Strictness>,
}

impl Default for HuggingFaceConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "meta-llama/Llama-3.2-3B-Instruct".to_string(),
            temperature: 0.3,
            api_base: None,
            strictness: None,
        }
    }
}

impl HuggingFaceConfig {
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

/// Ollama (local inference server, no credential).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OllamaConfig {
    pub model: String,
    pub base_url: String,
    pub temperature: f64,
    /// Prompt strictness override; defaults to cautious for Ollama.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strictness: Option<Strictness>,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            model: "phi3:mini".to_string(),
            base_url: "http://localhost:11434".to_string(),
            temperature: 0.3,
            strictness: None,
        }
    }
}

// ─────────────────────────────────────────────
// Server
// ─────────────────────────────────────────────

/// Settings consumed by the embedding web transport and the adapters'
/// retry/timeout behavior.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerConfig {
    /// Comma-separated list of allowed CORS origins.
    pub cors_origins: String,
    /// Maximum attempts for retryable hosted-backend calls.
    pub max_retries: u32,
    /// Request timeout in seconds for hosted backends.
    pub request_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            cors_origins: "http://localhost:3000".to_string(),
            max_retries: 3,
            request_timeout: 30,
        }
    }
}

impl ServerConfig {
    /// CORS origins split on commas, trimmed, empty entries dropped.
    pub fn cors_origins_list(&self) -> Vec<String> {
        self.cors_origins
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect()
    }
}

// ─────────────────────────────────────────────
// Root Config
// ─────────────────────────────────────────────

/// Root configuration — loaded from `~/.triage/config.json` + env vars.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// The active provider backend.
    pub provider: Provider,
    pub gemini: GeminiConfig,
    pub grok: GrokConfig,
    pub huggingface: HuggingFaceConfig,
    pub ollama: OllamaConfig,
    pub server: ServerConfig,
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_provider_is_ollama() {
        assert_eq!(Config::default().provider, Provider::Ollama);
    }

    #[test]
    fn provider_from_str_case_insensitive() {
        assert_eq!("Gemini".parse::<Provider>().unwrap(), Provider::Gemini);
        assert_eq!(
            " HUGGINGFACE ".parse::<Provider>().unwrap(),
            Provider::HuggingFace
        );
        assert!("llamacpp".parse::<Provider>().is_err());
    }

    #[test]
    fn provider_serde_round_trip() {
        let json = serde_json::to_string(&Provider::HuggingFace).unwrap();
        assert_eq!(json, "\"huggingface\"");
        let back: Provider = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Provider::HuggingFace);
    }

    #[test]
    fn hosted_defaults() {
        let config = Config::default();
        assert_eq!(config.gemini.model, "gemini-1.5-flash");
        assert_eq!(config.grok.model, "grok-beta");
        assert_eq!(config.huggingface.model, "meta-llama/Llama-3.2-3B-Instruct");
        assert_eq!(config.gemini.temperature, 0.3);
        assert!(!config.gemini.is_configured());
    }

    #[test]
    fn ollama_defaults() {
        let ollama = OllamaConfig::default();
        assert_eq!(ollama.model, "phi3:mini");
        assert_eq!(ollama.base_url, "http://localhost:11434");
    }

    #[test]
    fn cors_origins_list_splits_and_trims() {
        let server = ServerConfig {
            cors_origins: "http://localhost:3000, https://app.example.com ,".to_string(),
            ..Default::default()
        };
        assert_eq!(
            server.cors_origins_list(),
            vec!["http://localhost:3000", "https://app.example.com"]
        );
    }

    #[test]
    fn config_json_uses_camel_case() {
        let value = serde_json::to_value(Config::default()).unwrap();
        assert!(value["ollama"].get("baseUrl").is_some());
        assert!(value["server"].get("maxRetries").is_some());
        assert!(value["server"].get("max_retries").is_none());
    }

    #[test]
    fn config_parses_partial_json() {
        let config: Config = serde_json::from_str(
            r#"{
                "provider": "grok",
                "grok": { "apiKey": "xai-123", "temperature": 0.5 }
            }"#,
        )
        .unwrap();
        assert_eq!(config.provider, Provider::Grok);
        assert_eq!(config.grok.api_key, "xai-123");
        assert_eq!(config.grok.temperature, 0.5);
        // Untouched sections keep defaults
        assert_eq!(config.ollama.model, "phi3:mini");
    }

    #[test]
    fn strictness_parses_from_config() {
        let config: Config = serde_json::from_str(
            r#"{ "gemini": { "strictness": "cautious" } }"#,
        )
        .unwrap();
        assert_eq!(config.gemini.strictness, Some(Strictness::Cautious));
    }
}
