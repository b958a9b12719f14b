//! Config loader — reads `~/.triage/config.json` and merges env vars.
//!
//! # Loading precedence
//! 1. Defaults (from `Config::default()`)
//! 2. JSON file at `~/.triage/config.json`
//! 3. Environment variables (override JSON):
//!    - `TRIAGE_<SECTION>__<FIELD>` (double underscore as delimiter),
//!      e.g. `TRIAGE_PROVIDER`, `TRIAGE_GEMINI__API_KEY`,
//!      `TRIAGE_OLLAMA__BASE_URL`, `TRIAGE_SERVER__MAX_RETRIES`
//!    - bare credential variables `GEMINI_API_KEY`, `GROK_API_KEY`,
//!      `HUGGINGFACE_API_KEY` as a fallback when no `TRIAGE_` override and
//!      no file value is present

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::schema::{Config, Provider, Strictness};

/// Default config file path.
pub fn get_config_path() -> PathBuf {
    crate::utils::get_data_path().join("config.json")
}

/// Load configuration from the default path + env vars.
///
/// Falls back to `Config::default()` if the file doesn't exist or can't be
/// parsed; configuration problems that must stop the process (a missing
/// credential for the selected provider) are detected later, when the
/// dispatcher is constructed.
pub fn load_config(path: Option<&Path>) -> Config {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);
    load_config_from_path(&config_path)
}

fn load_config_from_path(path: &Path) -> Config {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return apply_env_overrides(Config::default());
    }

    debug!("Loading config from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return apply_env_overrides(Config::default());
        }
    };

    let config: Config = match serde_json::from_str(&content) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to parse config JSON: {}", e);
            return apply_env_overrides(Config::default());
        }
    };

    apply_env_overrides(config)
}

/// Save configuration to disk (pretty-printed JSON with camelCase keys).
pub fn save_config(config: &Config, path: Option<&Path>) -> std::io::Result<()> {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(config)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    std::fs::write(&config_path, json)?;
    debug!("Config saved to {}", config_path.display());
    Ok(())
}

/// Apply environment variable overrides on top of a loaded config.
fn apply_env_overrides(mut config: Config) -> Config {
    // Provider selection
    if let Ok(val) = std::env::var("TRIAGE_PROVIDER") {
        match val.parse::<Provider>() {
            Ok(provider) => config.provider = provider,
            Err(e) => warn!("Ignoring TRIAGE_PROVIDER: {}", e),
        }
    }

    // Hosted providers: TRIAGE_<NAME>__API_KEY wins; bare <NAME>_API_KEY
    // fills in only when nothing else set a key.
    apply_hosted_env(
        "GEMINI",
        &mut config.gemini.api_key,
        &mut config.gemini.model,
        &mut config.gemini.temperature,
        &mut config.gemini.api_base,
        &mut config.gemini.strictness,
    );
    apply_hosted_env(
        "GROK",
        &mut config.grok.api_key,
        &mut config.grok.model,
        &mut config.grok.temperature,
        &mut config.grok.api_base,
        &mut config.grok.strictness,
    );
    apply_hosted_env(
        "HUGGINGFACE",
        &mut config.huggingface.api_key,
        &mut config.huggingface.model,
        &mut config.huggingface.temperature,
        &mut config.huggingface.api_base,
        &mut config.huggingface.strictness,
    );

    // Ollama
    if let Ok(val) = std::env::var("TRIAGE_OLLAMA__MODEL") {
        config.ollama.model = val;
    }
    if let Ok(val) = std::env::var("TRIAGE_OLLAMA__BASE_URL") {
        config.ollama.base_url = val;
    }
    if let Ok(val) = std::env::var("TRIAGE_OLLAMA__TEMPERATURE") {
        if let Ok(t) = val.parse::<f64>() {
            config.ollama.temperature = t;
        }
    }
    if let Ok(val) = std::env::var("TRIAGE_OLLAMA__STRICTNESS") {
        if let Some(s) = parse_strictness(&val) {
            config.ollama.strictness = Some(s);
        }
    }

    // Server
    if let Ok(val) = std::env::var("TRIAGE_SERVER__CORS_ORIGINS") {
        config.server.cors_origins = val;
    }
    if let Ok(val) = std::env::var("TRIAGE_SERVER__MAX_RETRIES") {
        if let Ok(n) = val.parse::<u32>() {
            config.server.max_retries = n;
        }
    }
    if let Ok(val) = std::env::var("TRIAGE_SERVER__REQUEST_TIMEOUT") {
        if let Ok(n) = val.parse::<u64>() {
            config.server.request_timeout = n;
        }
    }

    config
}

/// Apply env var overrides for one hosted provider section.
fn apply_hosted_env(
    name: &str,
    api_key: &mut String,
    model: &mut String,
    temperature: &mut f64,
    api_base: &mut Option<String>,
    strictness: &mut Option<Strictness>,
) {
    if let Ok(val) = std::env::var(format!("TRIAGE_{name}__API_KEY")) {
        *api_key = val;
    } else if api_key.is_empty() {
        if let Ok(val) = std::env::var(format!("{name}_API_KEY")) {
            *api_key = val;
        }
    }
    if let Ok(val) = std::env::var(format!("TRIAGE_{name}__MODEL")) {
        *model = val;
    }
    if let Ok(val) = std::env::var(format!("TRIAGE_{name}__TEMPERATURE")) {
        if let Ok(t) = val.parse::<f64>() {
            *temperature = t;
        }
    }
    if let Ok(val) = std::env::var(format!("TRIAGE_{name}__API_BASE")) {
        *api_base = Some(val);
    }
    if let Ok(val) = std::env::var(format!("TRIAGE_{name}__STRICTNESS")) {
        if let Some(s) = parse_strictness(&val) {
            *strictness = Some(s);
        }
    }
}

fn parse_strictness(val: &str) -> Option<Strictness> {
    match val.trim().to_lowercase().as_str() {
        "confident" => Some(Strictness::Confident),
        "cautious" => Some(Strictness::Cautious),
        other => {
            warn!("Ignoring unknown strictness '{}'", other);
            None
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    // Env vars are process-global; serialize every test that reads or
    // writes them.
    static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

    fn write_temp_json(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_missing_file() {
        let _guard = ENV_LOCK.lock().unwrap();
        let config = load_config_from_path(Path::new("/nonexistent/path/config.json"));
        assert_eq!(config.provider, Provider::Ollama);
        assert_eq!(config.server.max_retries, 3);
    }

    #[test]
    fn test_load_valid_json() {
        let _guard = ENV_LOCK.lock().unwrap();
        let file = write_temp_json(
            r#"{
            "provider": "huggingface",
            "huggingface": {
                "apiKey": "hf_abc",
                "model": "mistralai/Mistral-7B-Instruct-v0.3"
            }
        }"#,
        );

        let config = load_config_from_path(file.path());
        assert_eq!(config.provider, Provider::HuggingFace);
        assert_eq!(config.huggingface.api_key, "hf_abc");
        assert_eq!(config.huggingface.model, "mistralai/Mistral-7B-Instruct-v0.3");
        // Default preserved
        assert_eq!(config.huggingface.temperature, 0.3);
    }

    #[test]
    fn test_load_invalid_json_returns_defaults() {
        let _guard = ENV_LOCK.lock().unwrap();
        let file = write_temp_json("not valid json {{{");
        let config = load_config_from_path(file.path());
        assert_eq!(config.provider, Provider::Ollama);
    }

    #[test]
    fn test_load_empty_json() {
        let _guard = ENV_LOCK.lock().unwrap();
        let file = write_temp_json("{}");
        let config = load_config_from_path(file.path());
        assert_eq!(config.ollama.model, "phi3:mini");
    }

    #[test]
    fn test_save_and_reload() {
        let _guard = ENV_LOCK.lock().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = Config::default();
        config.provider = Provider::Grok;
        config.grok.api_key = "xai-test".to_string();

        save_config(&config, Some(&path)).unwrap();

        let reloaded = load_config_from_path(&path);
        assert_eq!(reloaded.provider, Provider::Grok);
        assert_eq!(reloaded.grok.api_key, "xai-test");
    }

    #[test]
    fn test_env_override_provider() {
        let _guard = ENV_LOCK.lock().unwrap();
        // Both cases in one test: TRIAGE_PROVIDER is process-global state.
        std::env::set_var("TRIAGE_PROVIDER", "gemini");
        let config = apply_env_overrides(Config::default());
        assert_eq!(config.provider, Provider::Gemini);

        std::env::set_var("TRIAGE_PROVIDER", "skynet");
        let config = apply_env_overrides(Config::default());
        assert_eq!(config.provider, Provider::Ollama);
        std::env::remove_var("TRIAGE_PROVIDER");
    }

    #[test]
    fn test_env_override_api_key() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::set_var("TRIAGE_GROK__API_KEY", "xai-env");
        let config = apply_env_overrides(Config::default());
        assert_eq!(config.grok.api_key, "xai-env");
        std::env::remove_var("TRIAGE_GROK__API_KEY");
    }

    #[test]
    fn test_bare_credential_fallback() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::set_var("HUGGINGFACE_API_KEY", "hf_bare");
        let config = apply_env_overrides(Config::default());
        assert_eq!(config.huggingface.api_key, "hf_bare");
        std::env::remove_var("HUGGINGFACE_API_KEY");
    }

    #[test]
    fn test_env_override_ollama_base_url() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::set_var("TRIAGE_OLLAMA__BASE_URL", "http://gpu-box:11434");
        let config = apply_env_overrides(Config::default());
        assert_eq!(config.ollama.base_url, "http://gpu-box:11434");
        std::env::remove_var("TRIAGE_OLLAMA__BASE_URL");
    }

    #[test]
    fn test_env_override_server_settings() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::set_var("TRIAGE_SERVER__MAX_RETRIES", "5");
        std::env::set_var("TRIAGE_SERVER__REQUEST_TIMEOUT", "60");
        let config = apply_env_overrides(Config::default());
        assert_eq!(config.server.max_retries, 5);
        assert_eq!(config.server.request_timeout, 60);
        std::env::remove_var("TRIAGE_SERVER__MAX_RETRIES");
        std::env::remove_var("TRIAGE_SERVER__REQUEST_TIMEOUT");
    }

    #[test]
    fn test_env_override_strictness() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::set_var("TRIAGE_GEMINI__STRICTNESS", "cautious");
        let config = apply_env_overrides(Config::default());
        assert_eq!(config.gemini.strictness, Some(Strictness::Cautious));
        std::env::remove_var("TRIAGE_GEMINI__STRICTNESS");
    }

}
