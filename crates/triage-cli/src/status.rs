//! `triage status` — show configuration and backend status.

use anyhow::Result;
use colored::Colorize;

use triage_core::config::{get_config_path, load_config};
use triage_core::Provider;
use triage_providers::Dispatcher;

/// Run the status command.
pub async fn run(json: bool) -> Result<()> {
    let config = load_config(None);
    let config_path = get_config_path();

    // A missing credential should still produce a status report, just one
    // that says the service would refuse to start.
    let (dispatcher, startup_error) = match Dispatcher::from_config(&config) {
        Ok(d) => (d, None),
        Err(e) => (Dispatcher::uninitialized(), Some(e)),
    };

    let health = dispatcher.health(env!("CARGO_PKG_VERSION")).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&health)?);
        return Ok(());
    }

    crate::helpers::print_banner();

    let config_exists = config_path.exists();
    println!(
        "  {:<14} {} {}",
        "Config:".bold(),
        config_path.display(),
        if config_exists {
            "✓".green().to_string()
        } else {
            "(not found, using defaults)".dimmed().to_string()
        }
    );

    println!("  {:<14} {}", "Provider:".bold(), config.provider);

    let model = match config.provider {
        Provider::Gemini => &config.gemini.model,
        Provider::Grok => &config.grok.model,
        Provider::HuggingFace => &config.huggingface.model,
        Provider::Ollama => &config.ollama.model,
    };
    println!("  {:<14} {}", "Model:".bold(), model);

    if config.provider == Provider::Ollama {
        println!("  {:<14} {}", "Base URL:".bold(), config.ollama.base_url);
    }

    let backend_status = if let Some(e) = &startup_error {
        format!("{} {}", "✗".red(), e).red().to_string()
    } else if health.configured {
        format!("{} ready", "✓".green())
    } else {
        format!("{}", "· not reachable".dimmed())
    };
    println!("  {:<14} {}", "Backend:".bold(), backend_status);

    println!(
        "  {:<14} {}",
        "Retries:".bold(),
        format!(
            "{} (timeout: {}s)",
            config.server.max_retries, config.server.request_timeout
        )
        .dimmed()
    );

    println!();
    Ok(())
}
