//! Triage CLI — entry point.
//!
//! # Commands
//!
//! - `triage analyze -m MESSAGE -t TYPE [-s STACK] [-c CONTEXT]` — analyze
//!   one error and print the diagnostic report
//! - `triage status` — show configuration and backend status

mod helpers;
mod status;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use triage_core::config::load_config;
use triage_core::AnalysisRequest;
use triage_providers::Dispatcher;

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// 🔎 Triage — AI-powered error analysis
#[derive(Parser)]
#[command(name = "triage", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze an error and print a diagnostic report
    Analyze {
        /// The error message
        #[arg(short, long)]
        message: String,

        /// Type of error (e.g. TypeError, NetworkError)
        #[arg(short = 't', long)]
        error_type: String,

        /// Stack trace, if available
        #[arg(short, long)]
        stack_trace: Option<String>,

        /// Additional context (environment, code, payload)
        #[arg(short, long)]
        context: Option<String>,

        /// Print the raw JSON result instead of the formatted report
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// Show configuration and backend status
    Status {
        /// Print the health report as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            message,
            error_type,
            stack_trace,
            context,
            json,
            logs,
        } => {
            init_logging(logs);
            run_analyze(message, error_type, stack_trace, context, json).await
        }
        Commands::Status { json } => {
            init_logging(false);
            status::run(json).await
        }
    }
}

// ─────────────────────────────────────────────
// Analyze command
// ─────────────────────────────────────────────

async fn run_analyze(
    message: String,
    error_type: String,
    stack_trace: Option<String>,
    context: Option<String>,
    json: bool,
) -> Result<()> {
    let config = load_config(None);

    // Fail-fast: a missing credential for the selected provider is a startup
    // error, not something to limp past.
    let dispatcher = Dispatcher::from_config(&config)
        .context("failed to initialize the analysis backend")?;

    let mut request = AnalysisRequest::new(message, error_type);
    if let Some(stack_trace) = stack_trace {
        request = request.with_stack_trace(stack_trace);
    }
    if let Some(context) = context {
        request = request.with_context(context);
    }

    info!(error_type = %request.error_type, "analyzing error");
    let result = dispatcher
        .analyze(&request)
        .await
        .context("analysis failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        helpers::print_result(&result);
    }

    Ok(())
}

/// Initialize tracing/logging.
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("triage=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
