//! Responses Runner
//!
//! Sends a single system instruction and user input to an OpenAI-compatible
//! Responses endpoint and prints the generated text to stdout.

mod core;
mod models;

use crate::core::config::Config;
use crate::core::logging::init_logging;
use crate::core::providers::OpenAIProvider;
use crate::core::runner::{RequestParams, RunError, run};
use tracing::error;

#[tokio::main]
async fn main() {
    // Check for --help flag
    if std::env::args().any(|arg| arg == "--help") {
        print_help();
        return;
    }

    // A missing .env file is fine; the environment may already be populated
    dotenv::dotenv().ok();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration Error: {:#}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config.log_level);

    let provider = match OpenAIProvider::new(
        config.api_key.clone(),
        config.base_url.clone(),
        config.request_timeout,
    ) {
        Ok(provider) => provider,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let params = RequestParams::from(&config);
    let mut stdout = std::io::stdout();

    if let Err(e) = run(&provider, &params, &mut stdout).await {
        match &e {
            RunError::Provider(err) => {
                error!(kind = ?err.kind(), "Request to {} failed: {:?}", config.base_url, err)
            }
            RunError::Output(err) => error!("Failed to write output: {}", err),
        }
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print help message
fn print_help() {
    println!("Responses Runner v0.1.0");
    println!();
    println!("Usage: responses-runner [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --help    Display this help message");
    println!();
    println!("Environment variables (also read from .env):");
    println!("  OPENAI_API_KEY - Your API key (required)");
    println!("  OPENAI_BASE_URL - API base URL (default: https://api.openai.com/v1)");
    println!("  OPENAI_MODEL - Model identifier (default: gpt-4o-mini)");
    println!("  PROMPT_INSTRUCTIONS - System instruction (default: You are good at telling jokes.)");
    println!("  PROMPT_INPUT - User input (default: Tell me a joke about a pirate.)");
    println!("  REQUEST_TIMEOUT - Request timeout in seconds (default: none)");
    println!("  LOG_LEVEL - Logging level, written to stderr (default: info)");
    println!("  CONFIG_PATH - TOML config file (default: ./config.toml if present)");
}
