//! Logging configuration and initialization
//!
//! This module sets up the tracing subscriber for structured logging. All
//! records go to stderr; stdout is reserved for the generated text.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Normalize a configured log level into a filter directive
///
/// Only the first word is considered so trailing comments are tolerated.
/// "warning" maps to "warn", "critical" to "error", anything unknown to "info".
fn normalize_level(log_level: &str) -> &'static str {
    let level = log_level
        .split_whitespace()
        .next()
        .unwrap_or("info")
        .to_lowercase();

    match level.as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "info" => "info",
        "warn" | "warning" => "warn",
        "error" | "critical" => "error",
        _ => "info",
    }
}

/// Initialize the logging system with the specified level
///
/// `RUST_LOG` takes precedence over the configured level when set.
///
/// # Arguments
///
/// * `log_level` - The log level string (debug, info, warning, error, critical)
pub fn init_logging(log_level: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(normalize_level(log_level)));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
