//! Constants for the Responses wire format and runner defaults
//!
//! This module defines string constants used throughout the application for
//! output item types, content types, response statuses and default values.

/// Output item type constants
pub mod item {
    /// Assistant message item
    pub const MESSAGE: &str = "message";
}

/// Content part type constants
pub mod content {
    /// Generated text content type
    pub const OUTPUT_TEXT: &str = "output_text";

    /// Refusal content type
    pub const REFUSAL: &str = "refusal";
}

/// Response status constants
pub mod status {
    /// Generation completed
    pub const COMPLETED: &str = "completed";

    /// Generation failed; `error` is populated
    pub const FAILED: &str = "failed";
}

/// Default configuration values
pub mod defaults {
    /// Default service base URL
    pub const BASE_URL: &str = "https://api.openai.com/v1";

    /// Default model identifier
    pub const MODEL: &str = "gpt-4o-mini";

    /// Default system instruction
    pub const INSTRUCTIONS: &str = "You are good at telling jokes.";

    /// Default user input
    pub const INPUT: &str = "Tell me a joke about a pirate.";

    /// Default log level
    pub const LOG_LEVEL: &str = "info";

    /// Config file looked up in the working directory
    pub const CONFIG_FILE: &str = "config.toml";
}

/// Environment variable names
pub mod env {
    pub const CONFIG_PATH: &str = "CONFIG_PATH";
    pub const API_KEY: &str = "OPENAI_API_KEY";
    pub const BASE_URL: &str = "OPENAI_BASE_URL";
    pub const MODEL: &str = "OPENAI_MODEL";
    pub const INSTRUCTIONS: &str = "PROMPT_INSTRUCTIONS";
    pub const INPUT: &str = "PROMPT_INPUT";
    pub const REQUEST_TIMEOUT: &str = "REQUEST_TIMEOUT";
    pub const LOG_LEVEL: &str = "LOG_LEVEL";
}
