//! Request runner
//!
//! Sends one response request through a [`Provider`] and writes the output
//! text to a sink. There is no retry and no local recovery: any failure is
//! returned to the caller untouched and nothing is written.

use crate::core::config::Config;
use crate::core::provider::{Provider, ProviderError};
use crate::models::openai::OpenAIResponseRequest;
use std::io::Write;
use thiserror::Error;
use tracing::{debug, info};

/// Errors surfaced by a run
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

/// Per-run request parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestParams {
    pub model: String,
    pub instructions: String,
    pub input: String,
}

impl From<&Config> for RequestParams {
    fn from(config: &Config) -> Self {
        Self {
            model: config.model.clone(),
            instructions: config.instructions.clone(),
            input: config.input.clone(),
        }
    }
}

impl RequestParams {
    fn to_request(&self) -> OpenAIResponseRequest {
        OpenAIResponseRequest {
            model: self.model.clone(),
            instructions: Some(self.instructions.clone()),
            input: self.input.clone(),
        }
    }
}

/// Send the request and write the output text plus a newline to `out`
///
/// Returns the output text that was written.
pub async fn run<W: Write>(
    provider: &dyn Provider,
    params: &RequestParams,
    out: &mut W,
) -> Result<String, RunError> {
    info!(
        "Sending request to {} at {} (model: {})",
        provider.provider_name(),
        provider.endpoint(),
        params.model
    );

    let response = provider.create_response(&params.to_request()).await?;
    let text = response.output_text().ok_or_else(|| {
        ProviderError::ResponseShape(format!("Response {} contains no output text", response.id))
    })?;

    debug!("Received response {} (status: {:?})", response.id, response.status);
    if let Some(usage) = &response.usage {
        debug!(
            "Token usage: input={}, output={}, total={}",
            usage.input_tokens, usage.output_tokens, usage.total_tokens
        );
    }

    writeln!(out, "{}", text)?;
    out.flush()?;

    Ok(text)
}
