//! Provider abstraction for the generation API
//!
//! This module defines the trait the runner talks to and the error types a
//! provider can fail with.

use crate::models::openai::{OpenAIResponse, OpenAIResponseRequest};
use async_trait::async_trait;
use thiserror::Error;

/// Error types for provider operations
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Response failed ({code}): {message}")]
    ResponseFailed { code: String, message: String },

    #[error("Unexpected response shape: {0}")]
    ResponseShape(String),
}

/// Coarse failure classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The network call could not complete
    Transport,
    /// The credential was rejected
    Authentication,
    /// The service refused or failed the request
    Service,
    /// The service answered with something other than output text
    ResponseShape,
}

impl ProviderError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProviderError::Transport(_) => ErrorKind::Transport,
            ProviderError::Authentication(_) => ErrorKind::Authentication,
            ProviderError::RateLimit(_)
            | ProviderError::BadRequest(_)
            | ProviderError::ApiError { .. }
            | ProviderError::ResponseFailed { .. } => ErrorKind::Service,
            ProviderError::ResponseShape(_) => ErrorKind::ResponseShape,
        }
    }
}

/// Trait for generation API providers
#[async_trait]
pub trait Provider: Send + Sync {
    /// Send a single response creation request
    async fn create_response(
        &self,
        request: &OpenAIResponseRequest,
    ) -> Result<OpenAIResponse, ProviderError>;

    /// Get the provider name
    fn provider_name(&self) -> &str;

    /// Base URL requests are sent to
    fn endpoint(&self) -> &str;
}
