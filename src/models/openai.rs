//! OpenAI Responses API data models
//!
//! This module defines the request and response structures for the
//! `/responses` endpoint, plus the error envelope the API returns on
//! non-success status codes.

use crate::core::constants::{content, item};
use serde::{Deserialize, Serialize};

/// OpenAI response creation request
#[derive(Debug, Clone, Serialize)]
pub struct OpenAIResponseRequest {
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    pub input: String,
}

/// OpenAI response object
///
/// Only `output` is needed to produce text; every other field is optional so
/// compatible services that format metadata differently still parse.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAIResponse {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub object: Option<String>,
    #[serde(default)]
    pub created_at: Option<serde_json::Number>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub error: Option<OpenAIResponseError>,
    #[serde(default)]
    pub output: Vec<OpenAIOutputItem>,
    #[serde(default)]
    pub usage: Option<OpenAIResponseUsage>,
}

impl OpenAIResponse {
    /// Aggregate the text of every `output_text` part of every message item.
    ///
    /// Returns `None` when the response carries no output text at all, which
    /// is distinct from a model that legitimately answered with `""`.
    pub fn output_text(&self) -> Option<String> {
        let mut parts = self
            .output
            .iter()
            .filter(|output| output.item_type == item::MESSAGE)
            .flat_map(|output| output.content.iter())
            .filter(|part| part.content_type == content::OUTPUT_TEXT)
            .filter_map(|part| part.text.as_deref())
            .peekable();

        parts.peek()?;
        Some(parts.collect())
    }
}

/// Item in the `output` array
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAIOutputItem {
    #[serde(default, rename = "type")]
    pub item_type: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub content: Vec<OpenAIOutputContent>,
}

/// Content part of a message output item
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAIOutputContent {
    #[serde(default, rename = "type")]
    pub content_type: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub refusal: Option<String>,
}

/// Error attached to a response whose generation failed
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAIResponseError {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// OpenAI Responses usage statistics
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OpenAIResponseUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub total_tokens: u64,
}

/// Error envelope returned with non-success status codes
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAIErrorEnvelope {
    pub error: OpenAIErrorDetail,
}

/// Body of the error envelope
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAIErrorDetail {
    pub message: String,
    #[serde(default, rename = "type")]
    pub error_type: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}
