//! OpenAI provider implementation

use crate::core::constants::{content, status};
use crate::core::provider::{Provider, ProviderError};
use crate::models::openai::{OpenAIErrorEnvelope, OpenAIResponse, OpenAIResponseRequest};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use tracing::{debug, warn};

/// OpenAI provider (any OpenAI-compatible Responses endpoint)
pub struct OpenAIProvider {
    client: Client,
    api_key: SecretString,
    base_url: String,
}

impl OpenAIProvider {
    /// Create a new OpenAI provider
    ///
    /// # Arguments
    ///
    /// * `api_key` - OpenAI API key
    /// * `base_url` - API base URL, without the `/responses` suffix
    /// * `timeout` - Optional request timeout in seconds; `None` waits indefinitely
    pub fn new(
        api_key: SecretString,
        base_url: String,
        timeout: Option<u64>,
    ) -> Result<Self, ProviderError> {
        let mut builder = Client::builder();
        if let Some(secs) = timeout {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| ProviderError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn responses_url(&self) -> String {
        format!("{}/responses", self.base_url)
    }

    /// Pull the message out of an OpenAI error envelope, falling back to the raw body
    fn error_message(body: &str) -> String {
        match serde_json::from_str::<OpenAIErrorEnvelope>(body) {
            Ok(envelope) => match envelope.error.code.or(envelope.error.error_type) {
                Some(code) => format!("{} ({})", envelope.error.message, code),
                None => envelope.error.message,
            },
            Err(_) if body.trim().is_empty() => "Unknown error".to_string(),
            Err(_) => body.to_string(),
        }
    }

    /// Classify OpenAI errors and provide helpful messages
    fn classify_error(error_detail: &str) -> String {
        let error_lower = error_detail.to_lowercase();

        if error_lower.contains("unsupported_country_region_territory")
            || error_lower.contains("country, region, or territory not supported")
        {
            return "OpenAI API is not available in your region. Consider using a different endpoint via OPENAI_BASE_URL.".to_string();
        }

        if error_lower.contains("invalid_api_key")
            || error_lower.contains("incorrect api key")
            || error_lower.contains("unauthorized")
        {
            return "Invalid API key. Please check your OPENAI_API_KEY configuration.".to_string();
        }

        if error_lower.contains("rate_limit") || error_lower.contains("quota") {
            return "Rate limit exceeded. Please wait and try again, or upgrade your API plan."
                .to_string();
        }

        if error_lower.contains("model")
            && (error_lower.contains("not found") || error_lower.contains("does not exist"))
        {
            return format!(
                "Model not found. Please check your OPENAI_MODEL configuration. ({})",
                error_detail
            );
        }

        if error_lower.contains("billing") || error_lower.contains("payment") {
            return "Billing issue. Please check your OpenAI account billing status.".to_string();
        }

        error_detail.to_string()
    }

    /// Turn a successfully received body into a response with output text
    fn check_response(body: &str) -> Result<OpenAIResponse, ProviderError> {
        let response: OpenAIResponse = serde_json::from_str(body).map_err(|e| {
            ProviderError::ResponseShape(format!("Failed to parse response: {}", e))
        })?;

        if let Some(error) = &response.error {
            return Err(ProviderError::ResponseFailed {
                code: error.code.clone().unwrap_or_else(|| "unknown".to_string()),
                message: error
                    .message
                    .clone()
                    .unwrap_or_else(|| "Response failed without a message".to_string()),
            });
        }
        if response.status.as_deref() == Some(status::FAILED) {
            return Err(ProviderError::ResponseFailed {
                code: "unknown".to_string(),
                message: format!("Response {} failed without an error", response.id),
            });
        }

        if response.output_text().is_none() {
            let refusal = response
                .output
                .iter()
                .flat_map(|item| item.content.iter())
                .find(|part| part.content_type == content::REFUSAL)
                .and_then(|part| part.refusal.clone());
            return Err(ProviderError::ResponseShape(match refusal {
                Some(refusal) => format!("Response contains a refusal instead of text: {}", refusal),
                None => format!("Response {} contains no output text", response.id),
            }));
        }

        if let Some(state) = response.status.as_deref() {
            if state != status::COMPLETED {
                warn!("Response {} finished with status {}", response.id, state);
            }
        }

        Ok(response)
    }
}

#[async_trait]
impl Provider for OpenAIProvider {
    async fn create_response(
        &self,
        request: &OpenAIResponseRequest,
    ) -> Result<OpenAIResponse, ProviderError> {
        let url = self.responses_url();
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(request)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Transport(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            let classified_error = Self::classify_error(&Self::error_message(&body));

            return Err(match status.as_u16() {
                401 | 403 => ProviderError::Authentication(classified_error),
                429 => ProviderError::RateLimit(classified_error),
                400 | 404 | 422 => ProviderError::BadRequest(classified_error),
                _ => ProviderError::ApiError {
                    status: status.as_u16(),
                    message: classified_error,
                },
            });
        }

        Self::check_response(&body)
    }

    fn provider_name(&self) -> &str {
        "OpenAI"
    }

    fn endpoint(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::provider::ErrorKind;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> OpenAIResponseRequest {
        OpenAIResponseRequest {
            model: "gpt-4o-mini".to_string(),
            instructions: Some("You are good at telling jokes.".to_string()),
            input: "Tell me a joke about a pirate.".to_string(),
        }
    }

    fn provider_for(server: &MockServer) -> OpenAIProvider {
        OpenAIProvider::new(
            SecretString::from("sk-test".to_string()),
            format!("{}/v1/", server.uri()),
            Some(5),
        )
        .unwrap()
    }

    fn completed_body(text: &str) -> serde_json::Value {
        json!({
            "id": "resp_abc",
            "object": "response",
            "created_at": 1741476542,
            "status": "completed",
            "error": null,
            "model": "gpt-4o-mini-2024-07-18",
            "output": [{
                "type": "message",
                "id": "msg_abc",
                "status": "completed",
                "role": "assistant",
                "content": [{"type": "output_text", "text": text, "annotations": []}]
            }],
            "usage": {"input_tokens": 24, "output_tokens": 18, "total_tokens": 42}
        })
    }

    async fn mount_status(server: &MockServer, template: ResponseTemplate) {
        Mock::given(method("POST"))
            .and(path("/v1/responses"))
            .respond_with(template)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_create_response_sends_expected_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/responses"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_json(json!({
                "model": "gpt-4o-mini",
                "instructions": "You are good at telling jokes.",
                "input": "Tell me a joke about a pirate."
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completed_body("Arr!")))
            .expect(1)
            .mount(&server)
            .await;

        let response = provider_for(&server)
            .create_response(&request())
            .await
            .unwrap();
        assert_eq!(response.output_text().as_deref(), Some("Arr!"));
        assert_eq!(response.id, "resp_abc");
    }

    #[tokio::test]
    async fn test_unauthorized_is_authentication_error() {
        let server = MockServer::start().await;
        mount_status(
            &server,
            ResponseTemplate::new(401).set_body_json(json!({
                "error": {
                    "message": "Incorrect API key provided: sk-test.",
                    "type": "invalid_request_error",
                    "param": null,
                    "code": "invalid_api_key"
                }
            })),
        )
        .await;

        let err = provider_for(&server)
            .create_response(&request())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authentication);
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[tokio::test]
    async fn test_rate_limit_is_service_error() {
        let server = MockServer::start().await;
        mount_status(
            &server,
            ResponseTemplate::new(429).set_body_json(json!({
                "error": {"message": "Rate limit reached", "type": "requests", "code": "rate_limit_exceeded"}
            })),
        )
        .await;

        let err = provider_for(&server)
            .create_response(&request())
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::RateLimit(_)));
        assert_eq!(err.kind(), ErrorKind::Service);
    }

    #[tokio::test]
    async fn test_unknown_model_is_bad_request() {
        let server = MockServer::start().await;
        mount_status(
            &server,
            ResponseTemplate::new(404).set_body_json(json!({
                "error": {
                    "message": "The model `gpt-9` does not exist or you do not have access to it.",
                    "type": "invalid_request_error",
                    "code": "model_not_found"
                }
            })),
        )
        .await;

        let err = provider_for(&server)
            .create_response(&request())
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::BadRequest(ref msg) if msg.starts_with("Model not found")));
    }

    #[tokio::test]
    async fn test_server_error_keeps_raw_body() {
        let server = MockServer::start().await;
        mount_status(&server, ResponseTemplate::new(502).set_body_string("bad gateway")).await;

        let err = provider_for(&server)
            .create_response(&request())
            .await
            .unwrap_err();
        match err {
            ProviderError::ApiError { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "bad gateway");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_failed_response_is_service_error() {
        let server = MockServer::start().await;
        mount_status(
            &server,
            ResponseTemplate::new(200).set_body_json(json!({
                "id": "resp_failed",
                "object": "response",
                "status": "failed",
                "error": {"code": "server_error", "message": "The model crashed."},
                "output": []
            })),
        )
        .await;

        let err = provider_for(&server)
            .create_response(&request())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ProviderError::ResponseFailed { ref code, .. } if code == "server_error"
        ));
        assert_eq!(err.kind(), ErrorKind::Service);
    }

    #[tokio::test]
    async fn test_loose_metadata_still_yields_text() {
        let server = MockServer::start().await;
        mount_status(
            &server,
            ResponseTemplate::new(200).set_body_json(json!({
                "id": "resp_relay",
                "created_at": 1741476542.25,
                "output": [{
                    "type": "message",
                    "content": [{"type": "output_text", "text": "Arr"}]
                }],
                "usage": {"input_tokens": 3, "output_tokens": 2}
            })),
        )
        .await;

        let response = provider_for(&server)
            .create_response(&request())
            .await
            .unwrap();
        assert_eq!(response.output_text().as_deref(), Some("Arr"));
    }

    #[tokio::test]
    async fn test_endpoint_is_trimmed_base_url() {
        let server = MockServer::start().await;
        let provider = provider_for(&server);
        assert_eq!(provider.endpoint(), format!("{}/v1", server.uri()));
    }

    #[tokio::test]
    async fn test_missing_output_text_is_shape_error() {
        let server = MockServer::start().await;
        mount_status(
            &server,
            ResponseTemplate::new(200).set_body_json(json!({
                "id": "resp_empty",
                "object": "response",
                "status": "completed",
                "output": []
            })),
        )
        .await;

        let err = provider_for(&server)
            .create_response(&request())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ResponseShape);
    }

    #[tokio::test]
    async fn test_non_json_body_is_shape_error() {
        let server = MockServer::start().await;
        mount_status(&server, ResponseTemplate::new(200).set_body_string("<html>ok</html>")).await;

        let err = provider_for(&server)
            .create_response(&request())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ResponseShape);
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        // Nothing listens on port 1.
        let provider = OpenAIProvider::new(
            SecretString::from("sk-test".to_string()),
            "http://127.0.0.1:1/v1".to_string(),
            Some(5),
        )
        .unwrap();

        let err = provider.create_response(&request()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[test]
    fn test_error_message_from_envelope() {
        let body = r#"{"error":{"message":"You exceeded your current quota","type":"insufficient_quota","code":"insufficient_quota"}}"#;
        assert_eq!(
            OpenAIProvider::error_message(body),
            "You exceeded your current quota (insufficient_quota)"
        );
        assert_eq!(OpenAIProvider::error_message("  "), "Unknown error");
    }

    #[test]
    fn test_classify_error() {
        assert_eq!(
            OpenAIProvider::classify_error("You exceeded your current quota"),
            "Rate limit exceeded. Please wait and try again, or upgrade your API plan."
        );
        assert_eq!(OpenAIProvider::classify_error("something odd"), "something odd");
    }
}
