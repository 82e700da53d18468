//! LLM client trait abstraction.
//!
//! This module defines the `LLMClient` trait, the seam between the provider
//! adapter and the two vendor wire families. Each implementation owns the
//! translation of a [`CompletionRequest`] into its family's request shape and
//! of the family's response back into a [`CompletionResult`].

use crate::llm::error::LLMError;
use crate::llm::models::ModelInfo;
use crate::llm::request::{CompletionRequest, CompletionResult, TextStream};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

/// Seconds to wait when a 429 response carries no usable `retry-after` header.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Trait for LLM API clients.
///
/// Implementations make at most one HTTP attempt per call and never retry.
///
/// # Example
///
/// ```ignore
/// use liquidbooks_ai::llm::{AnthropicClient, CompletionRequest, LLMClient, ProviderConfig};
/// use liquidbooks_ai::messages::Message;
///
/// let client = AnthropicClient::new(ProviderConfig::anthropic("sk-ant-..."))?;
/// let request = CompletionRequest::new(vec![Message::user("Hello!")]);
/// let result = client.complete(&request).await?;
/// ```
#[async_trait]
pub trait LLMClient: Send + Sync + std::fmt::Debug {
    /// Sends a non-streaming request and returns the full generated text.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport fails, the vendor rejects the call,
    /// or the vendor response does not have the expected shape.
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResult, LLMError>;

    /// Sends a streaming request and returns the generated text as chunks.
    ///
    /// # Errors
    ///
    /// Returns an error if the stream cannot be opened. Failures after the
    /// stream has started are yielded as stream items.
    async fn complete_stream(&self, request: &CompletionRequest) -> Result<TextStream, LLMError>;

    /// Lists the models the configured credential can use.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport fails, the vendor rejects the call,
    /// or the listing cannot be decoded.
    async fn list_models(&self) -> Result<Vec<ModelInfo>, LLMError>;

    /// Returns the name of this provider for logging.
    fn provider_name(&self) -> &'static str;
}

/// Error body shared by both families: `{"error": {"type": ..., "message": ...}}`.
#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(rename = "type", default)]
    error_type: Option<String>,
    #[serde(default)]
    message: String,
}

/// Decodes a non-2xx vendor response into an [`LLMError`].
///
/// The vendor's status code, error type and message are carried through
/// verbatim; only rate limiting, authentication and overload get their own
/// kinds so callers can branch on them.
pub(crate) async fn parse_error_response(response: reqwest::Response, model: &str) -> LLMError {
    let status = response.status();
    let status_code = status.as_u16();

    if status_code == 429 {
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_RETRY_AFTER_SECS);

        return LLMError::rate_limited(Duration::from_secs(retry_after));
    }

    let error_body = response.text().await.unwrap_or_default();
    error_from_body(status, &error_body, model)
}

fn error_from_body(status: reqwest::StatusCode, body: &str, model: &str) -> LLMError {
    let status_code = status.as_u16();

    match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(api_error) => {
            let detail = api_error.error;
            match detail.error_type.as_deref() {
                Some("authentication_error" | "invalid_api_key") => {
                    LLMError::authentication_failed(detail.message)
                }
                Some("overloaded_error") => LLMError::model_overloaded(model),
                _ if status_code == 401 => LLMError::authentication_failed(detail.message),
                _ => LLMError::api_error(status_code, detail.message, detail.error_type),
            }
        }
        Err(_) => LLMError::api_error(
            status_code,
            if body.is_empty() {
                status.canonical_reason().unwrap_or("Unknown error")
            } else {
                body
            },
            None,
        ),
    }
}

/// Maps a transport failure to an [`LLMError`].
pub(crate) fn map_reqwest_error(error: reqwest::Error, timeout: Duration) -> LLMError {
    if error.is_timeout() {
        LLMError::timeout(timeout)
    } else if error.is_connect() {
        LLMError::network(format!("connection failed: {}", error))
    } else {
        LLMError::network(error.to_string())
    }
}

/// Builds the shared HTTP client with the configured timeout.
pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::Client, LLMError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| LLMError::network(format!("failed to create HTTP client: {}", e)))
}
