//! LLM error types.
//!
//! Configuration errors raised while building the adapter, plus the transport
//! and vendor errors surfaced by a single call. Nothing here is retried by the
//! adapter; [`LLMError::is_retriable`] exists for callers that want to.

use std::fmt;
use std::time::Duration;

/// Errors that can occur in the provider adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LLMError {
    /// The specific error that occurred
    pub kind: LLMErrorKind,
}

/// Specific LLM error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LLMErrorKind {
    /// The credential required by the selected provider is not set
    MissingCredential {
        /// Name of the environment variable that should hold the credential
        env_var: String,
    },
    /// The provider selector names a provider this crate does not support
    UnsupportedProvider {
        /// The value that was supplied
        value: String,
    },
    /// Configuration error
    InvalidConfig {
        /// The configuration field that was invalid
        field: String,
        /// Why it was invalid
        reason: String,
    },
    /// Invalid request parameters
    InvalidRequest {
        /// Description of what was invalid
        reason: String,
    },
    /// Network error when communicating with the API
    Network {
        /// Description of the network error
        message: String,
    },
    /// Rate limit exceeded
    RateLimited {
        /// Time the vendor asked us to wait before retrying
        retry_after: Duration,
    },
    /// API returned an error response
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
        /// Error type from the API (if available)
        error_type: Option<String>,
    },
    /// Authentication failed
    AuthenticationFailed {
        /// Reason for authentication failure
        reason: String,
    },
    /// Model overloaded or unavailable
    ModelOverloaded {
        /// The model that was overloaded
        model: String,
    },
    /// Streaming error
    StreamError {
        /// Description of the streaming error
        message: String,
    },
    /// The vendor response did not have the expected shape
    ParseError {
        /// Description of the parse error
        message: String,
    },
    /// Request timeout
    Timeout {
        /// The timeout duration that was exceeded
        duration: Duration,
    },
}

impl LLMError {
    /// Creates a new LLMError with the given kind.
    #[must_use]
    pub fn new(kind: LLMErrorKind) -> Self {
        Self { kind }
    }

    /// Creates a missing credential error.
    #[must_use]
    pub fn missing_credential(env_var: impl Into<String>) -> Self {
        Self::new(LLMErrorKind::MissingCredential {
            env_var: env_var.into(),
        })
    }

    /// Creates an unsupported provider error.
    #[must_use]
    pub fn unsupported_provider(value: impl Into<String>) -> Self {
        Self::new(LLMErrorKind::UnsupportedProvider {
            value: value.into(),
        })
    }

    /// Creates an invalid config error.
    #[must_use]
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(LLMErrorKind::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        })
    }

    /// Creates an invalid request error.
    #[must_use]
    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self::new(LLMErrorKind::InvalidRequest {
            reason: reason.into(),
        })
    }

    /// Creates a network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(LLMErrorKind::Network {
            message: message.into(),
        })
    }

    /// Creates a rate limited error.
    #[must_use]
    pub fn rate_limited(retry_after: Duration) -> Self {
        Self::new(LLMErrorKind::RateLimited { retry_after })
    }

    /// Creates an API error.
    #[must_use]
    pub fn api_error(
        status_code: u16,
        message: impl Into<String>,
        error_type: Option<String>,
    ) -> Self {
        Self::new(LLMErrorKind::ApiError {
            status_code,
            message: message.into(),
            error_type,
        })
    }

    /// Creates an authentication failed error.
    #[must_use]
    pub fn authentication_failed(reason: impl Into<String>) -> Self {
        Self::new(LLMErrorKind::AuthenticationFailed {
            reason: reason.into(),
        })
    }

    /// Creates a model overloaded error.
    #[must_use]
    pub fn model_overloaded(model: impl Into<String>) -> Self {
        Self::new(LLMErrorKind::ModelOverloaded {
            model: model.into(),
        })
    }

    /// Creates a stream error.
    #[must_use]
    pub fn stream_error(message: impl Into<String>) -> Self {
        Self::new(LLMErrorKind::StreamError {
            message: message.into(),
        })
    }

    /// Creates a parse error.
    #[must_use]
    pub fn parse_error(message: impl Into<String>) -> Self {
        Self::new(LLMErrorKind::ParseError {
            message: message.into(),
        })
    }

    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(duration: Duration) -> Self {
        Self::new(LLMErrorKind::Timeout { duration })
    }

    /// Returns true if this error was raised while building the adapter.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self.kind,
            LLMErrorKind::MissingCredential { .. }
                | LLMErrorKind::UnsupportedProvider { .. }
                | LLMErrorKind::InvalidConfig { .. }
        )
    }

    /// Returns true if the request was rejected before any network activity.
    #[must_use]
    pub fn is_invalid_request(&self) -> bool {
        matches!(self.kind, LLMErrorKind::InvalidRequest { .. })
    }

    /// Returns true if this error is retriable.
    #[must_use]
    pub fn is_retriable(&self) -> bool {
        matches!(
            self.kind,
            LLMErrorKind::Network { .. }
                | LLMErrorKind::RateLimited { .. }
                | LLMErrorKind::ModelOverloaded { .. }
                | LLMErrorKind::Timeout { .. }
                | LLMErrorKind::ApiError {
                    status_code: 500..=599,
                    ..
                }
        )
    }

    /// Returns the retry-after duration if this is a rate limit error.
    #[must_use]
    pub fn retry_after(&self) -> Option<Duration> {
        match &self.kind {
            LLMErrorKind::RateLimited { retry_after } => Some(*retry_after),
            _ => None,
        }
    }
}

impl fmt::Display for LLMError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            LLMErrorKind::MissingCredential { env_var } => {
                write!(f, "{} not found in environment", env_var)
            }
            LLMErrorKind::UnsupportedProvider { value } => {
                write!(
                    f,
                    "unsupported AI provider: '{}'; expected one of: openai, anthropic, openrouter",
                    value
                )
            }
            LLMErrorKind::InvalidConfig { field, reason } => {
                write!(f, "invalid configuration for '{}': {}", field, reason)
            }
            LLMErrorKind::InvalidRequest { reason } => {
                write!(f, "invalid request: {}; check request parameters", reason)
            }
            LLMErrorKind::Network { message } => {
                write!(
                    f,
                    "network error communicating with LLM API: {}; check network connectivity",
                    message
                )
            }
            LLMErrorKind::RateLimited { retry_after } => {
                write!(
                    f,
                    "rate limit exceeded; retry after {} seconds",
                    retry_after.as_secs()
                )
            }
            LLMErrorKind::ApiError {
                status_code,
                message,
                error_type,
            } => {
                if let Some(error_type) = error_type {
                    write!(
                        f,
                        "API error (HTTP {}): {} (type: {})",
                        status_code, message, error_type
                    )
                } else {
                    write!(f, "API error (HTTP {}): {}", status_code, message)
                }
            }
            LLMErrorKind::AuthenticationFailed { reason } => {
                write!(
                    f,
                    "authentication failed: {}; verify API key is valid",
                    reason
                )
            }
            LLMErrorKind::ModelOverloaded { model } => {
                write!(
                    f,
                    "model '{}' is overloaded; retry after a short delay",
                    model
                )
            }
            LLMErrorKind::StreamError { message } => {
                write!(f, "streaming error: {}", message)
            }
            LLMErrorKind::ParseError { message } => {
                write!(f, "failed to parse API response: {}", message)
            }
            LLMErrorKind::Timeout { duration } => {
                write!(f, "request timed out after {} seconds", duration.as_secs())
            }
        }
    }
}

impl std::error::Error for LLMError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_credential_names_the_variable() {
        let error = LLMError::missing_credential("ANTHROPIC_API_KEY");

        assert_eq!(
            error.to_string(),
            "ANTHROPIC_API_KEY not found in environment"
        );
        assert!(error.is_configuration());
    }

    #[test]
    fn unsupported_provider_names_the_value() {
        let error = LLMError::unsupported_provider("cohere");

        let message = error.to_string();
        assert!(message.contains("'cohere'"));
        assert!(error.is_configuration());
    }

    #[test]
    fn invalid_request_is_not_configuration() {
        let error = LLMError::invalid_request("temperature out of range");

        assert!(error.is_invalid_request());
        assert!(!error.is_configuration());
    }

    #[test]
    fn api_error_with_type_display() {
        let error = LLMError::api_error(
            400,
            "invalid model parameter",
            Some("invalid_request_error".to_string()),
        );

        let message = error.to_string();
        assert!(message.contains("400"));
        assert!(message.contains("invalid model parameter"));
        assert!(message.contains("invalid_request_error"));
    }

    #[test]
    fn api_error_without_type_display() {
        let error = LLMError::api_error(500, "internal server error", None);

        let message = error.to_string();
        assert!(message.contains("500"));
        assert!(!message.contains("type:"));
    }

    #[test]
    fn rate_limited_error_display() {
        let error = LLMError::rate_limited(Duration::from_secs(30));

        let message = error.to_string();
        assert!(message.contains("rate limit"));
        assert!(message.contains("30"));
    }

    #[test]
    fn is_retriable_for_transient_errors() {
        assert!(LLMError::network("connection reset").is_retriable());
        assert!(LLMError::rate_limited(Duration::from_secs(10)).is_retriable());
        assert!(LLMError::api_error(503, "service unavailable", None).is_retriable());
        assert!(LLMError::model_overloaded("claude-sonnet-4-20250514").is_retriable());
        assert!(LLMError::timeout(Duration::from_secs(120)).is_retriable());
    }

    #[test]
    fn is_not_retriable_for_client_and_config_errors() {
        assert!(!LLMError::api_error(400, "bad request", None).is_retriable());
        assert!(!LLMError::authentication_failed("invalid key").is_retriable());
        assert!(!LLMError::missing_credential("OPENAI_API_KEY").is_retriable());
        assert!(!LLMError::parse_error("missing choices").is_retriable());
    }

    #[test]
    fn retry_after_only_for_rate_limited() {
        let error = LLMError::rate_limited(Duration::from_secs(60));
        assert_eq!(error.retry_after(), Some(Duration::from_secs(60)));
        assert_eq!(LLMError::network("refused").retry_after(), None);
    }
}
