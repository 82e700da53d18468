//! Crate-level error type.
//!
//! Provider calls return [`LLMError`](crate::llm::LLMError) directly. This
//! type covers what sits around them: configuration files, logging setup,
//! JSON-mode output that could not be recovered, and provider errors surfaced
//! through those layers.
//!
//! No external error crates (anyhow, thiserror, eyre) are used.

use crate::json::JsonExtractError;
use crate::llm::LLMError;
use std::fmt;

/// Errors raised while configuring or starting the crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiquidBooksError {
    /// The specific error that occurred
    pub kind: LiquidBooksErrorKind,
}

/// Specific crate-level error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiquidBooksErrorKind {
    /// Configuration file could not be read or did not match the schema
    Configuration {
        /// Description of what was invalid
        field: String,
        /// Why it was invalid
        reason: String,
    },
    /// Logging could not be initialized
    Logging {
        /// Reason for the failure
        reason: String,
    },
    /// JSON-mode output could not be parsed
    JsonOutput(JsonExtractError),
    /// Error from the provider layer
    Provider(LLMError),
}

impl LiquidBooksError {
    /// Creates a new LiquidBooksError with the given kind.
    #[must_use]
    pub fn new(kind: LiquidBooksErrorKind) -> Self {
        Self { kind }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn configuration(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(LiquidBooksErrorKind::Configuration {
            field: field.into(),
            reason: reason.into(),
        })
    }

    /// Creates a logging error.
    #[must_use]
    pub fn logging(reason: impl Into<String>) -> Self {
        Self::new(LiquidBooksErrorKind::Logging {
            reason: reason.into(),
        })
    }

    /// Returns true if this error indicates a configuration problem,
    /// including provider configuration errors.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        match &self.kind {
            LiquidBooksErrorKind::Configuration { .. } => true,
            LiquidBooksErrorKind::Provider(e) => e.is_configuration(),
            LiquidBooksErrorKind::Logging { .. } | LiquidBooksErrorKind::JsonOutput(_) => false,
        }
    }

    /// Returns the provider error, if this wraps one.
    #[must_use]
    pub fn as_provider(&self) -> Option<&LLMError> {
        match &self.kind {
            LiquidBooksErrorKind::Provider(e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for LiquidBooksError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            LiquidBooksErrorKind::Configuration { field, reason } => {
                write!(f, "configuration error for '{}': {}", field, reason)
            }
            LiquidBooksErrorKind::Logging { reason } => {
                write!(f, "failed to initialize logging: {}", reason)
            }
            LiquidBooksErrorKind::JsonOutput(e) => write!(f, "{}", e),
            LiquidBooksErrorKind::Provider(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for LiquidBooksError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            LiquidBooksErrorKind::Provider(e) => Some(e),
            LiquidBooksErrorKind::JsonOutput(e) => Some(e),
            _ => None,
        }
    }
}

impl From<JsonExtractError> for LiquidBooksError {
    fn from(error: JsonExtractError) -> Self {
        Self::new(LiquidBooksErrorKind::JsonOutput(error))
    }
}

impl From<LLMError> for LiquidBooksError {
    fn from(error: LLMError) -> Self {
        Self::new(LiquidBooksErrorKind::Provider(error))
    }
}
