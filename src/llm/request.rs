//! Uniform request and result shapes shared by every provider.

use crate::llm::error::LLMError;
use crate::messages::Message;
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::pin::Pin;

/// Sampling temperature used when the caller does not pick one.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
/// Output token cap used when the caller does not pick one.
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 4000;

/// Lazy, single-pass sequence of generated text fragments.
///
/// Dropping the stream before it ends closes the underlying connection.
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String, LLMError>> + Send>>;

/// Whether the caller wants free text or a single JSON document back.
///
/// Decided once where external input enters the crate; deserializes from
/// either `{"type": "json_object"}` or a string such as `"json"`/`"JSON"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "serde_json::Value", into = "serde_json::Value")]
pub enum ResponseFormat {
    /// Free-form text
    #[default]
    PlainText,
    /// Exactly one JSON document with no surrounding prose
    JsonObject,
}

impl ResponseFormat {
    /// Normalizes the loosely-typed `response_format` values callers send.
    ///
    /// `{"type": "json_object"}` and any casing of the string `"json"` select
    /// [`ResponseFormat::JsonObject`]; everything else, including `None`, is
    /// [`ResponseFormat::PlainText`].
    #[must_use]
    pub fn from_value(value: Option<&serde_json::Value>) -> Self {
        match value {
            Some(serde_json::Value::Object(map)) => {
                if map.get("type").and_then(|t| t.as_str()) == Some("json_object") {
                    Self::JsonObject
                } else {
                    Self::PlainText
                }
            }
            Some(serde_json::Value::String(s)) => Self::from_name(s),
            _ => Self::PlainText,
        }
    }

    /// Normalizes the string form; only `json` (any case) means JSON.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("json") {
            Self::JsonObject
        } else {
            Self::PlainText
        }
    }

    /// Returns true if the caller asked for JSON output.
    #[must_use]
    pub fn is_json(self) -> bool {
        self == Self::JsonObject
    }
}

impl From<bool> for ResponseFormat {
    fn from(json: bool) -> Self {
        if json {
            Self::JsonObject
        } else {
            Self::PlainText
        }
    }
}

impl From<serde_json::Value> for ResponseFormat {
    fn from(value: serde_json::Value) -> Self {
        Self::from_value(Some(&value))
    }
}

impl From<ResponseFormat> for serde_json::Value {
    fn from(format: ResponseFormat) -> Self {
        match format {
            ResponseFormat::PlainText => serde_json::json!({ "type": "text" }),
            ResponseFormat::JsonObject => serde_json::json!({ "type": "json_object" }),
        }
    }
}

/// One completion call: the full conversation plus sampling settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// The conversation, oldest first
    pub messages: Vec<Message>,
    /// Sampling temperature in `[0, 1]`
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Maximum tokens to generate; must be positive
    #[serde(default = "default_max_output_tokens", alias = "max_tokens")]
    pub max_output_tokens: u32,
    /// Requested output shape
    #[serde(default, alias = "response_format")]
    pub format: ResponseFormat,
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

fn default_max_output_tokens() -> u32 {
    DEFAULT_MAX_OUTPUT_TOKENS
}

impl CompletionRequest {
    /// Creates a request with default sampling settings.
    #[must_use]
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            temperature: DEFAULT_TEMPERATURE,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            format: ResponseFormat::PlainText,
        }
    }

    /// Sets the sampling temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Sets the output token cap.
    #[must_use]
    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }

    /// Sets the requested output shape.
    #[must_use]
    pub fn with_format(mut self, format: impl Into<ResponseFormat>) -> Self {
        self.format = format.into();
        self
    }

    /// Returns true if the caller asked for JSON output.
    #[must_use]
    pub fn json_mode(&self) -> bool {
        self.format.is_json()
    }

    /// Checks the request before anything is sent.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` for an empty conversation, a temperature
    /// outside `[0, 1]`, or a zero token cap.
    pub fn validate(&self) -> Result<(), LLMError> {
        if self.messages.is_empty() {
            return Err(LLMError::invalid_request("messages must not be empty"));
        }

        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(LLMError::invalid_request(format!(
                "temperature {} is outside [0, 1]",
                self.temperature
            )));
        }

        if self.max_output_tokens == 0 {
            return Err(LLMError::invalid_request(
                "max_output_tokens must be positive",
            ));
        }

        Ok(())
    }
}

/// Result of a non-streaming completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionResult {
    /// The generated text
    pub text: String,
    /// Tokens billed for the call; `None` when the vendor did not report usage
    pub tokens_used: Option<u64>,
}
