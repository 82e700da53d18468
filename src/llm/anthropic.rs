//! Anthropic API client.
//!
//! HTTP client for the messages wire family. Unlike the completions family it
//! carries system instructions in a dedicated field, has no native JSON-output
//! flag, and reports usage as separate input and output counts.

use crate::llm::client::{self, LLMClient};
use crate::llm::config::ProviderConfig;
use crate::llm::error::LLMError;
use crate::llm::models::{ModelInfo, ANTHROPIC_CONTEXT_LENGTH};
use crate::llm::request::{CompletionRequest, CompletionResult, ResponseFormat, TextStream};
use crate::llm::streaming::{self, SseFrame};
use crate::messages::{Message, MessageRole};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Appended to the last user turn when JSON output is requested.
pub const JSON_INSTRUCTION: &str =
    "\n\nIMPORTANT: Respond with ONLY valid JSON. Do not include any text before or after the JSON object.";

/// Client for the Anthropic Claude API.
#[derive(Debug, Clone)]
pub struct AnthropicClient {
    /// HTTP client
    client: Client,
    /// Configuration
    config: ProviderConfig,
}

/// Request body for the Anthropic messages API.
#[derive(Debug, Clone, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<ApiMessage>,
    stream: bool,
}

/// A conversation turn in the API format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiMessage {
    /// `user` or `assistant`
    pub role: MessageRole,
    /// Turn text
    pub content: String,
}

/// Response from the Anthropic messages API (non-streaming).
#[derive(Debug, Clone, Deserialize)]
pub struct MessagesResponse {
    /// The content blocks, in order
    #[serde(default)]
    pub content: Vec<ContentBlock>,
    /// Usage statistics, if the vendor reported them
    #[serde(default)]
    pub usage: Option<Usage>,
}

/// A content block in the response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawContentBlock")]
pub enum ContentBlock {
    /// A block that carries text
    Text {
        /// The text
        text: String,
    },
    /// Any other block kind (tool use, thinking, ...)
    Other {
        /// The block's `type`, when present
        kind: Option<String>,
    },
}

impl ContentBlock {
    /// Returns the block's text; non-text blocks contribute nothing.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Text { text } => text,
            Self::Other { .. } => "",
        }
    }
}

/// Wire shape of a content block. Blocks are recognized by carrying a
/// `text` string; the `type` tag is optional.
#[derive(Debug, Deserialize)]
struct RawContentBlock {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    text: Option<String>,
}

impl From<RawContentBlock> for ContentBlock {
    fn from(raw: RawContentBlock) -> Self {
        match (raw.kind.as_deref(), raw.text) {
            (None | Some("text"), Some(text)) => Self::Text { text },
            (kind, _) => Self::Other {
                kind: kind.map(str::to_string),
            },
        }
    }
}

/// Usage statistics from the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Usage {
    /// Input tokens used
    #[serde(default)]
    pub input_tokens: u64,
    /// Output tokens generated
    #[serde(default)]
    pub output_tokens: u64,
}

impl Usage {
    /// Input plus output tokens.
    #[must_use]
    pub fn total(self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}

/// Streamed event; only the fields needed to pull out text are decoded.
#[derive(Debug, Clone, Deserialize)]
struct RawStreamEvent {
    #[serde(rename = "type")]
    event_type: String,
    #[serde(default)]
    delta: Option<StreamDelta>,
    #[serde(default)]
    error: Option<StreamError>,
}

#[derive(Debug, Clone, Deserialize)]
struct StreamDelta {
    #[serde(rename = "type", default)]
    delta_type: Option<String>,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct StreamError {
    #[serde(rename = "type", default)]
    error_type: Option<String>,
    #[serde(default)]
    message: String,
}

/// Response from the models API.
#[derive(Debug, Clone, Deserialize)]
struct ModelList {
    #[serde(default)]
    data: Vec<ListedModel>,
}

#[derive(Debug, Clone, Deserialize)]
struct ListedModel {
    id: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
}

impl From<ListedModel> for ModelInfo {
    fn from(listed: ListedModel) -> Self {
        Self {
            name: listed.display_name.unwrap_or_else(|| listed.id.clone()),
            id: listed.id,
            description: listed.created_at.map(|at| format!("Created: {at}")),
            context_length: Some(ANTHROPIC_CONTEXT_LENGTH),
            created: None,
            pricing: None,
        }
    }
}

impl AnthropicClient {
    /// Creates a new Anthropic client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: ProviderConfig) -> Result<Self, LLMError> {
        let client = client::http_client(config.timeout)?;
        Ok(Self { client, config })
    }

    /// Returns a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Builds the request body, partitioning system text out of the turns.
    fn build_body(&self, request: &CompletionRequest, stream: bool) -> MessagesRequest<'_> {
        let (system, messages) = prepare_messages(&request.messages, request.format);

        MessagesRequest {
            model: &self.config.model,
            max_tokens: request.max_output_tokens,
            temperature: request.temperature,
            system,
            messages,
            stream,
        }
    }

    /// Sends the request and returns the successful response.
    async fn send(&self, body: &MessagesRequest<'_>) -> Result<reqwest::Response, LLMError> {
        let response = self
            .client
            .post(self.config.endpoint())
            .header("x-api-key", self.config.api_key())
            .header("anthropic-version", &self.config.api_version)
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| client::map_reqwest_error(e, self.config.timeout))?;

        if !response.status().is_success() {
            return Err(client::parse_error_response(response, &self.config.model).await);
        }

        Ok(response)
    }
}

/// Translates a conversation into the messages family's shape.
///
/// System messages are lifted into the returned system text (joined with a
/// blank line when there are several); every other message keeps its role,
/// content and position. A conversation with no other turns is sent as one
/// user turn holding the system text, with no system field.
///
/// In JSON mode [`JSON_INSTRUCTION`] is appended to the last turn, but only
/// when that turn is a user turn.
#[must_use]
pub fn prepare_messages(
    messages: &[Message],
    format: ResponseFormat,
) -> (Option<String>, Vec<ApiMessage>) {
    let (system, rest): (Vec<&Message>, Vec<&Message>) =
        messages.iter().partition(|msg| msg.is_system());

    let system_text = system
        .iter()
        .map(|msg| msg.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");

    let (system, mut turns) = if rest.is_empty() {
        let turn = ApiMessage {
            role: MessageRole::User,
            content: system_text,
        };
        (None, vec![turn])
    } else {
        let turns = rest
            .into_iter()
            .map(|msg| ApiMessage {
                role: msg.role,
                content: msg.content.clone(),
            })
            .collect();
        let system = (!system_text.is_empty()).then_some(system_text);
        (system, turns)
    };

    if format.is_json() {
        match turns.last_mut() {
            Some(last) if last.role == MessageRole::User => {
                last.content.push_str(JSON_INSTRUCTION);
            }
            Some(last) => {
                tracing::debug!(
                    role = %last.role,
                    "conversation does not end on a user turn; JSON instruction not injected"
                );
            }
            None => {}
        }
    }

    (system, turns)
}

/// Concatenates the text of every text block, in order.
#[must_use]
pub fn extract_text_content(response: &MessagesResponse) -> String {
    response.content.iter().map(ContentBlock::text).collect()
}

fn into_result(response: MessagesResponse) -> CompletionResult {
    CompletionResult {
        text: extract_text_content(&response),
        tokens_used: response.usage.map(Usage::total),
    }
}

/// Decodes one streamed `data:` payload.
fn decode_event(data: &str) -> Result<SseFrame, LLMError> {
    let event: RawStreamEvent = serde_json::from_str(data)
        .map_err(|e| LLMError::parse_error(format!("failed to parse SSE event: {}", e)))?;

    match event.event_type.as_str() {
        "content_block_delta" => {
            let text = event
                .delta
                .filter(|d| d.delta_type.as_deref().unwrap_or("text_delta") == "text_delta")
                .and_then(|d| d.text)
                .filter(|t| !t.is_empty());
            Ok(text.map_or(SseFrame::Skip, SseFrame::Text))
        }
        "message_stop" => Ok(SseFrame::Done),
        "error" => {
            let (error_type, message) = event
                .error
                .map(|e| (e.error_type, e.message))
                .unwrap_or((None, "Unknown error".to_string()));
            Err(LLMError::stream_error(match error_type {
                Some(t) => format!("{}: {}", t, message),
                None => message,
            }))
        }
        _ => Ok(SseFrame::Skip),
    }
}

#[async_trait]
impl LLMClient for AnthropicClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResult, LLMError> {
        let body = self.build_body(request, false);
        let response = self.send(&body).await?;

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|e| LLMError::parse_error(format!("failed to parse response: {}", e)))?;

        Ok(into_result(parsed))
    }

    async fn complete_stream(&self, request: &CompletionRequest) -> Result<TextStream, LLMError> {
        let body = self.build_body(request, true);
        let response = self.send(&body).await?;

        Ok(streaming::text_stream(
            response.bytes_stream(),
            self.provider_name(),
            decode_event,
        ))
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>, LLMError> {
        let response = self
            .client
            .get(self.config.models_endpoint())
            .header("x-api-key", self.config.api_key())
            .header("anthropic-version", &self.config.api_version)
            .send()
            .await
            .map_err(|e| client::map_reqwest_error(e, self.config.timeout))?;

        if !response.status().is_success() {
            return Err(client::parse_error_response(response, &self.config.model).await);
        }

        let list: ModelList = response
            .json()
            .await
            .map_err(|e| LLMError::parse_error(format!("failed to parse model list: {}", e)))?;

        Ok(list.data.into_iter().map(ModelInfo::from).collect())
    }

    fn provider_name(&self) -> &'static str {
        "anthropic"
    }
}
