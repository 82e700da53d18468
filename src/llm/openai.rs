//! Chat-completions API client.
//!
//! HTTP client for the chat-completions wire family, shared by OpenAI itself
//! and by OpenRouter, which exposes the same surface in front of many models.
//! The two differ only in base URL and credential.

use crate::llm::client::{self, LLMClient};
use crate::llm::config::{ProviderConfig, ProviderKind};
use crate::llm::error::LLMError;
use crate::llm::models::{self, ModelInfo, ModelRates};
use crate::llm::request::{CompletionRequest, CompletionResult, ResponseFormat, TextStream};
use crate::llm::streaming::{self, SseFrame};
use crate::messages::Message;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// End-of-stream payload sent by the completions family.
const DONE_MARKER: &str = "[DONE]";

/// Client for chat-completions APIs (OpenAI and OpenRouter).
#[derive(Debug, Clone)]
pub struct OpenAIClient {
    /// HTTP client
    client: Client,
    /// Configuration
    config: ProviderConfig,
}

/// Request body for the chat completions API.
#[derive(Debug, Clone, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
    stream: bool,
}

/// A message in chat-completions format.
#[derive(Debug, Clone, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// Non-streaming response from the chat completions API.
#[derive(Debug, Clone, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatCompletionChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

/// A choice in the response.
#[derive(Debug, Clone, Deserialize)]
struct ChatCompletionChoice {
    message: ChatResponseMessage,
}

/// The generated message; `content` is null when the model returned nothing.
#[derive(Debug, Clone, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Usage block of a non-streaming response.
#[derive(Debug, Clone, Deserialize)]
struct ChatUsage {
    total_tokens: u64,
}

/// Streaming chunk from the chat completions API.
#[derive(Debug, Clone, Deserialize)]
struct ChatCompletionChunk {
    #[serde(default)]
    choices: Vec<ChatCompletionChunkChoice>,
}

/// A choice in a streaming chunk.
#[derive(Debug, Clone, Deserialize)]
struct ChatCompletionChunkChoice {
    #[serde(default)]
    delta: ChatCompletionDelta,
}

/// Delta content in a streaming chunk.
#[derive(Debug, Clone, Default, Deserialize)]
struct ChatCompletionDelta {
    #[serde(default)]
    content: Option<String>,
}

/// Error payload a gateway may send in place of a chunk mid-stream.
#[derive(Debug, Clone, Deserialize)]
struct StreamErrorPayload {
    error: StreamErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
struct StreamErrorDetail {
    #[serde(default)]
    message: String,
}

/// Model listing shared by OpenAI and OpenRouter: `{"data": [...]}`.
#[derive(Debug, Clone, Deserialize)]
struct ModelList {
    #[serde(default)]
    data: Vec<ListedModel>,
}

/// One listed model. OpenAI sends `created`; OpenRouter adds the rest.
#[derive(Debug, Clone, Deserialize)]
struct ListedModel {
    id: String,
    #[serde(default)]
    created: Option<i64>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    context_length: Option<u64>,
    #[serde(default)]
    pricing: Option<ModelRates>,
}

impl From<ListedModel> for ModelInfo {
    fn from(listed: ListedModel) -> Self {
        Self {
            name: listed.name.unwrap_or_else(|| listed.id.clone()),
            id: listed.id,
            description: listed.description.filter(|d| !d.is_empty()),
            context_length: listed.context_length,
            created: listed.created,
            pricing: listed.pricing,
        }
    }
}

impl OpenAIClient {
    /// Creates a new chat-completions client.
    ///
    /// The configuration's base URL decides whether this talks to OpenAI or
    /// to OpenRouter.
    ///
    /// # Errors
    ///
    /// Returns `LLMError::network` if the HTTP client cannot be created.
    pub fn new(config: ProviderConfig) -> Result<Self, LLMError> {
        let client = client::http_client(config.timeout)?;
        Ok(Self { client, config })
    }

    /// Returns the configuration this client was built with.
    #[must_use]
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Builds the request body. Roles and order pass through unchanged.
    fn build_body<'a>(&'a self, request: &'a CompletionRequest, stream: bool) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &self.config.model,
            messages: convert_messages(&request.messages),
            temperature: request.temperature,
            max_tokens: request.max_output_tokens,
            response_format: request.json_mode().then_some(ResponseFormat::JsonObject),
            stream,
        }
    }

    /// Sends the request and returns the successful response.
    async fn send(&self, body: &ChatCompletionRequest<'_>) -> Result<reqwest::Response, LLMError> {
        let response = self
            .client
            .post(self.config.endpoint())
            .bearer_auth(self.config.api_key())
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

/// Normalizes a listing. OpenAI's is filtered to chat models and sorted
/// newest first; OpenRouter's only serves chat models and keeps its order.
fn into_models(kind: ProviderKind, list: ModelList) -> Vec<ModelInfo> {
    let mut listed: Vec<ModelInfo> = list.data.into_iter().map(ModelInfo::from).collect();

    if kind == ProviderKind::OpenAI {
        listed.retain(|m| models::is_chat_model(&m.id));
        listed.sort_by(|a, b| b.created.unwrap_or(0).cmp(&a.created.unwrap_or(0)));
    }

    listed
}

/// Converts conversation messages to chat-completions format.
fn convert_messages(messages: &[Message]) -> Vec<ChatMessage<'_>> {
    messages
        .iter()
        .map(|msg| ChatMessage {
            role: msg.role.as_str(),
            content: &msg.content,
        })
        .collect()
}

/// Extracts the result from a parsed response.
fn into_result(response: ChatCompletionResponse) -> Result<CompletionResult, LLMError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| LLMError::parse_error("response contained no choices"))?;

    Ok(CompletionResult {
        text: choice.message.content.unwrap_or_default(),
        tokens_used: response.usage.map(|u| u.total_tokens),
    })
}

/// Decodes one streamed `data:` payload.
fn decode_chunk(data: &str) -> Result<SseFrame, LLMError> {
    if data == DONE_MARKER {
        return Ok(SseFrame::Done);
    }

    if let Ok(payload) = serde_json::from_str::<StreamErrorPayload>(data) {
        return Err(LLMError::stream_error(payload.error.message));
    }

    let chunk: ChatCompletionChunk = serde_json::from_str(data)
        .map_err(|e| LLMError::parse_error(format!("failed to parse SSE event: {}", e)))?;

    let text = chunk
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta.content)
        .filter(|content| !content.is_empty());

    Ok(text.map_or(SseFrame::Skip, SseFrame::Text))
}

#[async_trait]
impl LLMClient for OpenAIClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResult, LLMError> {
        let body = self.build_body(request, false);
        let response = self.send(&body).await?;

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| LLMError::parse_error(format!("failed to parse response: {}", e)))?;

        into_result(completion)
    }

    async fn complete_stream(&self, request: &CompletionRequest) -> Result<TextStream, LLMError> {
        let body = self.build_body(request, true);
        let response = self.send(&body).await?;

        Ok(streaming::text_stream(
            response.bytes_stream(),
            self.provider_name(),
            decode_chunk,
        ))
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>, LLMError> {
        let response = self
            .client
            .get(self.config.models_endpoint())
            .bearer_auth(self.config.api_key())
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

        Ok(into_models(self.config.kind, list))
    }

    fn provider_name(&self) -> &'static str {
        self.config.kind.id()
    }
}
