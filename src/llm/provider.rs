//! The provider adapter.
//!
//! [`AIProvider`] presents one request/response contract over both vendor
//! wire families. It is built once from a [`ProviderConfig`], never mutated
//! afterwards, and cheap to clone into every task that needs it.

use crate::llm::anthropic::AnthropicClient;
use crate::llm::client::LLMClient;
use crate::llm::config::{ProviderConfig, ProviderKind, WireFamily};
use crate::llm::error::LLMError;
use crate::llm::models::ModelInfo;
use crate::llm::openai::OpenAIClient;
use crate::llm::request::{CompletionRequest, CompletionResult, TextStream};
use std::sync::Arc;

/// Provider adapter bound to one vendor and model for its lifetime.
///
/// # Example
///
/// ```ignore
/// use liquidbooks_ai::llm::{AIProvider, CompletionRequest};
/// use liquidbooks_ai::messages::Message;
///
/// let provider = AIProvider::from_env()?;
/// let request = CompletionRequest::new(vec![
///     Message::system("Be terse."),
///     Message::user("Hi"),
/// ]);
/// let result = provider.complete(&request).await?;
/// println!("{} ({:?} tokens)", result.text, result.tokens_used);
/// ```
#[derive(Debug, Clone)]
pub struct AIProvider {
    config: ProviderConfig,
    client: Arc<dyn LLMClient>,
}

impl AIProvider {
    /// Builds the adapter for `config`.
    ///
    /// The configuration is validated and the family's client is created; no
    /// network call is made.
    ///
    /// # Errors
    ///
    /// Returns a configuration error (see [`ProviderConfig::validate`]) or a
    /// network error if the HTTP client cannot be created.
    pub fn new(config: ProviderConfig) -> Result<Self, LLMError> {
        config.validate()?;

        let client: Arc<dyn LLMClient> = match config.family() {
            WireFamily::Completions => Arc::new(OpenAIClient::new(config.clone())?),
            WireFamily::Messages => Arc::new(AnthropicClient::new(config.clone())?),
        };

        tracing::info!(
            provider = %config.kind,
            model = %config.model,
            family = %config.family(),
            "AI provider configured"
        );

        Ok(Self { config, client })
    }

    /// Builds the adapter from the process environment.
    ///
    /// # Errors
    ///
    /// See [`ProviderConfig::from_env`] and [`AIProvider::new`].
    pub fn from_env() -> Result<Self, LLMError> {
        Self::new(ProviderConfig::from_env()?)
    }

    /// Builds the adapter around an existing client, bypassing family dispatch.
    ///
    /// Useful for custom transports and test doubles.
    #[must_use]
    pub fn with_client(config: ProviderConfig, client: Arc<dyn LLMClient>) -> Self {
        Self { config, client }
    }

    /// Returns the configuration the adapter was built with.
    #[must_use]
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Returns the selected provider kind.
    #[must_use]
    pub fn kind(&self) -> ProviderKind {
        self.config.kind
    }

    /// Returns the configured model.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Runs one completion and returns the whole text.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` before any network call if the request fails
    /// validation; otherwise any transport or vendor error, unretried.
    pub async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResult, LLMError> {
        request.validate()?;

        tracing::debug!(
            provider = self.client.provider_name(),
            model = %self.config.model,
            messages = request.messages.len(),
            json_mode = request.json_mode(),
            "sending completion"
        );

        let result = self.client.complete(request).await?;

        tracing::debug!(
            provider = self.client.provider_name(),
            chars = result.text.len(),
            tokens_used = ?result.tokens_used,
            "completion received"
        );

        Ok(result)
    }

    /// Runs one completion and returns its text as a stream of chunks.
    ///
    /// Chunks arrive in vendor order; empty deltas are never yielded. No
    /// token usage is reported on this path.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` before any network call if the request fails
    /// validation, or an error if the stream cannot be opened.
    pub async fn complete_stream(&self, request: &CompletionRequest) -> Result<TextStream, LLMError> {
        request.validate()?;

        tracing::debug!(
            provider = self.client.provider_name(),
            model = %self.config.model,
            messages = request.messages.len(),
            json_mode = request.json_mode(),
            "opening completion stream"
        );

        self.client.complete_stream(request).await
    }

    /// Lists the models the configured vendor offers this credential.
    ///
    /// # Errors
    ///
    /// Returns any transport or vendor error, unretried.
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>, LLMError> {
        tracing::debug!(provider = self.client.provider_name(), "listing models");

        let models = self.client.list_models().await?;

        tracing::debug!(
            provider = self.client.provider_name(),
            count = models.len(),
            "models listed"
        );
        Ok(models)
    }
}
