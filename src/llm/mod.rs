//! LLM provider module.
//!
//! This module contains the provider adapter, the two vendor wire-family
//! clients behind it, provider configuration, and the error taxonomy shared by
//! all of them.

mod anthropic;
mod client;
mod config;
mod error;
mod models;
mod openai;
mod provider;
mod request;
mod streaming;
mod usage;

pub use anthropic::{
    extract_text_content, prepare_messages, AnthropicClient, ApiMessage, ContentBlock,
    MessagesResponse, Usage, JSON_INSTRUCTION,
};
pub use client::LLMClient;
pub use config::{
    ProviderConfig, ProviderKind, WireFamily, ANTHROPIC_API_VERSION, BASE_URL_ENV,
    DEFAULT_PROVIDER, DEFAULT_TIMEOUT, MODEL_ENV, PROVIDER_ENV, TIMEOUT_ENV,
};
pub use error::{LLMError, LLMErrorKind};
pub use models::{
    is_chat_model, ModelInfo, ModelRates, ANTHROPIC_CONTEXT_LENGTH, NON_CHAT_MODEL_MARKERS,
};
pub use openai::OpenAIClient;
pub use provider::AIProvider;
pub use request::{
    CompletionRequest, CompletionResult, ResponseFormat, TextStream, DEFAULT_MAX_OUTPUT_TOKENS,
    DEFAULT_TEMPERATURE,
};
pub use streaming::collect_text;
pub use usage::{calculate_cost, estimate_tokens, pricing_for, ModelPricing};
