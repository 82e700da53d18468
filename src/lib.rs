//! # LiquidBooks AI: LLM Provider Adapter
//!
//! One completion contract over three hosted LLM vendors. Callers build a
//! conversation, pick sampling parameters and an output format, and get text
//! back, either whole or as a stream of fragments, without knowing which
//! vendor answered.
//!
//! ## Architecture
//!
//! - **Provider adapter**: [`llm::AIProvider`] validates requests and
//!   dispatches to the configured vendor
//! - **Completions family**: OpenAI and OpenRouter share one chat-completions
//!   client, differing only in endpoint and credential
//! - **Messages family**: Anthropic, with system messages lifted out of the
//!   conversation and JSON mode expressed as an instruction
//! - **Model catalog**: [`llm::AIProvider::list_models`] lists what the
//!   configured vendor offers
//! - **JSON extraction**: [`json::parse_json_output`] recovers documents from
//!   fenced, trailing-comma or truncated model output
//! - **Configuration**: environment variables layered over an optional TOML
//!   file
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use liquidbooks_ai::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), LLMError> {
//!     let provider = AIProvider::from_env()?;
//!
//!     let request = CompletionRequest::new(vec![
//!         Message::system("You outline books."),
//!         Message::user("Outline a book about tide pools."),
//!     ])
//!     .with_format(ResponseFormat::JsonObject);
//!
//!     let result = provider.complete(&request).await?;
//!     println!("{}", result.text);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod json;
pub mod llm;
pub mod logging;
pub mod messages;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{LiquidBooksError, LiquidBooksErrorKind};
    pub use crate::json::{parse_json_output, JsonExtractError, JsonOutput};
    pub use crate::llm::{
        collect_text, AIProvider, CompletionRequest, CompletionResult, LLMClient, LLMError,
        LLMErrorKind, ModelInfo, ProviderConfig, ProviderKind, ResponseFormat, TextStream,
    };
    pub use crate::messages::{Message, MessageRole};
}
