//! Model catalog entries.
//!
//! Each vendor lists the models a credential can use. The listing shapes
//! differ per family; clients normalize them into [`ModelInfo`].

use serde::{Deserialize, Serialize};

/// Substrings marking OpenAI models that cannot serve chat completions.
pub const NON_CHAT_MODEL_MARKERS: [&str; 10] = [
    "embed",
    "whisper",
    "tts",
    "dall-e",
    "babbage",
    "davinci-002",
    "audio",
    "moderation",
    "text-similarity",
    "code-search",
];

/// Context window reported for Anthropic models, whose listing omits it.
pub const ANTHROPIC_CONTEXT_LENGTH: u64 = 200_000;

/// One model offered by a vendor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Identifier to put in `ProviderConfig::model`
    pub id: String,
    /// Human-readable name; the id when the vendor gives none
    pub name: String,
    /// Vendor description, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Context window in tokens, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_length: Option<u64>,
    /// Creation time as a Unix timestamp, if the vendor reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<i64>,
    /// Per-token prices quoted by a gateway
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing: Option<ModelRates>,
}

/// Prices as quoted by OpenRouter: decimal strings in USD per token.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ModelRates {
    /// Price per prompt token
    #[serde(default)]
    pub prompt: Option<String>,
    /// Price per completion token
    #[serde(default)]
    pub completion: Option<String>,
}

impl ModelInfo {
    /// Creates an entry named after its id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            description: None,
            context_length: None,
            created: None,
            pricing: None,
        }
    }
}

/// Returns true unless the id names an embedding, audio, image or
/// moderation model.
#[must_use]
pub fn is_chat_model(id: &str) -> bool {
    let id = id.to_lowercase();
    !NON_CHAT_MODEL_MARKERS.iter().any(|marker| id.contains(marker))
}
