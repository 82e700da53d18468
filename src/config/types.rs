//! Configuration file schema.

use crate::llm::{
    LLMError, ProviderConfig, ProviderKind, BASE_URL_ENV, MODEL_ENV, PROVIDER_ENV, TIMEOUT_ENV,
};
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};

/// Root configuration structure.
///
/// This structure maps directly to the TOML configuration file format:
///
/// ```toml
/// [provider]
/// kind = "anthropic"
/// model = "claude-sonnet-4-20250514"
/// api_key_env = "ANTHROPIC_API_KEY"
///
/// [logging]
/// level = "info"
/// format = "pretty"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Provider selection and endpoint settings.
    #[serde(default)]
    pub provider: ProviderSection,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// The `[provider]` table. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderSection {
    /// Provider kind: "openai", "anthropic", or "openrouter".
    #[serde(default)]
    pub kind: Option<String>,

    /// The model to use.
    #[serde(default)]
    pub model: Option<String>,

    /// Environment variable holding the API key.
    ///
    /// Defaults to the provider's standard variable. The key itself never
    /// lives in the file.
    #[serde(default)]
    pub api_key_env: Option<String>,

    /// Custom base URL for the API.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Request timeout in seconds.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl FileConfig {
    /// Creates an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the file set nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Resolves the provider configuration, layering the environment over
    /// this file over built-in defaults.
    ///
    /// The file's `model`, `base_url` and `api_key_env` belong to the file's
    /// `kind`. When the environment selects a different provider they are
    /// ignored and that provider's defaults apply.
    ///
    /// # Errors
    ///
    /// Returns the same configuration errors as
    /// [`ProviderConfig::from_lookup`].
    pub fn provider_config<F>(&self, env: F) -> Result<ProviderConfig, LLMError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let section = &self.provider;
        let env_value = |name: &str| env(name).filter(|v| !v.trim().is_empty());
        let file_applies = section.applies_to(env_value(PROVIDER_ENV).as_deref());

        let layered = |name: &str| {
            env_value(name).or_else(|| match name {
                MODEL_ENV | BASE_URL_ENV if !file_applies => None,
                _ => section.setting(name),
            })
        };
        let credential_env = section.api_key_env.as_deref().filter(|_| file_applies);

        ProviderConfig::resolve(layered, credential_env)
    }

    /// Resolves the provider configuration against the process environment.
    ///
    /// # Errors
    ///
    /// See [`FileConfig::provider_config`].
    pub fn provider_config_from_env(&self) -> Result<ProviderConfig, LLMError> {
        self.provider_config(|name| std::env::var(name).ok())
    }
}

impl ProviderSection {
    /// Returns true if this table's provider-specific settings hold for the
    /// provider the environment selected.
    fn applies_to(&self, selected: Option<&str>) -> bool {
        match (self.kind.as_deref(), selected) {
            (Some(file_kind), Some(selected)) => {
                match (file_kind.parse::<ProviderKind>(), selected.parse::<ProviderKind>()) {
                    (Ok(a), Ok(b)) => a == b,
                    _ => file_kind.trim().eq_ignore_ascii_case(selected.trim()),
                }
            }
            _ => true,
        }
    }

    /// Returns this table's value for the environment variable `name`.
    fn setting(&self, name: &str) -> Option<String> {
        match name {
            PROVIDER_ENV => self.kind.clone(),
            MODEL_ENV => self.model.clone(),
            BASE_URL_ENV => self.base_url.clone(),
            TIMEOUT_ENV => self.timeout_secs.map(|s| s.to_string()),
            _ => None,
        }
    }
}
