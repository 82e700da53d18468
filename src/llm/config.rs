//! LLM provider configuration.
//!
//! Provider selection, credentials and endpoint settings. A [`ProviderConfig`]
//! is read once at startup and never changes afterwards; building a new
//! [`AIProvider`](crate::llm::AIProvider) is the only way to switch provider.

use crate::llm::error::LLMError;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Environment variable selecting the provider kind.
pub const PROVIDER_ENV: &str = "AI_PROVIDER";
/// Environment variable selecting the model identifier.
pub const MODEL_ENV: &str = "AI_MODEL";
/// Environment variable overriding the vendor base URL.
pub const BASE_URL_ENV: &str = "AI_BASE_URL";
/// Environment variable overriding the transport timeout, in seconds.
pub const TIMEOUT_ENV: &str = "AI_TIMEOUT_SECS";

/// Provider used when [`PROVIDER_ENV`] is unset.
pub const DEFAULT_PROVIDER: ProviderKind = ProviderKind::OpenAI;
/// `anthropic-version` header sent on every messages request.
pub const ANTHROPIC_API_VERSION: &str = "2023-06-01";
/// Transport timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Wire-protocol family spoken by a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireFamily {
    /// `/chat/completions` shape: system messages inline, native JSON mode.
    Completions,
    /// `/v1/messages` shape: separate system field, no native JSON mode.
    Messages,
}

impl fmt::Display for WireFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completions => f.write_str("completions"),
            Self::Messages => f.write_str("messages"),
        }
    }
}

/// The LLM vendor to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// OpenAI's native API
    #[serde(rename = "openai")]
    OpenAI,
    /// OpenRouter gateway, OpenAI-compatible surface over many models
    #[serde(rename = "openrouter")]
    OpenRouter,
    /// Anthropic messages API
    Anthropic,
}

impl ProviderKind {
    /// Every supported provider, in catalog order.
    pub const ALL: [ProviderKind; 3] = [Self::OpenAI, Self::Anthropic, Self::OpenRouter];

    /// Returns the selector value for this provider.
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Self::OpenAI => "openai",
            Self::OpenRouter => "openrouter",
            Self::Anthropic => "anthropic",
        }
    }

    /// Returns a human-readable vendor name.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::OpenAI => "OpenAI",
            Self::OpenRouter => "OpenRouter",
            Self::Anthropic => "Anthropic",
        }
    }

    /// Returns a one-line description for provider listings.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::OpenAI => "GPT-4 and GPT-3.5 models",
            Self::OpenRouter => "Access to multiple AI models",
            Self::Anthropic => "Claude 3 and 3.5 models",
        }
    }

    /// Returns the wire-protocol family this provider speaks.
    #[must_use]
    pub fn family(self) -> WireFamily {
        match self {
            Self::OpenAI | Self::OpenRouter => WireFamily::Completions,
            Self::Anthropic => WireFamily::Messages,
        }
    }

    /// Returns the environment variable holding this provider's credential.
    #[must_use]
    pub fn credential_env(self) -> &'static str {
        match self {
            Self::OpenAI => "OPENAI_API_KEY",
            Self::OpenRouter => "OPENROUTER_API_KEY",
            Self::Anthropic => "ANTHROPIC_API_KEY",
        }
    }

    /// Returns the vendor's public base URL.
    #[must_use]
    pub fn default_base_url(self) -> &'static str {
        match self {
            Self::OpenAI => "https://api.openai.com/v1",
            Self::OpenRouter => "https://openrouter.ai/api/v1",
            Self::Anthropic => "https://api.anthropic.com",
        }
    }

    /// Returns the model used when none is configured.
    #[must_use]
    pub fn default_model(self) -> &'static str {
        match self {
            Self::OpenAI => "gpt-4o",
            Self::OpenRouter => "openai/gpt-4o",
            Self::Anthropic => "claude-sonnet-4-20250514",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ProviderKind {
    type Err = LLMError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "openrouter" => Ok(Self::OpenRouter),
            "anthropic" => Ok(Self::Anthropic),
            _ => Err(LLMError::unsupported_provider(s)),
        }
    }
}

/// Configuration bound to one adapter for its whole lifetime.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// The vendor to talk to
    pub kind: ProviderKind,
    /// The model to use (e.g., "gpt-4o", "claude-sonnet-4-20250514")
    pub model: String,
    /// Credential for the vendor; redacted in `Debug` output
    api_key: SecretString,
    /// Base URL for the API
    pub base_url: String,
    /// `anthropic-version` header value (messages family only)
    pub api_version: String,
    /// Transport timeout for a whole request
    pub timeout: Duration,
}

impl ProviderConfig {
    /// Creates a configuration for `kind` with that vendor's defaults.
    ///
    /// The credential is not checked here; [`ProviderConfig::validate`] does
    /// that when the adapter is built.
    ///
    /// # Examples
    ///
    /// ```
    /// use liquidbooks_ai::llm::{ProviderConfig, ProviderKind};
    ///
    /// let config = ProviderConfig::new(ProviderKind::Anthropic, "sk-ant-...");
    /// assert_eq!(config.model, "claude-sonnet-4-20250514");
    /// ```
    #[must_use]
    pub fn new(kind: ProviderKind, api_key: impl Into<String>) -> Self {
        Self {
            kind,
            model: kind.default_model().to_string(),
            api_key: SecretString::from(api_key.into()),
            base_url: kind.default_base_url().to_string(),
            api_version: ANTHROPIC_API_VERSION.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Creates a configuration for OpenAI.
    #[must_use]
    pub fn openai(api_key: impl Into<String>) -> Self {
        Self::new(ProviderKind::OpenAI, api_key)
    }

    /// Creates a configuration for the OpenRouter gateway.
    #[must_use]
    pub fn openrouter(api_key: impl Into<String>) -> Self {
        Self::new(ProviderKind::OpenRouter, api_key)
    }

    /// Creates a configuration for Anthropic.
    #[must_use]
    pub fn anthropic(api_key: impl Into<String>) -> Self {
        Self::new(ProviderKind::Anthropic, api_key)
    }

    /// Sets the model to use.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Overrides the vendor base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the `anthropic-version` header value.
    #[must_use]
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the wire-protocol family of the configured provider.
    #[must_use]
    pub fn family(&self) -> WireFamily {
        self.kind.family()
    }

    /// Returns the credential. Only the HTTP clients should call this.
    pub(crate) fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    /// Returns the full endpoint URL for the configured wire family.
    #[must_use]
    pub fn endpoint(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        match self.family() {
            WireFamily::Completions => format!("{}/chat/completions", base),
            WireFamily::Messages => format!("{}/v1/messages", base),
        }
    }

    /// Returns the URL of the vendor's model listing.
    #[must_use]
    pub fn models_endpoint(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        match self.family() {
            WireFamily::Completions => format!("{}/models", base),
            WireFamily::Messages => format!("{}/v1/models", base),
        }
    }

    /// Checks that the configuration can produce a working adapter.
    ///
    /// # Errors
    ///
    /// Returns `MissingCredential` naming the provider's credential variable
    /// when the key is empty, or `InvalidConfig` for an empty model, a base
    /// URL that is not http(s), or a zero timeout.
    pub fn validate(&self) -> Result<(), LLMError> {
        if self.api_key.expose_secret().trim().is_empty() {
            return Err(LLMError::missing_credential(self.kind.credential_env()));
        }

        if self.model.trim().is_empty() {
            return Err(LLMError::invalid_config("model", "must not be empty"));
        }

        let url = url::Url::parse(&self.base_url).map_err(|e| {
            LLMError::invalid_config("base_url", format!("'{}': {}", self.base_url, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(LLMError::invalid_config(
                "base_url",
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }

        if self.timeout.is_zero() {
            return Err(LLMError::invalid_config("timeout", "must be non-zero"));
        }

        Ok(())
    }

    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// See [`ProviderConfig::from_lookup`].
    pub fn from_env() -> Result<Self, LLMError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through an arbitrary variable lookup.
    ///
    /// Reads [`PROVIDER_ENV`] (default `openai`), [`MODEL_ENV`] (default: the
    /// provider's default model), the provider's credential variable, and the
    /// optional [`BASE_URL_ENV`] and [`TIMEOUT_ENV`] overrides. Empty values
    /// count as unset.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedProvider` for an unknown selector,
    /// `MissingCredential` when the selected provider's key is absent, and
    /// `InvalidConfig` for a malformed timeout or base URL.
    ///
    /// # Examples
    ///
    /// ```
    /// use liquidbooks_ai::llm::{ProviderConfig, ProviderKind};
    ///
    /// let config = ProviderConfig::from_lookup(|name| match name {
    ///     "AI_PROVIDER" => Some("openrouter".to_string()),
    ///     "OPENROUTER_API_KEY" => Some("sk-or-test".to_string()),
    ///     _ => None,
    /// })
    /// .unwrap();
    /// assert_eq!(config.kind, ProviderKind::OpenRouter);
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self, LLMError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::resolve(lookup, None)
    }

    /// Shared resolution used by [`from_lookup`](Self::from_lookup) and the
    /// configuration file, which may rename the credential variable.
    pub(crate) fn resolve<F>(lookup: F, credential_env: Option<&str>) -> Result<Self, LLMError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let kind = match get(PROVIDER_ENV) {
            Some(value) => value.parse::<ProviderKind>()?,
            None => DEFAULT_PROVIDER,
        };

        let credential_env = credential_env.unwrap_or_else(|| kind.credential_env());
        let api_key = get(credential_env).ok_or_else(|| LLMError::missing_credential(credential_env))?;

        let mut config = Self::new(kind, api_key);

        if let Some(model) = get(MODEL_ENV) {
            config = config.with_model(model.trim());
        }

        if let Some(base_url) = get(BASE_URL_ENV) {
            config = config.with_base_url(base_url.trim());
        }

        if let Some(raw) = get(TIMEOUT_ENV) {
            let secs = raw.trim().parse::<u64>().map_err(|e| {
                LLMError::invalid_config(TIMEOUT_ENV, format!("'{}' is not a number of seconds: {}", raw, e))
            })?;
            config = config.with_timeout(Duration::from_secs(secs));
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::error::LLMErrorKind;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn both_completions_kinds_share_a_family() {
        assert_eq!(ProviderKind::OpenAI.family(), WireFamily::Completions);
        assert_eq!(ProviderKind::OpenRouter.family(), WireFamily::Completions);
        assert_eq!(ProviderKind::Anthropic.family(), WireFamily::Messages);
    }

    #[test]
    fn provider_kind_parses_case_insensitively() {
        assert_eq!("OpenAI".parse::<ProviderKind>().unwrap(), ProviderKind::OpenAI);
        assert_eq!(
            " ANTHROPIC ".parse::<ProviderKind>().unwrap(),
            ProviderKind::Anthropic
        );
        assert_eq!(
            "openrouter".parse::<ProviderKind>().unwrap(),
            ProviderKind::OpenRouter
        );
    }

    #[test]
    fn provider_kind_rejects_unknown_values() {
        let err = "gemini".parse::<ProviderKind>().unwrap_err();
        assert_eq!(
            err.kind,
            LLMErrorKind::UnsupportedProvider {
                value: "gemini".to_string()
            }
        );
    }

    #[test]
    fn provider_kind_serde_uses_selector_ids() {
        let json = serde_json::to_string(&ProviderKind::OpenRouter).unwrap();
        assert_eq!(json, r#""openrouter""#);
        let kind: ProviderKind = serde_json::from_str(r#""openai""#).unwrap();
        assert_eq!(kind, ProviderKind::OpenAI);
    }

    #[test]
    fn endpoint_follows_family() {
        assert_eq!(
            ProviderConfig::openai("k").endpoint(),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(
            ProviderConfig::openrouter("k").endpoint(),
            "https://openrouter.ai/api/v1/chat/completions"
        );
        assert_eq!(
            ProviderConfig::anthropic("k").endpoint(),
            "https://api.anthropic.com/v1/messages"
        );
    }

    #[test]
    fn models_endpoint_follows_family() {
        assert_eq!(
            ProviderConfig::openai("k").models_endpoint(),
            "https://api.openai.com/v1/models"
        );
        assert_eq!(
            ProviderConfig::openrouter("k").models_endpoint(),
            "https://openrouter.ai/api/v1/models"
        );
        assert_eq!(
            ProviderConfig::anthropic("k").models_endpoint(),
            "https://api.anthropic.com/v1/models"
        );
    }

    #[test]
    fn endpoint_ignores_trailing_slash_on_override() {
        let config = ProviderConfig::openai("k").with_base_url("http://localhost:8080/v1/");
        assert_eq!(config.endpoint(), "http://localhost:8080/v1/chat/completions");
    }

    #[test]
    fn debug_output_redacts_the_credential() {
        let config = ProviderConfig::anthropic("sk-ant-super-secret");
        let debug_str = format!("{:?}", config);
        assert!(!debug_str.contains("sk-ant-super-secret"));
    }

    #[test]
    fn validate_rejects_empty_credential_with_variable_name() {
        let err = ProviderConfig::anthropic("").validate().unwrap_err();
        assert_eq!(
            err.kind,
            LLMErrorKind::MissingCredential {
                env_var: "ANTHROPIC_API_KEY".to_string()
            }
        );
    }

    #[test]
    fn validate_rejects_bad_base_url() {
        let err = ProviderConfig::openai("k")
            .with_base_url("not a url")
            .validate()
            .unwrap_err();
        assert!(matches!(err.kind, LLMErrorKind::InvalidConfig { ref field, .. } if field == "base_url"));

        let err = ProviderConfig::openai("k")
            .with_base_url("ftp://example.com")
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("ftp"));
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let err = ProviderConfig::openai("k")
            .with_timeout(Duration::ZERO)
            .validate()
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn from_lookup_defaults_to_openai() {
        let config = ProviderConfig::from_lookup(lookup_from(&[("OPENAI_API_KEY", "sk-test")])).unwrap();

        assert_eq!(config.kind, ProviderKind::OpenAI);
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.api_key(), "sk-test");
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn from_lookup_reads_every_setting() {
        let config = ProviderConfig::from_lookup(lookup_from(&[
            ("AI_PROVIDER", "Anthropic"),
            ("AI_MODEL", "claude-3-5-haiku-latest"),
            ("ANTHROPIC_API_KEY", "sk-ant"),
            ("AI_BASE_URL", "http://127.0.0.1:9000"),
            ("AI_TIMEOUT_SECS", "30"),
        ]))
        .unwrap();

        assert_eq!(config.kind, ProviderKind::Anthropic);
        assert_eq!(config.model, "claude-3-5-haiku-latest");
        assert_eq!(config.base_url, "http://127.0.0.1:9000");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn from_lookup_requires_the_selected_providers_credential() {
        // An OpenAI key does not satisfy an Anthropic selection.
        let err = ProviderConfig::from_lookup(lookup_from(&[
            ("AI_PROVIDER", "anthropic"),
            ("OPENAI_API_KEY", "sk-test"),
        ]))
        .unwrap_err();

        assert_eq!(err.to_string(), "ANTHROPIC_API_KEY not found in environment");
    }

    #[test]
    fn from_lookup_treats_empty_credential_as_missing() {
        let err = ProviderConfig::from_lookup(lookup_from(&[
            ("AI_PROVIDER", "openrouter"),
            ("OPENROUTER_API_KEY", ""),
        ]))
        .unwrap_err();

        assert!(matches!(err.kind, LLMErrorKind::MissingCredential { .. }));
    }

    #[test]
    fn from_lookup_never_silently_defaults_unknown_provider() {
        let err = ProviderConfig::from_lookup(lookup_from(&[
            ("AI_PROVIDER", "mistral"),
            ("OPENAI_API_KEY", "sk-test"),
        ]))
        .unwrap_err();

        assert!(err.to_string().contains("mistral"));
    }

    #[test]
    fn from_lookup_rejects_non_numeric_timeout() {
        let err = ProviderConfig::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("AI_TIMEOUT_SECS", "soon"),
        ]))
        .unwrap_err();

        assert!(matches!(err.kind, LLMErrorKind::InvalidConfig { ref field, .. } if field == TIMEOUT_ENV));
    }

    #[test]
    fn resolve_honors_renamed_credential_variable() {
        let config = ProviderConfig::resolve(
            lookup_from(&[("AI_PROVIDER", "openai"), ("BOOKS_OPENAI_KEY", "sk-renamed")]),
            Some("BOOKS_OPENAI_KEY"),
        )
        .unwrap();

        assert_eq!(config.api_key(), "sk-renamed");
    }
}
