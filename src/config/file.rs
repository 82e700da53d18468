//! Configuration file loading.
//!
//! This module handles loading configuration from TOML files at
//! XDG-compliant locations.

use crate::config::types::FileConfig;
use crate::error::LiquidBooksError;
use std::path::{Path, PathBuf};

/// Default configuration file name for project-local config.
const LOCAL_CONFIG_NAME: &str = "liquidbooks.toml";

/// Default configuration file name within XDG config directory.
const XDG_CONFIG_NAME: &str = "config.toml";

/// Application name for XDG directory lookup.
const APP_NAME: &str = "liquidbooks";

/// Loads configuration from the default search paths.
///
/// Search order:
/// 1. `./liquidbooks.toml` (project-local)
/// 2. `~/.config/liquidbooks/config.toml` (XDG config)
///
/// Returns an empty configuration if no config file is found.
///
/// # Errors
///
/// Returns an error if a config file exists but cannot be parsed.
pub fn load() -> Result<FileConfig, LiquidBooksError> {
    match search_paths().into_iter().find(|path| path.exists()) {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading configuration file");
            from_path(&path)
        }
        None => Ok(FileConfig::default()),
    }
}

/// Loads configuration from a specific file path.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not valid TOML, or does
/// not match the schema.
pub fn from_path(path: &Path) -> Result<FileConfig, LiquidBooksError> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        LiquidBooksError::configuration(
            "config_file",
            format!("failed to read '{}': {}", path.display(), e),
        )
    })?;

    toml::from_str(&contents).map_err(|e| {
        LiquidBooksError::configuration(
            "config_file",
            format!("invalid TOML in '{}': {}", path.display(), e),
        )
    })
}

/// Parses configuration from a TOML string.
///
/// # Errors
///
/// Returns an error if the TOML is invalid or doesn't match the schema.
///
/// # Example
///
/// ```rust
/// use liquidbooks_ai::config::from_str;
///
/// let config = from_str(r#"
/// [provider]
/// kind = "openrouter"
/// model = "anthropic/claude-3.5-sonnet"
/// "#).unwrap();
///
/// assert_eq!(config.provider.kind.as_deref(), Some("openrouter"));
/// ```
pub fn from_str(toml_str: &str) -> Result<FileConfig, LiquidBooksError> {
    toml::from_str(toml_str)
        .map_err(|e| LiquidBooksError::configuration("config", format!("invalid TOML: {e}")))
}

/// Returns the paths that would be searched for configuration files.
#[must_use]
pub fn search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(LOCAL_CONFIG_NAME)];

    if let Some(dir) = xdg_config_dir() {
        paths.push(dir.join(XDG_CONFIG_NAME));
    }

    paths
}

/// Returns the XDG config directory for this application.
///
/// This is `~/.config/liquidbooks` on most systems.
#[must_use]
pub fn xdg_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(APP_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogFormat;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn from_str_parses_full_file() {
        let toml = r#"
[provider]
kind = "anthropic"
model = "claude-sonnet-4-20250514"
api_key_env = "ANTHROPIC_API_KEY"
base_url = "https://api.anthropic.com"
timeout_secs = 60

[logging]
level = "debug"
format = "json"
        "#;

        let config = from_str(toml).unwrap();

        assert_eq!(config.provider.kind.as_deref(), Some("anthropic"));
        assert_eq!(config.provider.timeout_secs, Some(60));
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn from_str_accepts_empty_file() {
        assert!(from_str("").unwrap().is_empty());
    }

    #[test]
    fn from_str_rejects_unknown_keys() {
        let err = from_str("[provider]\napi_key = \"sk-inline\"\n").unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn from_str_error_on_invalid_toml() {
        let err = from_str("this is not valid toml [[[").unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("invalid TOML"));
    }

    #[test]
    fn from_path_reads_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("liquidbooks.toml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "[provider]\nkind = \"openrouter\"").unwrap();

        let config = from_path(&config_path).unwrap();

        assert_eq!(config.provider.kind.as_deref(), Some("openrouter"));
    }

    #[test]
    fn from_path_parse_error_is_reported_once() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("liquidbooks.toml");
        std::fs::write(&config_path, "[provider\nkind = ").unwrap();

        let message = from_path(&config_path).unwrap_err().to_string();

        assert!(message.contains("invalid TOML in"));
        assert!(message.contains("liquidbooks.toml"));
        assert_eq!(message.matches("configuration error").count(), 1);
    }

    #[test]
    fn from_path_error_names_the_file() {
        let err = from_path(Path::new("/nonexistent/path/config.toml")).unwrap_err();

        assert!(err.is_configuration());
        assert!(err.to_string().contains("/nonexistent/path/config.toml"));
    }

    #[test]
    fn search_paths_starts_with_local_file() {
        let paths = search_paths();

        assert_eq!(paths[0], PathBuf::from(LOCAL_CONFIG_NAME));
        if let Some(xdg) = paths.get(1) {
            assert!(xdg.ends_with("liquidbooks/config.toml"));
        }
    }
}
