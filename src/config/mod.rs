//! Configuration management.
//!
//! Provider settings come from the environment first, then an optional TOML
//! file, then built-in defaults. API keys are only ever read from the
//! environment; the file may rename the variable but never holds the key.
//!
//! # Configuration File Format
//!
//! The search order is:
//! 1. `./liquidbooks.toml` (project-local)
//! 2. `~/.config/liquidbooks/config.toml` (XDG config)
//!
//! ```toml
//! [provider]
//! kind = "anthropic"                 # openai | anthropic | openrouter
//! model = "claude-sonnet-4-20250514"
//! api_key_env = "ANTHROPIC_API_KEY"  # optional
//! base_url = "https://api.anthropic.com"
//! timeout_secs = 120
//!
//! [logging]
//! level = "info"                     # trace | debug | info | warn | error
//! format = "pretty"                  # pretty | json
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use liquidbooks_ai::config;
//! use liquidbooks_ai::llm::AIProvider;
//!
//! let file = config::load()?;
//! let provider = AIProvider::new(file.provider_config_from_env()?)?;
//! ```

mod file;
mod types;

pub use file::{from_path, from_str, load, search_paths, xdg_config_dir};
pub use types::{FileConfig, ProviderSection};
