//! Client configuration.
//!
//! Layers, lowest priority first: built-in defaults, a TOML file, `CHAT_SYNC_*` environment
//! variables, then whatever the CLI overrides on top.
//!
//! ```toml
//! api_url = "https://chat.example.com"
//! request_timeout_secs = 20
//! send_ordering = "serialized"
//! ```

use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::utils::{get_app_config_dir, non_empty_env};

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
const CONFIG_FILENAME: &str = "config.toml";

pub const ENV_API_URL: &str = "CHAT_SYNC_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "CHAT_SYNC_TIMEOUT_SECS";
pub const ENV_SEND_ORDERING: &str = "CHAT_SYNC_SEND_ORDERING";

/// How concurrent sends are put on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SendOrdering {
    /// Requests run in parallel; the store follows completion order
    #[default]
    Concurrent,
    /// Requests queue FIFO; completion order equals issue order
    Serialized,
}

impl FromStr for SendOrdering {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "concurrent" => Ok(SendOrdering::Concurrent),
            "serialized" => Ok(SendOrdering::Serialized),
            other => bail!("Unknown send ordering '{}' (expected concurrent or serialized)", other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub api_url: String,
    pub request_timeout_secs: u64,
    pub send_ordering: SendOrdering,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            send_ordering: SendOrdering::default(),
        }
    }
}

impl ClientConfig {
    /// Load defaults, then the config file, then environment overrides, and validate.
    ///
    /// An explicit path must exist; the default `<config_dir>/chat-sync/config.toml` is optional.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let config = Self::load_layers(explicit_path)?;
        config.validate()?;
        Ok(config)
    }

    /// Same layering as [`load`](Self::load) but unvalidated, for callers that still apply
    /// their own overrides
    pub fn load_layers(explicit_path: Option<&Path>) -> Result<Self> {
        let mut config = match explicit_path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = get_app_config_dir().ok().map(|dir| dir.join(CONFIG_FILENAME));
                match default_path {
                    Some(path) if path.exists() => Self::from_file(&path)?,
                    _ => Self::default(),
                }
            }
        };

        config.apply_env_with(non_empty_env)?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ClientConfig = toml::from_str(content).context("Invalid TOML")?;
        Ok(config)
    }

    /// Apply `CHAT_SYNC_*` overrides using the given variable lookup
    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(url) = lookup(ENV_API_URL) {
            self.api_url = url;
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            self.request_timeout_secs = secs
                .parse()
                .with_context(|| format!("{} must be a whole number of seconds", ENV_TIMEOUT_SECS))?;
        }
        if let Some(ordering) = lookup(ENV_SEND_ORDERING) {
            self.send_ordering = ordering.parse()?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            bail!("api_url must start with http:// or https://, got '{}'", self.api_url);
        }
        if self.request_timeout_secs == 0 {
            bail!("request_timeout_secs must be greater than zero");
        }
        Ok(())
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
