use std::path::PathBuf;

use anyhow::{Context, Result};

/// Directory name used under the platform config directory
pub const APP_DIR_NAME: &str = "chat-sync";

/// Get the app config directory (e.g. ~/.config/chat-sync on Linux)
pub fn get_app_config_dir() -> Result<PathBuf> {
    let base = dirs::config_dir().context("Failed to get platform config directory")?;
    Ok(base.join(APP_DIR_NAME))
}

/// Read an environment variable, treating empty values as unset
pub fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
