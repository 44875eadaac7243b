//! Identity persistence with atomic writes
//!
//! The active email survives restarts in `identity.json` under the app config directory:
//! - macOS: `~/Library/Application Support/chat-sync/`
//! - Linux: `~/.config/chat-sync/`
//! - Windows: `%APPDATA%\chat-sync\`

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::Identity;

const IDENTITY_FILENAME: &str = "identity.json";

/// Externally persisted identity slot
pub trait IdentityStore: Send + Sync {
    fn get(&self) -> Result<Option<Identity>>;
    fn set(&self, identity: &Identity) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

#[derive(Debug, Serialize, Deserialize)]
struct IdentityFile {
    email: Identity,
}

/// Identity stored as JSON in a directory
#[derive(Debug, Clone)]
pub struct FileIdentityStore {
    dir: PathBuf,
}

impl FileIdentityStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store rooted at the platform config directory
    pub fn in_config_dir() -> Result<Self> {
        Ok(Self::new(crate::utils::get_app_config_dir()?))
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(IDENTITY_FILENAME)
    }

    fn ensure_dir(&self) -> Result<&Path> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir).with_context(|| {
                format!("Failed to create config directory: {}", self.dir.display())
            })?;
        }
        Ok(&self.dir)
    }
}

impl IdentityStore for FileIdentityStore {
    /// Missing or unreadable files count as "no identity" so a corrupt file never blocks startup
    fn get(&self) -> Result<Option<Identity>> {
        let path = self.path();
        if !path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read identity file: {}", path.display()))?;
        match serde_json::from_str::<IdentityFile>(&json) {
            Ok(file) => Ok(Some(file.email)),
            Err(e) => {
                tracing::warn!("Ignoring unreadable identity file {}: {}", path.display(), e);
                Ok(None)
            }
        }
    }

    fn set(&self, identity: &Identity) -> Result<()> {
        let dir = self.ensure_dir()?;

        // Write atomically (temp file + rename)
        let path = dir.join(IDENTITY_FILENAME);
        let temp = dir.join(format!("{}.tmp", IDENTITY_FILENAME));
        let json = serde_json::to_string_pretty(&IdentityFile { email: identity.clone() })
            .context("Failed to serialize identity")?;
        fs::write(&temp, json).context("Failed to write identity temp file")?;
        fs::rename(&temp, &path).context("Failed to rename identity temp file")?;

        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let path = self.path();
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to remove identity file: {}", path.display()))?;
        }
        Ok(())
    }
}

/// Process-local identity slot
#[derive(Debug, Default)]
pub struct MemoryIdentityStore {
    identity: Mutex<Option<Identity>>,
}

impl IdentityStore for MemoryIdentityStore {
    fn get(&self) -> Result<Option<Identity>> {
        Ok(self.identity.lock().unwrap_or_else(PoisonError::into_inner).clone())
    }

    fn set(&self, identity: &Identity) -> Result<()> {
        *self.identity.lock().unwrap_or_else(PoisonError::into_inner) = Some(identity.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.identity.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}
