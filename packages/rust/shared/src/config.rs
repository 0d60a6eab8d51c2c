//! Persisted configuration for the WonderChat CLI.
//!
//! Settings live in a single JSON object (default file `.env` in the working
//! directory):
//!
//! ```json
//! {"api_token": "...", "chatbot_id": "...", "debug": false}
//! ```
//!
//! A missing file is created with placeholder values. The menu reloads the
//! file at the top of every iteration, so edits apply on the next pass.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, WonderchatError};

/// Default configuration file name, relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = ".env";

/// Token written to a freshly created config file.
pub const PLACEHOLDER_API_TOKEN: &str = "REPLACE_WITH_API_KEY";

/// Chatbot id written to a freshly created config file.
pub const PLACEHOLDER_CHATBOT_ID: &str = "REPLACE_WITH_BOT_ID";

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// The three persisted settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    /// API key for the chatbot account.
    #[serde(default)]
    pub api_token: String,

    /// Identifier of the chatbot to drive.
    #[serde(default)]
    pub chatbot_id: String,

    /// Echo every request and pause before sending it.
    #[serde(default)]
    pub debug: bool,
}

impl Configuration {
    /// The values written on first run.
    pub fn placeholder() -> Self {
        Self {
            api_token: PLACEHOLDER_API_TOKEN.into(),
            chatbot_id: PLACEHOLDER_CHATBOT_ID.into(),
            debug: false,
        }
    }

    /// Both identifiers are non-empty.
    pub fn is_complete(&self) -> bool {
        !self.api_token.is_empty() && !self.chatbot_id.is_empty()
    }

    /// Fail unless both identifiers are set. Every operation except editing
    /// the configuration requires this.
    pub fn ensure_complete(&self) -> Result<()> {
        if self.is_complete() {
            Ok(())
        } else {
            Err(WonderchatError::config(
                "API Token and Chatbot ID must be valid.",
            ))
        }
    }
}

// ---------------------------------------------------------------------------
// ConfigStore
// ---------------------------------------------------------------------------

/// Loads and saves a [`Configuration`] at a fixed path.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Store backed by `path`. Nothing is read until [`ConfigStore::load`].
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store backed by [`DEFAULT_CONFIG_FILE`] in the working directory.
    pub fn in_working_dir() -> Self {
        Self::new(DEFAULT_CONFIG_FILE)
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the configuration, writing placeholders first if the file is missing.
    pub fn load(&self) -> Result<Configuration> {
        if !self.path.exists() {
            tracing::info!(path = ?self.path, "config file not found, writing placeholders");
            let config = Configuration::placeholder();
            self.save(&config)?;
            return Ok(config);
        }

        let content =
            std::fs::read_to_string(&self.path).map_err(|e| WonderchatError::io(&self.path, e))?;

        serde_json::from_str(&content).map_err(|e| {
            WonderchatError::config(format!("failed to parse {}: {e}", self.path.display()))
        })
    }

    /// Persist `config`, replacing the file contents.
    pub fn save(&self, config: &Configuration) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| WonderchatError::io(parent, e))?;
            }
        }

        let content = serde_json::to_string(config)
            .map_err(|e| WonderchatError::config(e.to_string()))?;
        std::fs::write(&self.path, content).map_err(|e| WonderchatError::io(&self.path, e))?;
        tracing::info!(path = ?self.path, debug = config.debug, "saved config file");

        Ok(())
    }
}
