//! Configuration Management
//!
//! Handles persistent configuration storage for the client: the base URL of
//! the FaaS and the auth token obtained from login. Environment variables
//! override the file on every read.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Base URL used when neither the environment nor the config file sets one
pub const DEFAULT_BASE_URL: &str = "http://localhost:9000";

/// Environment override for the base URL
pub const ENV_BASE_URL: &str = "FAAS_BASE_URL";

/// Environment override for the auth token
pub const ENV_TOKEN: &str = "FAAS_TOKEN";

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Base URL of the FaaS control plane
    #[serde(default)]
    pub base_url: Option<String>,
    /// Auth token from the last login
    #[serde(default)]
    pub token: Option<String>,
}

impl Config {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("faas-protocol").join("config.yaml"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => serde_yaml::from_str(&content).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };

        // Create parent directory
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Error::Config(e.to_string()))?;
        }

        let content = serde_yaml::to_string(self).map_err(|e| Error::Config(e.to_string()))?;
        std::fs::write(&path, content).map_err(|e| Error::Config(e.to_string()))?;

        Ok(())
    }

    /// Get effective base URL (env > config > default)
    pub fn effective_base_url(&self) -> String {
        std::env::var(ENV_BASE_URL)
            .ok()
            .filter(|v| !v.is_empty())
            .or_else(|| self.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    /// Get effective auth token (env > config, empty when logged out)
    pub fn effective_token(&self) -> String {
        std::env::var(ENV_TOKEN)
            .ok()
            .filter(|v| !v.is_empty())
            .or_else(|| self.token.clone())
            .unwrap_or_default()
    }

    /// Set token and save
    pub fn set_token(&mut self, token: &str) -> Result<()> {
        self.token = Some(token.to_string());
        self.save()
    }

    /// Set base URL and save
    pub fn set_base_url(&mut self, base_url: &str) -> Result<()> {
        self.base_url = Some(base_url.to_string());
        self.save()
    }
}
