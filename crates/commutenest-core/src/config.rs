//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which includes the housing service URL, the request timeout and the last
//! email used to sign in.
//!
//! Configuration is stored at `~/.config/commutenest/config.json`.
//! `COMMUTENEST_API_URL` and `COMMUTENEST_EMAIL` override the file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::client::DEFAULT_REQUEST_TIMEOUT_SECS;

/// Application name used for config/cache directory paths
const APP_NAME: &str = "commutenest";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Housing service used when nothing else is configured
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";

pub const API_URL_ENV: &str = "COMMUTENEST_API_URL";
pub const EMAIL_ENV: &str = "COMMUTENEST_EMAIL";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    pub api_base_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub last_email: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&contents).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    /// Location of the config file under the user's config directory
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory for the stored token and log files
    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    /// Housing service base URL: environment, then config file, then default.
    pub fn api_base_url(&self) -> String {
        Self::pick(std::env::var(API_URL_ENV).ok(), self.api_base_url.as_deref())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
    }

    /// Email to prefill the login form with
    pub fn default_email(&self) -> Option<String> {
        Self::pick(std::env::var(EMAIL_ENV).ok(), self.last_email.as_deref())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .filter(|secs| *secs > 0)
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    fn pick(env: Option<String>, file: Option<&str>) -> Option<String> {
        env.filter(|v| !v.trim().is_empty())
            .or_else(|| file.filter(|v| !v.trim().is_empty()).map(str::to_string))
    }
}
