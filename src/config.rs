// Configuration: a small JSON file in the user's config directory,
// overridable by the `RABBITHOLE_API_URL` environment variable and by
// command line flags (applied in `main.rs`).

use crate::notification::NotificationPermission;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const API_URL_ENV: &str = "RABBITHOLE_API_URL";
const DEFAULT_API_URL: &str = "http://localhost:3333";
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// How "Select file" asks for a path.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PickerKind {
    /// Native OS dialog (`rfd`).
    #[default]
    Native,
    /// Typed path in the terminal (`dialoguer`).
    Prompt,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Base URL of the upload API; `/uploads` is appended to it.
    pub api_url: String,
    pub notification_permission: NotificationPermission,
    pub picker: PickerKind,
    pub connect_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_url: DEFAULT_API_URL.into(),
            notification_permission: NotificationPermission::Unset,
            picker: PickerKind::Native,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// `<config dir>/rabbithole/config.json`, or `./rabbithole.json` when
    /// the platform has no config directory.
    pub fn default_path() -> PathBuf {
        match dirs::config_dir() {
            Some(dir) => dir.join("rabbithole").join("config.json"),
            None => PathBuf::from("rabbithole.json"),
        }
    }

    /// Load from the default location and apply the environment override.
    pub fn load() -> Result<Self> {
        Self::load_with_env(&Self::default_path(), std::env::var(API_URL_ENV).ok())
    }

    /// Read `path`, then let `api_url_env` (the value of
    /// `RABBITHOLE_API_URL`, if set) replace the stored API URL.
    pub fn load_with_env(path: &Path, api_url_env: Option<String>) -> Result<Self> {
        let mut config = Self::load_from(path)?;
        config.apply_api_url_override(api_url_env);
        Ok(config)
    }

    /// Read a config file. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("no config at {}, using defaults", path.display());
            return Ok(Config::default());
        }
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = serde_json::from_str(&data)
            .with_context(|| format!("Parsing config {}", path.display()))?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let data = serde_json::to_string_pretty(self)?;
        std::fs::write(path, data)
            .with_context(|| format!("Failed to write config {}", path.display()))?;
        Ok(())
    }

    /// Replace the API URL when `url` is set and non-blank.
    pub fn apply_api_url_override(&mut self, url: Option<String>) {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.api_url = url;
        }
    }
}
