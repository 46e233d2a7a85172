// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! User configuration.
//!
//! Stored as TOML in `config.toml` under the platform config directory
//! (`~/.config/fittrack/` on Linux). Every field has a default, so a missing
//! file or a partial one is fine.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::channel::ChannelConfig;
use crate::error::{Error, Result};
use crate::intercept::InterceptConfig;

const APP_DIR_NAME: &str = "fittrack";
const CONFIG_FILE_NAME: &str = "config.toml";
const DB_FILE_NAME: &str = "offline.db";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub channel: RealtimeConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

/// REST API settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Versioned API root, e.g. `http://localhost:5000/api/v1`.
    #[serde(default = "default_api_url")]
    pub base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

/// Realtime channel settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealtimeConfig {
    #[serde(default = "default_channel_url")]
    pub url: String,
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// Heartbeat ping interval.
    #[serde(default = "default_heartbeat_interval_ms")]
    pub heartbeat_interval_ms: u64,
    /// First reconnect delay; each further attempt doubles it.
    #[serde(default = "default_reconnect_base_delay_ms")]
    pub reconnect_base_delay_ms: u64,
    #[serde(default = "default_reconnect_max_attempts")]
    pub reconnect_max_attempts: u32,
}

/// Offline store location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Database file. Defaults to the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Interception layer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Origin the application shell is served from.
    #[serde(default = "default_origin")]
    pub origin: String,
    #[serde(default = "default_name_prefix")]
    pub name_prefix: String,
    /// Cache generation tag; changing it retires every older cache on activate.
    #[serde(default = "default_generation")]
    pub generation: String,
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,
    #[serde(default = "default_shell_path")]
    pub shell_path: String,
    #[serde(default = "default_static_assets")]
    pub static_assets: Vec<String>,
}

fn default_api_url() -> String {
    "http://localhost:5000/api/v1".to_string()
}

fn default_request_timeout_secs() -> u64 {
    15
}

fn default_channel_url() -> String {
    "ws://localhost:5000".to_string()
}

fn default_connect_timeout_ms() -> u64 {
    10_000
}

fn default_heartbeat_interval_ms() -> u64 {
    30_000
}

fn default_reconnect_base_delay_ms() -> u64 {
    1_000
}

fn default_reconnect_max_attempts() -> u32 {
    5
}

fn default_origin() -> String {
    "http://localhost:3000".to_string()
}

fn default_name_prefix() -> String {
    "fittrack".to_string()
}

fn default_generation() -> String {
    "v1.0.0".to_string()
}

fn default_api_prefix() -> String {
    "/api/".to_string()
}

fn default_shell_path() -> String {
    "/".to_string()
}

fn default_static_assets() -> Vec<String> {
    [
        "/",
        "/static/js/bundle.js",
        "/static/css/main.css",
        "/manifest.json",
        "/icons/icon-192x192.png",
        "/icons/icon-512x512.png",
        "https://fonts.googleapis.com/css2?family=Inter:wght@300;400;500;600;700&display=swap",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: default_api_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        RealtimeConfig {
            url: default_channel_url(),
            connect_timeout_ms: default_connect_timeout_ms(),
            heartbeat_interval_ms: default_heartbeat_interval_ms(),
            reconnect_base_delay_ms: default_reconnect_base_delay_ms(),
            reconnect_max_attempts: default_reconnect_max_attempts(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            origin: default_origin(),
            name_prefix: default_name_prefix(),
            generation: default_generation(),
            api_prefix: default_api_prefix(),
            shell_path: default_shell_path(),
            static_assets: default_static_assets(),
        }
    }
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl RealtimeConfig {
    pub fn to_channel_config(&self) -> ChannelConfig {
        ChannelConfig {
            url: self.url.clone(),
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            heartbeat_interval: Duration::from_millis(self.heartbeat_interval_ms),
            reconnect_base_delay: Duration::from_millis(self.reconnect_base_delay_ms),
            max_reconnect_attempts: self.reconnect_max_attempts,
        }
    }
}

impl CacheConfig {
    pub fn to_intercept_config(&self) -> Result<InterceptConfig> {
        let origin = Url::parse(&self.origin).map_err(|_| Error::InvalidUrl(self.origin.clone()))?;
        Ok(InterceptConfig {
            origin,
            name_prefix: self.name_prefix.clone(),
            generation: self.generation.clone(),
            api_prefix: self.api_prefix.clone(),
            shell_path: self.shell_path.clone(),
            static_assets: self.static_assets.clone(),
        })
    }
}

impl Config {
    /// Loads configuration from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Config::default()),
            Err(e) => return Err(Error::Config(format!("failed to read config: {}", e))),
        };
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Rejects values the subsystem cannot run with.
    pub fn validate(&self) -> Result<()> {
        let api = Url::parse(&self.api.base_url).ok();
        if !api.is_some_and(|u| matches!(u.scheme(), "http" | "https")) {
            return Err(Error::Config(format!(
                "api.base_url '{}' must be an http:// or https:// URL",
                self.api.base_url
            )));
        }
        let channel = Url::parse(&self.channel.url).ok();
        if !channel.is_some_and(|u| matches!(u.scheme(), "ws" | "wss")) {
            return Err(Error::Config(format!(
                "channel.url '{}' must be a ws:// or wss:// URL",
                self.channel.url
            )));
        }
        if Url::parse(&self.cache.origin).is_err() {
            return Err(Error::Config(format!("cache.origin '{}' is not a URL", self.cache.origin)));
        }

        let nonzero = [
            ("api.request_timeout_secs", self.api.request_timeout_secs),
            ("channel.connect_timeout_ms", self.channel.connect_timeout_ms),
            ("channel.heartbeat_interval_ms", self.channel.heartbeat_interval_ms),
            ("channel.reconnect_base_delay_ms", self.channel.reconnect_base_delay_ms),
            ("channel.reconnect_max_attempts", u64::from(self.channel.reconnect_max_attempts)),
        ];
        if let Some((field, _)) = nonzero.iter().find(|(_, value)| *value == 0) {
            return Err(Error::Config(format!("{} must be greater than zero", field)));
        }
        if self.cache.generation.is_empty() || self.cache.name_prefix.is_empty() {
            return Err(Error::Config("cache.name_prefix and cache.generation cannot be empty".into()));
        }
        Ok(())
    }

    /// Database file path: the configured one, or the platform data directory.
    pub fn store_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.store.path {
            return Ok(path.clone());
        }
        dirs::data_local_dir()
            .map(|dir| dir.join(APP_DIR_NAME).join(DB_FILE_NAME))
            .ok_or_else(|| Error::Config("no data directory; set store.path".to_string()))
    }
}

/// Config file path: `explicit` if given, else the platform config directory.
pub fn config_path(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
        .ok_or_else(|| Error::Config("no config directory; pass --config".to_string()))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
