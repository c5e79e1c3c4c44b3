//! # Sync Configuration
//!
//! Configuration for the replication controller.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     VELA_REMOTE_URL=https://couch.example.com/vela                     │
//! │     VELA_SYNC_ENABLED=false                                            │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/vela-pos/sync.toml (Linux)                               │
//! │     ~/Library/Application Support/com.vela.pos/sync.toml (macOS)       │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     No remote configured → replication stays idle                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # sync.toml
//! [remote]
//! url = "https://couch.example.com/vela"
//!
//! [replication]
//! enabled = true
//! poll_interval_secs = 5
//! batch_size = 100
//! initial_backoff_ms = 500
//! max_backoff_secs = 60
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{SyncError, SyncResult};

// =============================================================================
// Remote Endpoint
// =============================================================================

/// The remote replication endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Full database URL, e.g. `https://couch.example.com/vela`.
    /// Credentials go in the URL userinfo the way the remote expects.
    #[serde(default)]
    pub url: Option<String>,
}

// =============================================================================
// Replication Settings
// =============================================================================

/// Replication loop behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplicationSettings {
    /// Master switch; when false the controller never spawns.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Interval between push/pull cycles when idle (seconds).
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// Documents per push/pull batch.
    #[serde(default = "default_batch_size")]
    pub batch_size: u32,

    /// Initial backoff after a retryable failure (milliseconds).
    #[serde(default = "default_initial_backoff")]
    pub initial_backoff_ms: u64,

    /// Backoff ceiling (seconds).
    #[serde(default = "default_max_backoff")]
    pub max_backoff_secs: u64,

    /// HTTP request timeout (seconds).
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_true() -> bool {
    true
}
fn default_poll_interval() -> u64 {
    5
}
fn default_batch_size() -> u32 {
    100
}
fn default_initial_backoff() -> u64 {
    500
}
fn default_max_backoff() -> u64 {
    60
}
fn default_request_timeout() -> u64 {
    30
}

impl Default for ReplicationSettings {
    fn default() -> Self {
        ReplicationSettings {
            enabled: true,
            poll_interval_secs: default_poll_interval(),
            batch_size: default_batch_size(),
            initial_backoff_ms: default_initial_backoff(),
            max_backoff_secs: default_max_backoff(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

// =============================================================================
// Main Sync Configuration
// =============================================================================

/// Complete sync configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Remote endpoint.
    #[serde(default)]
    pub remote: RemoteConfig,

    /// Replication loop settings.
    #[serde(default)]
    pub replication: ReplicationSettings,
}

impl SyncConfig {
    /// Creates a config pointing at the given remote, defaults elsewhere.
    pub fn with_remote(url: impl Into<String>) -> Self {
        SyncConfig {
            remote: RemoteConfig {
                url: Some(url.into()),
            },
            replication: ReplicationSettings::default(),
        }
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (sync.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> SyncResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading sync config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load sync config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> SyncResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| SyncError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| SyncError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| SyncError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Sync config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> SyncResult<()> {
        if let Some(ref raw) = self.remote.url {
            let url = Url::parse(raw).map_err(|e| SyncError::InvalidUrl(e.to_string()))?;
            if url.scheme() != "http" && url.scheme() != "https" {
                return Err(SyncError::InvalidUrl(format!(
                    "Remote URL must be http(s), got scheme '{}'",
                    url.scheme()
                )));
            }
        }

        if self.replication.batch_size == 0 {
            return Err(SyncError::InvalidConfig(
                "batch_size must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("VELA_REMOTE_URL") {
            debug!(url = %url, "Overriding remote URL from environment");
            self.remote.url = Some(url);
        }

        if let Ok(enabled) = std::env::var("VELA_SYNC_ENABLED") {
            if let Ok(parsed) = enabled.parse::<bool>() {
                self.replication.enabled = parsed;
            }
        }

        if let Ok(interval) = std::env::var("VELA_SYNC_POLL_INTERVAL") {
            if let Ok(secs) = interval.parse::<u64>() {
                self.replication.poll_interval_secs = secs;
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "vela", "pos")
            .map(|dirs| dirs.config_dir().join("sync.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Remote URL, if one is configured.
    pub fn remote_url(&self) -> Option<&str> {
        self.remote.url.as_deref()
    }

    /// True when replication can actually run.
    pub fn is_enabled(&self) -> bool {
        self.replication.enabled && self.remote.url.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_idle() {
        let config = SyncConfig::default();
        assert!(config.validate().is_ok());
        assert!(!config.is_enabled());
        assert_eq!(config.replication.batch_size, 100);
    }

    #[test]
    fn test_validation_rejects_bad_urls() {
        let mut config = SyncConfig::with_remote("https://couch.example.com/vela");
        assert!(config.validate().is_ok());
        assert!(config.is_enabled());

        config.remote.url = Some("ws://couch.example.com/vela".into());
        assert!(config.validate().is_err());

        config.remote.url = Some("not a url".into());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let mut config = SyncConfig::default();
        config.replication.batch_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = SyncConfig::with_remote("https://couch.example.com/vela");
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[remote]"));
        assert!(toml_str.contains("[replication]"));

        let parsed: SyncConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.remote_url(), Some("https://couch.example.com/vela"));
    }
}
