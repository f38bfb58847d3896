//! TOML-based application configuration.
//!
//! Stores client settings:
//! - API endpoint and the signed-in user id
//! - Notification polling and alert behavior
//!
//! Configuration is stored at `~/.config/learnhub/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;

/// Remote API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the LearnHub backend.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Identifier of the signed-in user, as issued by the backend.
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Notification polling and alert configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Seconds between unread-count polls.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    /// Seconds before an untouched alert clears itself.
    #[serde(default = "default_alert_duration")]
    pub alert_duration_secs: u64,
    /// Attempt to play a sound when an alert fires.
    #[serde(default = "default_true")]
    pub sound: bool,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/learnhub/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
}

// Default functions
fn default_base_url() -> String {
    "http://localhost:5001".into()
}
fn default_poll_interval() -> u64 {
    30
}
fn default_alert_duration() -> u64 {
    10
}
fn default_true() -> bool {
    true
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_id: None,
        }
    }
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            poll_interval_secs: default_poll_interval(),
            alert_duration_secs: default_alert_duration(),
            sound: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            notify: NotifyConfig::default(),
        }
    }
}

impl Config {
    /// Path of the config file inside the data directory.
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be resolved.
    pub fn path() -> Result<PathBuf, Box<dyn std::error::Error>> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content)?;
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(Self::path()?, content)?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "api.base_url" => Some(self.api.base_url.clone()),
            "api.user_id" => self.api.user_id.clone(),
            "notify.enabled" => Some(self.notify.enabled.to_string()),
            "notify.poll_interval_secs" => Some(self.notify.poll_interval_secs.to_string()),
            "notify.alert_duration_secs" => Some(self.notify.alert_duration_secs.to_string()),
            "notify.sound" => Some(self.notify.sound.to_string()),
            _ => None,
        }
    }

    /// Set a config value by dot-separated key. Does not persist; call
    /// [`Config::save`] afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), Box<dyn std::error::Error>> {
        match key {
            "api.base_url" => self.api.base_url = value.to_string(),
            "api.user_id" => self.api.user_id = Some(value.to_string()),
            "notify.enabled" => self.notify.enabled = value.parse()?,
            "notify.poll_interval_secs" => self.notify.poll_interval_secs = value.parse()?,
            "notify.alert_duration_secs" => self.notify.alert_duration_secs = value.parse()?,
            "notify.sound" => self.notify.sound = value.parse()?,
            _ => return Err(format!("unknown config key: {key}").into()),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.api.base_url, "http://localhost:5001");
        assert_eq!(parsed.notify.poll_interval_secs, 30);
        assert_eq!(parsed.notify.alert_duration_secs, 10);
    }

    #[test]
    fn empty_toml_uses_field_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert!(cfg.notify.enabled);
        assert!(cfg.notify.sound);
        assert!(cfg.api.user_id.is_none());
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("notify.sound").as_deref(), Some("true"));
        assert_eq!(cfg.get("notify.poll_interval_secs").as_deref(), Some("30"));
        assert!(cfg.get("api.user_id").is_none());
        assert!(cfg.get("notify.missing_key").is_none());
    }

    #[test]
    fn set_updates_known_keys() {
        let mut cfg = Config::default();
        cfg.set("api.user_id", "U0000030").unwrap();
        cfg.set("notify.poll_interval_secs", "5").unwrap();
        assert_eq!(cfg.api.user_id.as_deref(), Some("U0000030"));
        assert_eq!(cfg.notify.poll_interval_secs, 5);
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(cfg.set("notify.nonexistent_key", "value").is_err());
    }

    #[test]
    fn set_rejects_invalid_type() {
        let mut cfg = Config::default();
        assert!(cfg.set("notify.sound", "not_a_bool").is_err());
        assert!(cfg.set("notify.poll_interval_secs", "fast").is_err());
    }
}
