//! Local storage layer: data directory resolution and TOML configuration.

mod config;

pub use config::{ApiConfig, Config, NotifyConfig};

use std::path::PathBuf;

/// Returns `~/.config/learnhub[-dev]/` based on LEARNHUB_ENV.
///
/// Set LEARNHUB_ENV=dev to use a separate development data directory.
///
/// # Errors
/// Returns an error if the home directory cannot be determined or if
/// creating the directory fails.
pub fn data_dir() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("LEARNHUB_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("learnhub-dev")
    } else {
        base_dir.join("learnhub")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
