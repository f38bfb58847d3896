// Persisted acknowledgment watermark for notification alerts.
// Stored as `notification_watermark.json` in the data directory.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

const WATERMARK_FILE: &str = "notification_watermark.json";

/// The last unread count this machine has observed, plus when it was
/// last checked. `last_seen_count` of 0 with no timestamp is the
/// first-run state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Watermark {
    #[serde(default)]
    pub last_seen_count: u64,
    #[serde(default)]
    pub last_check_time: Option<DateTime<Utc>>,
}

/// Error type for watermark persistence.
#[derive(Debug, thiserror::Error)]
pub enum WatermarkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Durable store for the watermark, scoped to this machine profile.
///
/// Cheap to clone; all clones share the same backing file. Inject a
/// clone wherever the watermark is read or advanced instead of going
/// through a global.
#[derive(Debug, Clone)]
pub struct WatermarkStore {
    path: PathBuf,
}

impl WatermarkStore {
    /// Store backed by `notification_watermark.json` under `dir`.
    pub fn at(dir: &Path) -> Self {
        Self {
            path: dir.join(WATERMARK_FILE),
        }
    }

    /// Store in the default data directory.
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be resolved.
    pub fn open_default() -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self::at(&crate::storage::data_dir()?))
    }

    /// Read the current watermark.
    ///
    /// Never fails: a missing or unreadable file is the valid first-run
    /// state, not an error.
    pub fn read(&self) -> Watermark {
        match fs::read_to_string(&self.path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
            Err(_) => Watermark::default(),
        }
    }

    /// Persist `count` as the last seen unread count, stamped with now.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written.
    pub fn write(&self, count: u64) -> Result<(), WatermarkError> {
        let mark = Watermark {
            last_seen_count: count,
            last_check_time: Some(Utc::now()),
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&mark)?)?;
        Ok(())
    }

    /// Best-effort write. Losing freshness tracking only means a missed
    /// alert later, so a failure is logged and swallowed.
    pub fn write_best_effort(&self, count: u64) {
        if let Err(e) = self.write(count) {
            warn!("watermark write failed: {e}");
        }
    }
}
