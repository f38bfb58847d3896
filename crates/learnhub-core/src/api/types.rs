//! Wire types for the notification endpoints.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Notification lifecycle status, as stored by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationStatus {
    Unread,
    Read,
    Archived,
}

impl NotificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationStatus::Unread => "unread",
            NotificationStatus::Read => "read",
            NotificationStatus::Archived => "archived",
        }
    }
}

impl std::fmt::Display for NotificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for NotificationStatus {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unread" => Ok(NotificationStatus::Unread),
            "read" => Ok(NotificationStatus::Read),
            "archived" => Ok(NotificationStatus::Archived),
            other => Err(ApiError::InvalidStatus(other.to_string())),
        }
    }
}

/// A single notification as returned by the list endpoint.
///
/// Timestamps are `"%Y-%m-%d %H:%M:%S"` strings on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub notification_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub entity_type: Option<String>,
    #[serde(default)]
    pub entity_id: Option<String>,
    pub message: String,
    pub timestamp: String,
    pub status: NotificationStatus,
    #[serde(default)]
    pub read_at: Option<String>,
}

/// Most recent notification summary inside the stats payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentNotification {
    pub message: String,
    pub timestamp: String,
}

/// Aggregated counts from the stats endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationStats {
    #[serde(default)]
    pub by_status: BTreeMap<String, u64>,
    #[serde(default)]
    pub by_type: BTreeMap<String, u64>,
    #[serde(default)]
    pub most_recent: Option<RecentNotification>,
}

impl NotificationStats {
    /// Unread entry of the by-status breakdown; an absent key means zero.
    pub fn unread(&self) -> u64 {
        self.by_status.get("unread").copied().unwrap_or(0)
    }
}

/// Request body for creating a notification.
#[derive(Debug, Clone, Serialize)]
pub struct NewNotification {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    pub user_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
}

/// API error types.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Server rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Invalid notification status: {0}")]
    InvalidStatus(String),
}
