//! HTTP client for the LearnHub notification endpoints.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::api::types::{
    ApiError, NewNotification, Notification, NotificationStats, NotificationStatus,
};

/// Async client for the notification REST API.
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct StatsEnvelope {
    #[serde(default)]
    stats: NotificationStats,
}

#[derive(Deserialize)]
struct ListEnvelope {
    #[serde(default)]
    notifications: Vec<Notification>,
}

#[derive(Deserialize)]
struct MessageEnvelope {
    #[serde(default)]
    message: String,
    #[serde(default)]
    notification_id: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    /// Decode a response, mapping non-2xx to [`ApiError::Rejected`] with
    /// the server's `message` field when present.
    async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ApiError> {
        let status = resp.status();
        if !status.is_success() {
            let message = resp
                .json::<serde_json::Value>()
                .await
                .ok()
                .and_then(|v| v["message"].as_str().map(str::to_string))
                .unwrap_or_else(|| status.to_string());
            return Err(ApiError::Rejected {
                status: status.as_u16(),
                message,
            });
        }
        Ok(resp.json::<T>().await?)
    }

    /// Fetch aggregated notification stats for a user.
    ///
    /// # Errors
    /// Returns an error on network failure or a rejected request.
    pub async fn stats(&self, user_id: &str) -> Result<NotificationStats, ApiError> {
        let url = format!("{}/api/notifications/stats/{user_id}", self.base_url);
        let resp = self.http.get(&url).send().await?;
        let envelope: StatsEnvelope = Self::decode(resp).await?;
        Ok(envelope.stats)
    }

    /// Current unread count for a user. A missing breakdown entry is zero.
    ///
    /// # Errors
    /// Returns an error on network failure or a rejected request.
    pub async fn unread_count(&self, user_id: &str) -> Result<u64, ApiError> {
        Ok(self.stats(user_id).await?.unread())
    }

    /// List a user's notifications, optionally filtered by status.
    ///
    /// # Errors
    /// Returns an error on network failure or a rejected request.
    pub async fn notifications(
        &self,
        user_id: &str,
        status: Option<NotificationStatus>,
    ) -> Result<Vec<Notification>, ApiError> {
        let mut url = format!("{}/api/notifications/{user_id}", self.base_url);
        if let Some(status) = status {
            url.push_str(&format!("?status={status}"));
        }
        let resp = self.http.get(&url).send().await?;
        let envelope: ListEnvelope = Self::decode(resp).await?;
        Ok(envelope.notifications)
    }

    /// Mark one notification as read.
    ///
    /// # Errors
    /// Returns an error on network failure or a rejected request.
    pub async fn mark_read(&self, notification_id: &str, user_id: &str) -> Result<(), ApiError> {
        let url = format!(
            "{}/api/notifications/{notification_id}/read/{user_id}",
            self.base_url
        );
        let resp = self.http.put(&url).send().await?;
        Self::decode::<MessageEnvelope>(resp).await?;
        Ok(())
    }

    /// Mark all of a user's unread notifications as read. Returns the
    /// server's summary message.
    ///
    /// # Errors
    /// Returns an error on network failure or a rejected request.
    pub async fn mark_all_read(&self, user_id: &str) -> Result<String, ApiError> {
        let url = format!("{}/api/notifications/read-all/{user_id}", self.base_url);
        let resp = self.http.put(&url).send().await?;
        let envelope: MessageEnvelope = Self::decode(resp).await?;
        Ok(envelope.message)
    }

    /// Archive one notification.
    ///
    /// # Errors
    /// Returns an error on network failure or a rejected request.
    pub async fn archive(&self, notification_id: &str, user_id: &str) -> Result<(), ApiError> {
        let url = format!(
            "{}/api/notifications/{notification_id}/archive/{user_id}",
            self.base_url
        );
        let resp = self.http.put(&url).send().await?;
        Self::decode::<MessageEnvelope>(resp).await?;
        Ok(())
    }

    /// Create a notification for one or more users. Returns the new
    /// notification id.
    ///
    /// # Errors
    /// Returns an error on network failure or a rejected request.
    pub async fn create(&self, notification: &NewNotification) -> Result<String, ApiError> {
        let url = format!("{}/api/notifications/create", self.base_url);
        let resp = self.http.post(&url).json(notification).send().await?;
        let envelope: MessageEnvelope = Self::decode(resp).await?;
        Ok(envelope.notification_id.unwrap_or_default())
    }
}
