//! LearnHub notification REST API layer.
//!
//! Thin async wrapper over the backend's notification endpoints. The
//! backend wraps every payload in `{"success": bool, ...}` and carries
//! `{"success": false, "message": ...}` on non-2xx responses.

pub mod client;
pub mod types;

pub use client::ApiClient;
pub use types::{
    ApiError, NewNotification, Notification, NotificationStats, NotificationStatus,
    RecentNotification,
};
