//! # LearnHub Core Library
//!
//! Client-side logic for the LearnHub online learning platform. The server
//! owns all notification state; this library tracks what the local user has
//! already been shown so that alerts fire exactly once per change.
//!
//! ## Architecture
//!
//! - **Watermark Store**: durable record of the last unread count this
//!   machine has observed, persisted across restarts
//! - **Freshness Evaluator**: pure decision logic turning a polled unread
//!   count into an "alert or not" verdict
//! - **Poller**: tokio task that refetches the unread count on a fixed
//!   interval and publishes events
//! - **Bell**: wall-clock alert state machine driving badge, transient
//!   alert, and one-shot sound
//! - **API client**: thin async wrapper over the LearnHub notification
//!   REST endpoints
//!
//! ## Key Components
//!
//! - [`WatermarkStore`]: persistence for the acknowledgment watermark
//! - [`FreshnessEvaluator`]: evaluate-and-latch flow for polled counts
//! - [`Poller`]: periodic fetch loop with a start/stop contract
//! - [`NotificationBell`]: presentation binding (badge + alert + sound)
//! - [`ApiClient`]: remote notification endpoints
//! - [`Config`]: TOML-backed application configuration

pub mod api;
pub mod events;
pub mod notify;
pub mod storage;

pub use api::{
    ApiClient, ApiError, NewNotification, Notification, NotificationStats, NotificationStatus,
};
pub use events::Event;
pub use notify::{
    AlertSound, FreshnessEvaluator, NotificationBell, Poller, PollerHandle, SilentSound,
    TerminalBell, Watermark, WatermarkStore,
};
pub use storage::{data_dir, Config};
