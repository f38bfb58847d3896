//! Notification freshness tracking.
//!
//! The server is the source of truth for unread counts; this module only
//! decides when the local user should be alerted about a change. The
//! persisted watermark suppresses duplicate alerts across restarts.

pub mod bell;
pub mod freshness;
pub mod poller;
pub mod watermark;

pub use bell::{AlertSound, NotificationBell, SilentSound, TerminalBell};
pub use freshness::{explicitly_flagged, growth_detected, Freshness, FreshnessEvaluator};
pub use poller::{Poller, PollerHandle};
pub use watermark::{Watermark, WatermarkError, WatermarkStore};
