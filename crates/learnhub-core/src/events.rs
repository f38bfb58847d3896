use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Every notification state change produces an Event.
/// The CLI watch loop consumes them; any other frontend could subscribe.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// A poll completed and the unread count was evaluated.
    CountObserved {
        unread: u64,
        is_new: bool,
        at: DateTime<Utc>,
    },
    /// A poll failed; the next scheduled tick retries naturally.
    PollFailed {
        reason: String,
        at: DateTime<Utc>,
    },
    /// The bell entered its alert state.
    AlertRaised {
        unread: u64,
        at: DateTime<Utc>,
    },
    /// The alert timed out without user action.
    AlertExpired {
        at: DateTime<Utc>,
    },
    /// The user clicked through to the notification list.
    Acknowledged {
        unread: u64,
        at: DateTime<Utc>,
    },
}
