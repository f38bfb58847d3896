//! Presentation binding for notification alerts.
//!
//! [`NotificationBell`] is a wall-clock state machine, same shape as the
//! rest of this crate's time-driven logic: no internal thread, the
//! caller passes `now` and periodically invokes `tick()` to expire a
//! stale alert.
//!
//! ```text
//! quiet -> alerting -> quiet        (timeout via tick, or acknowledge)
//! ```

use chrono::{DateTime, Duration, Utc};
use tracing::warn;

use crate::events::Event;
use crate::notify::watermark::WatermarkStore;

/// One-shot alert sound hook.
///
/// Playback is best-effort: a failing implementation degrades the alert
/// to visual-only, mirroring how browser autoplay policies can block a
/// sound without breaking the page.
pub trait AlertSound: Send {
    /// Attempt to play the sound once.
    ///
    /// # Errors
    /// Returns an error if playback is unavailable; callers log and move on.
    fn play(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// No sound at all.
pub struct SilentSound;

impl AlertSound for SilentSound {
    fn play(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Ok(())
    }
}

/// ASCII BEL on stdout, for terminal frontends.
pub struct TerminalBell;

impl AlertSound for TerminalBell {
    fn play(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        use std::io::Write;
        let mut out = std::io::stdout();
        out.write_all(b"\x07")?;
        out.flush()?;
        Ok(())
    }
}

/// Badge + transient alert + one-shot sound.
pub struct NotificationBell {
    store: WatermarkStore,
    sound: Box<dyn AlertSound>,
    alert_duration: Duration,
    badge: u64,
    alert_until: Option<DateTime<Utc>>,
}

impl NotificationBell {
    pub fn new(store: WatermarkStore, sound: Box<dyn AlertSound>, alert_duration_secs: u64) -> Self {
        Self {
            store,
            sound,
            alert_duration: Duration::seconds(alert_duration_secs as i64),
            badge: 0,
            alert_until: None,
        }
    }

    /// Apply one evaluated observation. Raises the alert (and plays the
    /// sound) when the observation is new; always refreshes the badge.
    pub fn observe(&mut self, unread: u64, is_new: bool, now: DateTime<Utc>) -> Option<Event> {
        self.badge = unread;
        if !is_new {
            return None;
        }

        self.alert_until = Some(now + self.alert_duration);
        if let Err(e) = self.sound.play() {
            warn!("notification sound blocked: {e}");
        }
        Some(Event::AlertRaised { unread, at: now })
    }

    /// Badge count, hidden when there is nothing unread.
    pub fn badge(&self) -> Option<u64> {
        (self.badge > 0).then_some(self.badge)
    }

    pub fn is_alerting(&self, now: DateTime<Utc>) -> bool {
        matches!(self.alert_until, Some(until) if now < until)
    }

    /// Expire a stale alert. Emits the expiry event exactly once.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<Event> {
        match self.alert_until {
            Some(until) if now >= until => {
                self.alert_until = None;
                Some(Event::AlertExpired { at: now })
            }
            _ => None,
        }
    }

    /// The user clicked through to the notification list: clear the
    /// alert immediately and latch the watermark at the badge count.
    pub fn acknowledge(&mut self, now: DateTime<Utc>) -> Event {
        self.alert_until = None;
        self.store.write_best_effort(self.badge);
        Event::Acknowledged {
            unread: self.badge,
            at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Sound hook that always fails, like a blocked autoplay.
    struct BlockedSound;

    impl AlertSound for BlockedSound {
        fn play(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            Err("playback denied".into())
        }
    }

    fn bell_at(dir: &TempDir, sound: Box<dyn AlertSound>) -> NotificationBell {
        NotificationBell::new(WatermarkStore::at(dir.path()), sound, 10)
    }

    #[test]
    fn new_observation_raises_alert_and_sets_badge() {
        let dir = TempDir::new().unwrap();
        let mut bell = bell_at(&dir, Box::new(SilentSound));
        let now = Utc::now();

        let event = bell.observe(7, true, now);
        assert!(matches!(event, Some(Event::AlertRaised { unread: 7, .. })));
        assert!(bell.is_alerting(now));
        assert_eq!(bell.badge(), Some(7));
    }

    #[test]
    fn alert_auto_clears_after_duration() {
        // Scenario C: untouched alert expires after 10 seconds.
        let dir = TempDir::new().unwrap();
        let mut bell = bell_at(&dir, Box::new(SilentSound));
        let now = Utc::now();

        bell.observe(7, true, now);
        let just_before = now + Duration::seconds(9);
        assert!(bell.is_alerting(just_before));
        assert!(bell.tick(just_before).is_none());

        let expired = now + Duration::seconds(10);
        assert!(matches!(bell.tick(expired), Some(Event::AlertExpired { .. })));
        assert!(!bell.is_alerting(expired));
        // Expiry event fires only once.
        assert!(bell.tick(expired + Duration::seconds(1)).is_none());
    }

    #[test]
    fn acknowledge_clears_alert_and_latches_watermark() {
        // Scenario D: clicking the bell beats the auto-clear.
        let dir = TempDir::new().unwrap();
        let store = WatermarkStore::at(dir.path());
        let mut bell = NotificationBell::new(store.clone(), Box::new(SilentSound), 10);
        let now = Utc::now();

        bell.observe(7, true, now);
        let ack_time = now + Duration::seconds(3);
        let event = bell.acknowledge(ack_time);
        assert!(matches!(event, Event::Acknowledged { unread: 7, .. }));
        assert!(!bell.is_alerting(ack_time));
        assert_eq!(store.read().last_seen_count, 7);
    }

    #[test]
    fn acknowledge_twice_leaves_watermark_unchanged() {
        let dir = TempDir::new().unwrap();
        let store = WatermarkStore::at(dir.path());
        let mut bell = NotificationBell::new(store.clone(), Box::new(SilentSound), 10);
        let now = Utc::now();

        bell.observe(7, true, now);
        bell.acknowledge(now);
        bell.acknowledge(now + Duration::seconds(1));
        assert_eq!(store.read().last_seen_count, 7);
    }

    #[test]
    fn badge_hidden_at_zero() {
        let dir = TempDir::new().unwrap();
        let mut bell = bell_at(&dir, Box::new(SilentSound));
        let now = Utc::now();

        bell.observe(2, false, now);
        assert_eq!(bell.badge(), Some(2));
        bell.observe(0, false, now);
        assert_eq!(bell.badge(), None);
    }

    #[test]
    fn badge_tracks_count_without_alert() {
        // Scenario E: count dropped server-side; badge follows quietly.
        let dir = TempDir::new().unwrap();
        let mut bell = bell_at(&dir, Box::new(SilentSound));
        let now = Utc::now();

        bell.observe(7, true, now);
        bell.tick(now + Duration::seconds(10));
        let event = bell.observe(2, false, now + Duration::seconds(30));
        assert!(event.is_none());
        assert_eq!(bell.badge(), Some(2));
        assert!(!bell.is_alerting(now + Duration::seconds(30)));
    }

    #[test]
    fn blocked_sound_still_raises_visual_alert() {
        let dir = TempDir::new().unwrap();
        let mut bell = bell_at(&dir, Box::new(BlockedSound));
        let now = Utc::now();

        let event = bell.observe(4, true, now);
        assert!(matches!(event, Some(Event::AlertRaised { .. })));
        assert!(bell.is_alerting(now));
    }
}
