//! Periodic unread-count poller.
//!
//! Fetches immediately on start, then on a fixed interval for the
//! lifetime of the task. Each result flows through the freshness
//! evaluator and is published on a channel; the task owns no UI state.
//!
//! Polls are serialized: a fetch still in flight delays the next tick
//! instead of overlapping it, so two polls can never race on the
//! watermark. Transient failures are logged and skipped; the next tick
//! retries naturally, no backoff.

use std::time::Duration;

use chrono::Utc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::api::ApiClient;
use crate::events::Event;
use crate::notify::freshness::FreshnessEvaluator;

/// Time-driven trigger for the evaluate-and-update flow.
pub struct Poller {
    api: ApiClient,
    evaluator: FreshnessEvaluator,
    user_id: String,
    interval: Duration,
}

/// Handle to a running poll loop. Dropping it without calling
/// [`PollerHandle::stop`] aborts the loop at the next tick.
pub struct PollerHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// Stop the poll loop and wait for the task to finish.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        let _ = self.task.await;
    }
}

impl Poller {
    pub fn new(
        api: ApiClient,
        evaluator: FreshnessEvaluator,
        user_id: impl Into<String>,
        interval: Duration,
    ) -> Self {
        Self {
            api,
            evaluator,
            user_id: user_id.into(),
            interval,
        }
    }

    /// One fetch + evaluate cycle.
    pub async fn poll_once(&self) -> Event {
        match self.api.unread_count(&self.user_id).await {
            Ok(count) => {
                let fresh = self.evaluator.observe(count);
                debug!(unread = fresh.unread, is_new = fresh.is_new, "poll completed");
                Event::CountObserved {
                    unread: fresh.unread,
                    is_new: fresh.is_new,
                    at: Utc::now(),
                }
            }
            Err(e) => {
                warn!("notification poll failed: {e}");
                Event::PollFailed {
                    reason: e.to_string(),
                    at: Utc::now(),
                }
            }
        }
    }

    /// Spawn the poll loop on the current tokio runtime. The first poll
    /// fires immediately. Events go to `events`; the loop also stops on
    /// its own if the receiver is dropped.
    pub fn spawn(self, events: mpsc::Sender<Event>) -> PollerHandle {
        let (shutdown, mut shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let event = self.poll_once().await;
                        if events.send(event).await.is_err() {
                            break;
                        }
                    }
                    _ = shutdown_rx.changed() => break,
                }
            }
        });
        PollerHandle { shutdown, task }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::watermark::WatermarkStore;
    use tempfile::TempDir;

    fn stats_body(unread: u64) -> String {
        format!(r#"{{"success": true, "stats": {{"by_status": {{"unread": {unread}}}}}}}"#)
    }

    #[tokio::test]
    async fn poll_once_latches_watermark_and_reports_growth() {
        let mut server = mockito::Server::new_async().await;
        let dir = TempDir::new().unwrap();
        let store = WatermarkStore::at(dir.path());
        let evaluator = FreshnessEvaluator::new(store.clone());
        let api = ApiClient::new(server.url());
        let poller = Poller::new(api, evaluator, "U1", Duration::from_secs(30));

        let first = server
            .mock("GET", "/api/notifications/stats/U1")
            .with_status(200)
            .with_body(stats_body(3))
            .create_async()
            .await;
        match poller.poll_once().await {
            Event::CountObserved { unread, is_new, .. } => {
                assert_eq!(unread, 3);
                assert!(!is_new); // first observation establishes the baseline
            }
            other => panic!("unexpected event: {other:?}"),
        }
        first.assert_async().await;
        assert_eq!(store.read().last_seen_count, 3);

        server
            .mock("GET", "/api/notifications/stats/U1")
            .with_status(200)
            .with_body(stats_body(7))
            .create_async()
            .await;
        match poller.poll_once().await {
            Event::CountObserved { unread, is_new, .. } => {
                assert_eq!(unread, 7);
                assert!(is_new);
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert_eq!(store.read().last_seen_count, 7);
    }

    #[tokio::test]
    async fn failed_poll_keeps_watermark_and_reports_reason() {
        let mut server = mockito::Server::new_async().await;
        let dir = TempDir::new().unwrap();
        let store = WatermarkStore::at(dir.path());
        store.write(5).unwrap();
        let poller = Poller::new(
            ApiClient::new(server.url()),
            FreshnessEvaluator::new(store.clone()),
            "U1",
            Duration::from_secs(30),
        );

        server
            .mock("GET", "/api/notifications/stats/U1")
            .with_status(500)
            .with_body(r#"{"success": false, "message": "database is down"}"#)
            .create_async()
            .await;

        match poller.poll_once().await {
            Event::PollFailed { reason, .. } => assert!(reason.contains("database is down")),
            other => panic!("unexpected event: {other:?}"),
        }
        // Existing watermark untouched by the failed cycle.
        assert_eq!(store.read().last_seen_count, 5);
    }

    #[tokio::test]
    async fn spawned_loop_polls_immediately_then_on_interval_and_stops() {
        let mut server = mockito::Server::new_async().await;
        let dir = TempDir::new().unwrap();
        let mock = server
            .mock("GET", "/api/notifications/stats/U1")
            .with_status(200)
            .with_body(stats_body(1))
            .expect_at_least(2)
            .create_async()
            .await;

        let poller = Poller::new(
            ApiClient::new(server.url()),
            FreshnessEvaluator::new(WatermarkStore::at(dir.path())),
            "U1",
            Duration::from_millis(50),
        );
        let (tx, mut rx) = mpsc::channel(16);
        let handle = poller.spawn(tx);

        // First event arrives without waiting for a full interval.
        let first = rx.recv().await.expect("first poll event");
        assert!(matches!(first, Event::CountObserved { unread: 1, .. }));
        let second = rx.recv().await.expect("second poll event");
        assert!(matches!(second, Event::CountObserved { .. }));

        // stop() waits for the task, so no orphaned timer survives it.
        handle.stop().await;
        mock.assert_async().await;
    }
}
