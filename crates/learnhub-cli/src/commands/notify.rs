//! Notification subcommand: one-shot queries plus the watch loop.
//!
//! `watch` is the terminal rendition of the notification bell: a badge
//! line on every poll, a ring when something new arrives, Enter to
//! acknowledge, Ctrl-C to quit.

use std::time::Duration;

use chrono::Utc;
use clap::Subcommand;
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;

use learnhub_core::notify::AlertSound;
use learnhub_core::{
    ApiClient, Config, Event, FreshnessEvaluator, NewNotification, NotificationBell,
    NotificationStatus, Poller, SilentSound, TerminalBell, WatermarkStore,
};

/// Notification actions.
#[derive(Subcommand)]
pub enum NotifyAction {
    /// Show unread/read/archived counts
    Status,
    /// List notifications, optionally filtered by status
    List {
        /// Filter: unread, read, or archived
        #[arg(short, long)]
        status: Option<String>,
    },
    /// Mark one notification as read
    Read { notification_id: String },
    /// Mark all notifications as read
    ReadAll,
    /// Archive a notification
    Archive { notification_id: String },
    /// Send a notification to one or more users
    Send {
        /// Notification type (e.g. announcement, grade)
        #[arg(long)]
        kind: String,
        #[arg(long)]
        message: String,
        /// Recipient user id (repeatable)
        #[arg(long = "to", required = true)]
        user_ids: Vec<String>,
    },
    /// Record the current unread count as seen
    Ack,
    /// Poll for new notifications and alert on changes
    Watch {
        /// Poll interval in seconds (overrides config)
        #[arg(long)]
        interval: Option<u64>,
        /// Disable the terminal bell
        #[arg(long)]
        no_sound: bool,
    },
    /// Raise a simulated new-notification alert
    Test,
}

/// Run the notify command.
pub fn run(action: NotifyAction) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(dispatch(action))
}

fn configured_user(cfg: &Config) -> Result<String, Box<dyn std::error::Error>> {
    cfg.api.user_id.clone().ok_or_else(|| {
        "api.user_id is not configured; run `learnhub-cli config set api.user_id <id>`".into()
    })
}

async fn dispatch(action: NotifyAction) -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::load_or_default();
    let api = ApiClient::new(cfg.api.base_url.clone());

    match action {
        NotifyAction::Status => {
            let user_id = configured_user(&cfg)?;
            let stats = api.stats(&user_id).await?;
            println!("unread:   {}", stats.unread());
            println!("read:     {}", stats.by_status.get("read").copied().unwrap_or(0));
            println!(
                "archived: {}",
                stats.by_status.get("archived").copied().unwrap_or(0)
            );
            if !stats.by_type.is_empty() {
                println!("by type:");
                for (kind, count) in &stats.by_type {
                    println!("  {kind}: {count}");
                }
            }
            if let Some(recent) = &stats.most_recent {
                println!("latest:   {} ({})", recent.message, recent.timestamp);
            }
        }
        NotifyAction::List { status } => {
            let user_id = configured_user(&cfg)?;
            let status = status
                .map(|s| s.parse::<NotificationStatus>())
                .transpose()?;
            let notifications = api.notifications(&user_id, status).await?;
            if notifications.is_empty() {
                println!("No notifications.");
            }
            for n in notifications {
                println!(
                    "[{}] {} {} ({}) - {}",
                    n.status, n.timestamp, n.notification_id, n.kind, n.message
                );
            }
        }
        NotifyAction::Read { notification_id } => {
            let user_id = configured_user(&cfg)?;
            api.mark_read(&notification_id, &user_id).await?;
            println!("Notification {notification_id} marked as read");
        }
        NotifyAction::ReadAll => {
            let user_id = configured_user(&cfg)?;
            println!("{}", api.mark_all_read(&user_id).await?);
        }
        NotifyAction::Archive { notification_id } => {
            let user_id = configured_user(&cfg)?;
            api.archive(&notification_id, &user_id).await?;
            println!("Notification {notification_id} archived");
        }
        NotifyAction::Send {
            kind,
            message,
            user_ids,
        } => {
            let count = user_ids.len();
            let id = api
                .create(&NewNotification {
                    kind,
                    message,
                    user_ids,
                    entity_type: None,
                    entity_id: None,
                })
                .await?;
            println!("Notification {id} sent to {count} user(s)");
        }
        NotifyAction::Ack => {
            let user_id = configured_user(&cfg)?;
            let store = WatermarkStore::open_default()?;
            let count = api.unread_count(&user_id).await?;
            FreshnessEvaluator::new(store).acknowledge(count);
            println!("Acknowledged {count} unread notification(s)");
        }
        NotifyAction::Test => {
            let user_id = configured_user(&cfg)?;
            let store = WatermarkStore::open_default()?;
            let evaluator = FreshnessEvaluator::new(store.clone());
            let count = api.unread_count(&user_id).await?;
            // Explicit trigger path, independent of growth detection.
            let fresh = evaluator.observe_with_trigger(count, true);
            let mut bell = NotificationBell::new(
                store,
                Box::new(TerminalBell),
                cfg.notify.alert_duration_secs,
            );
            bell.observe(fresh.unread, fresh.is_new, Utc::now());
            if fresh.is_new {
                println!("Simulated alert raised ({} unread)", fresh.unread);
            } else {
                println!("Nothing unread; no alert to simulate");
            }
        }
        NotifyAction::Watch { interval, no_sound } => {
            let user_id = configured_user(&cfg)?;
            watch(&cfg, api, user_id, interval, no_sound).await?;
        }
    }
    Ok(())
}

async fn watch(
    cfg: &Config,
    api: ApiClient,
    user_id: String,
    interval: Option<u64>,
    no_sound: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !cfg.notify.enabled {
        return Err("notifications are disabled (notify.enabled = false)".into());
    }

    let store = WatermarkStore::open_default()?;
    let evaluator = FreshnessEvaluator::new(store.clone());
    let sound: Box<dyn AlertSound> = if no_sound || !cfg.notify.sound {
        Box::new(SilentSound)
    } else {
        Box::new(TerminalBell)
    };
    let mut bell = NotificationBell::new(store, sound, cfg.notify.alert_duration_secs);

    let interval = Duration::from_secs(interval.unwrap_or(cfg.notify.poll_interval_secs).max(1));
    let (tx, mut rx) = mpsc::channel(16);
    let handle = Poller::new(api, evaluator, user_id, interval).spawn(tx);

    println!("Watching for notifications (Enter to acknowledge, Ctrl-C to quit)...");
    let mut stdin = tokio::io::BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            maybe = rx.recv() => {
                let Some(event) = maybe else { break };
                let now = Utc::now();
                match event {
                    Event::CountObserved { unread, is_new, .. } => {
                        if bell.observe(unread, is_new, now).is_some() {
                            println!("! New notifications ({unread} unread)");
                        }
                        match bell.badge() {
                            Some(count) => println!("  unread: {count}"),
                            None => println!("  no unread notifications"),
                        }
                    }
                    Event::PollFailed { reason, .. } => {
                        eprintln!("  poll failed: {reason}");
                    }
                    _ => {}
                }
            }
            _ = tokio::time::sleep(Duration::from_secs(1)) => {
                if bell.tick(Utc::now()).is_some() {
                    println!("  alert cleared");
                }
            }
            line = stdin.next_line() => {
                if line?.is_none() {
                    break; // stdin closed
                }
                let event = bell.acknowledge(Utc::now());
                if let Event::Acknowledged { unread, .. } = event {
                    println!("  acknowledged ({unread} unread)");
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    handle.stop().await;
    println!("Stopped.");
    Ok(())
}
