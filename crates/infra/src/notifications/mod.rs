//! Notifier adapters
//!
//! [`TracingNotifier`] writes notifications to the log for headless runs.
//! [`BroadcastNotifier`] fans them out to any number of UI subscribers over
//! a `tokio` broadcast channel; slow subscribers lose the oldest messages.

use agencydesk_common::error::ErrorSeverity;
use agencydesk_core::{Notification, Notifier};
use tokio::sync::broadcast;
use tracing::{error, info, trace, warn};

const DEFAULT_CAPACITY: usize = 64;

/// Logs each notification at the level matching its severity
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        let Notification { severity, title, message } = notification;
        match severity {
            ErrorSeverity::Info => info!(target: "agencydesk::notify", %title, "{message}"),
            ErrorSeverity::Warning => warn!(target: "agencydesk::notify", %title, "{message}"),
            ErrorSeverity::Error | ErrorSeverity::Critical => {
                error!(target: "agencydesk::notify", %title, %severity, "{message}")
            }
        }
    }
}

/// Publishes notifications to every live subscriber
#[derive(Debug, Clone)]
pub struct BroadcastNotifier {
    sender: broadcast::Sender<Notification>,
}

impl Default for BroadcastNotifier {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl BroadcastNotifier {
    /// `capacity` is how many undelivered notifications each subscriber may
    /// lag behind.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Notifier for BroadcastNotifier {
    fn notify(&self, notification: Notification) {
        if self.sender.send(notification).is_err() {
            trace!("Notification dropped, no subscribers");
        }
    }
}
