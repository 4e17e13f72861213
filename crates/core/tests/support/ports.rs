//! Local collaborators: cache, notifier and audit sink

use std::collections::HashMap;
use std::sync::Mutex;

use agencydesk_common::error::ErrorSeverity;
use agencydesk_core::{AuditSink, LocalCache, Notification, Notifier};
use agencydesk_domain::{ActivityLog, AgencyError, ChangeLog, ErrorLog, Result as DomainResult};
use async_trait::async_trait;

/// Cache backed by a `HashMap`. Can be pre-seeded to simulate a restart.
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(self, key: &str, value: impl Into<String>) -> Self {
        self.entries.lock().unwrap().insert(key.to_string(), value.into());
        self
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    /// Copy every entry into a fresh cache, as if the process restarted.
    pub fn restart(&self) -> Self {
        Self { entries: Mutex::new(self.entries.lock().unwrap().clone()) }
    }
}

#[async_trait]
impl LocalCache for MemoryCache {
    async fn get(&self, key: &str) -> DomainResult<Option<String>> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> DomainResult<()> {
        self.entries.lock().unwrap().insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> DomainResult<()> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}

/// Notifier that keeps everything it was asked to show
#[derive(Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn all(&self) -> Vec<Notification> {
        self.seen.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<Notification> {
        self.all().into_iter().filter(|n| n.severity >= ErrorSeverity::Error).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen.lock().unwrap().push(notification);
    }
}

/// Audit sink that records forwarded entries, optionally failing every call
#[derive(Default)]
pub struct RecordingSink {
    activity: Mutex<Vec<ActivityLog>>,
    errors: Mutex<Vec<ErrorLog>>,
    changes: Mutex<Vec<ChangeLog>>,
    offline: bool,
}

impl RecordingSink {
    pub fn offline() -> Self {
        Self { offline: true, ..Self::default() }
    }

    pub fn activity(&self) -> Vec<ActivityLog> {
        self.activity.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<ErrorLog> {
        self.errors.lock().unwrap().clone()
    }

    pub fn changes(&self) -> Vec<ChangeLog> {
        self.changes.lock().unwrap().clone()
    }

    fn check(&self) -> DomainResult<()> {
        if self.offline {
            Err(AgencyError::Network("audit sink offline".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl AuditSink for RecordingSink {
    async fn record_activity(&self, entry: &ActivityLog) -> DomainResult<()> {
        self.check()?;
        self.activity.lock().unwrap().push(entry.clone());
        Ok(())
    }

    async fn record_error(&self, entry: &ErrorLog) -> DomainResult<()> {
        self.check()?;
        self.errors.lock().unwrap().push(entry.clone());
        Ok(())
    }

    async fn record_change(&self, entry: &ChangeLog) -> DomainResult<()> {
        self.check()?;
        self.changes.lock().unwrap().push(entry.clone());
        Ok(())
    }
}
