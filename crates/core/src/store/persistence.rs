//! Local cache round-trips for the session and the audit trail

use agencydesk_domain::constants::{
    CACHE_KEY_ACTIVITY_LOGS, CACHE_KEY_AUTH, CACHE_KEY_CHANGE_LOGS, CACHE_KEY_ERROR_LOGS,
};
use agencydesk_domain::{ActivityLog, AuthState, ChangeLog, ErrorLog};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::state::StoreState;
use super::DataStore;

/// A document the store keeps in the local cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Slot {
    Auth,
    ActivityLogs,
    ErrorLogs,
    ChangeLogs,
}

impl Slot {
    pub(crate) const LOGS: [Slot; 3] = [Slot::ActivityLogs, Slot::ErrorLogs, Slot::ChangeLogs];

    fn key(self) -> &'static str {
        match self {
            Slot::Auth => CACHE_KEY_AUTH,
            Slot::ActivityLogs => CACHE_KEY_ACTIVITY_LOGS,
            Slot::ErrorLogs => CACHE_KEY_ERROR_LOGS,
            Slot::ChangeLogs => CACHE_KEY_CHANGE_LOGS,
        }
    }

    fn encode(self, state: &StoreState) -> serde_json::Result<String> {
        match self {
            Slot::Auth => serde_json::to_string(&state.auth),
            Slot::ActivityLogs => serde_json::to_string(state.trail.activity()),
            Slot::ErrorLogs => serde_json::to_string(state.trail.errors()),
            Slot::ChangeLogs => serde_json::to_string(state.trail.changes()),
        }
    }
}

/// Everything read back from the cache at startup
#[derive(Debug, Default)]
pub(crate) struct Restored {
    pub(crate) auth: AuthState,
    pub(crate) activity: Vec<ActivityLog>,
    pub(crate) errors: Vec<ErrorLog>,
    pub(crate) changes: Vec<ChangeLog>,
}

impl DataStore {
    /// Read every slot. Missing or unreadable values fall back to their
    /// defaults.
    pub(crate) async fn restore_cached(&self) -> Restored {
        Restored {
            auth: self.read_slot(Slot::Auth).await,
            activity: self.read_slot(Slot::ActivityLogs).await,
            errors: self.read_slot(Slot::ErrorLogs).await,
            changes: self.read_slot(Slot::ChangeLogs).await,
        }
    }

    async fn read_slot<T: DeserializeOwned + Default>(&self, slot: Slot) -> T {
        match self.cache.get(slot.key()).await {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                warn!(key = slot.key(), error = %err, "Ignoring corrupt cache entry");
                T::default()
            }),
            Ok(None) => {
                debug!(key = slot.key(), "No cached value");
                T::default()
            }
            Err(err) => {
                warn!(key = slot.key(), error = %err, "Failed to read cache entry");
                T::default()
            }
        }
    }

    /// Write the current value of each slot to the cache.
    ///
    /// Writes are serialized and each one encodes the state at the time it
    /// runs, so the cache always ends on the newest state. Failures are only
    /// logged; in-memory state stays authoritative.
    pub(crate) async fn persist(&self, slots: &[Slot]) {
        let _writer = self.persist_lock.lock().await;

        let payloads: Vec<(Slot, serde_json::Result<String>)> = {
            let state = self.state.read();
            slots.iter().map(|&slot| (slot, slot.encode(&state))).collect()
        };

        for (slot, payload) in payloads {
            let result = match payload {
                Ok(json) => self.cache.set(slot.key(), json).await,
                Err(err) => {
                    warn!(key = slot.key(), error = %err, "Failed to encode cache entry");
                    continue;
                }
            };
            if let Err(err) = result {
                warn!(key = slot.key(), error = %err, "Failed to write cache entry");
            }
        }
    }
}
