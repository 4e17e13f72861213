//! Local persisted cache port.
//!
//! A string key-value store that survives restarts. The store writes the
//! auth state and the three audit logs here as JSON documents under the
//! `CACHE_KEY_*` constants from `agencydesk_domain::constants`.
//!
//! # Example
//!
//! ```no_run
//! use agencydesk_core::LocalCache;
//!
//! async fn has_session(cache: &impl LocalCache) -> bool {
//!     matches!(cache.get("auth").await, Ok(Some(_)))
//! }
//! ```

use agencydesk_domain::Result;
use async_trait::async_trait;

/// Port for the local key-value cache.
#[async_trait]
pub trait LocalCache: Send + Sync {
    /// Read the value stored under `key`, `None` when absent.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: String) -> Result<()>;

    /// Remove `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;
}
