//! Shared test helpers for `agencydesk-core` integration tests.
//!
//! [`Harness`] wires a [`DataStore`] to in-memory collaborators so tests can
//! script the remote service and inspect the cache and notifications.

#![allow(dead_code)]

pub mod ports;
pub mod remote;

use std::sync::Arc;

use agencydesk_core::DataStore;
use agencydesk_domain::{EntityStatus, Password, User, UserRole};

pub use self::ports::{MemoryCache, RecordingNotifier, RecordingSink};
pub use self::remote::FakeRemote;

pub const ADMIN_EMAIL: &str = "ana@agency.test";
pub const ADMIN_PASSWORD: &str = "s3cret!";

pub struct Harness {
    pub store: DataStore,
    pub remote: Arc<FakeRemote>,
    pub cache: Arc<MemoryCache>,
    pub notifier: Arc<RecordingNotifier>,
    pub admin: User,
}

impl Harness {
    /// Store over a remote seeded with one active admin. Nobody is signed
    /// in yet.
    pub fn new() -> Self {
        Self::with_cache(Arc::new(FakeRemote::new()), Arc::new(MemoryCache::new()))
    }

    pub fn with_cache(remote: Arc<FakeRemote>, cache: Arc<MemoryCache>) -> Self {
        let admin = remote.seed_user(
            "Ana García",
            ADMIN_EMAIL,
            UserRole::Admin,
            EntityStatus::Active,
            ADMIN_PASSWORD,
        );
        Self::assemble(remote, cache, admin, None)
    }

    /// Build a store over existing collaborators, e.g. to simulate a restart.
    pub fn assemble(
        remote: Arc<FakeRemote>,
        cache: Arc<MemoryCache>,
        admin: User,
        sink: Option<Arc<RecordingSink>>,
    ) -> Self {
        let notifier = Arc::new(RecordingNotifier::default());
        let mut builder = DataStore::builder()
            .remote(remote.clone())
            .cache(cache.clone())
            .notifier(notifier.clone());
        if let Some(sink) = sink {
            builder = builder.audit_sink(sink);
        }
        let store = builder.build().expect("all ports provided");
        Self { store, remote, cache, notifier, admin }
    }

    /// Harness with the admin already signed in and collections loaded.
    pub async fn signed_in() -> Self {
        let harness = Self::new();
        harness.sign_in_admin().await;
        harness
    }

    pub async fn sign_in_admin(&self) {
        let outcome = self.store.login(ADMIN_EMAIL, &Password::from(ADMIN_PASSWORD)).await;
        assert!(outcome.success, "admin sign-in failed: {}", outcome.message);
    }
}

/// Every client's `task_count` equals the number of tasks referencing it.
pub fn assert_task_counts_consistent(store: &DataStore) {
    let tasks = store.tasks();
    for client in store.clients() {
        let expected = tasks.iter().filter(|t| t.client_id == client.id).count();
        assert_eq!(
            client.task_count as usize, expected,
            "task_count out of sync for client {}",
            client.name
        );
    }
}
