//! Data synchronization store
//!
//! [`DataStore`] mirrors the remote users, clients and tasks in memory, owns
//! the session and the audit trail, and is the single writer of the local
//! cache. Every mutation goes to the remote service first; local state only
//! changes once the service has confirmed it.
//!
//! State lives behind a synchronous lock that is never held across an
//! `.await`. Concurrent operations therefore interleave at their remote
//! calls and the last response to land wins.

mod clients;
mod persistence;
mod queries;
mod session;
mod state;
mod tasks;
mod users;

use std::sync::Arc;

use agencydesk_domain::constants::MSG_ACCOUNT_INACTIVE;
use agencydesk_domain::{
    ActivityLog, AgencyError, AuthState, ChangeAction, ChangeLog, Client, CollectionKind,
    CollectionStatus, EntityKind, ErrorLog, Result, Task, User,
};
use chrono::Utc;
use parking_lot::RwLock;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use self::persistence::Slot;
use self::state::{LoadStatus, StoreState};
use crate::aggregates;
use crate::audit::{AuditSink, AuditTrail};
use crate::auth::AuthGateway;
use crate::cache_ports::LocalCache;
use crate::notification_ports::{Notification, Notifier};
use crate::records::{ClientGateway, TaskGateway, UserGateway};

/// In-memory mirror of the agency's data plus session and audit trail
pub struct DataStore {
    users_api: Arc<dyn UserGateway>,
    clients_api: Arc<dyn ClientGateway>,
    tasks_api: Arc<dyn TaskGateway>,
    auth_api: Arc<dyn AuthGateway>,
    cache: Arc<dyn LocalCache>,
    notifier: Arc<dyn Notifier>,
    audit_sink: Option<Arc<dyn AuditSink>>,
    state: RwLock<StoreState>,
    persist_lock: tokio::sync::Mutex<()>,
}

/// Audit entry produced by an operation, queued for the cache and the
/// optional remote sink once the state lock is released
#[derive(Debug, Clone)]
pub(crate) enum AuditEntry {
    Activity(ActivityLog),
    Error(ErrorLog),
    Change(ChangeLog),
}

/// A confirmed mutation to record in the activity and change logs
pub(crate) struct Mutation<'a> {
    pub(crate) kind: EntityKind,
    pub(crate) entity_id: &'a str,
    pub(crate) action: ChangeAction,
    pub(crate) description: String,
    pub(crate) location: &'static str,
    pub(crate) details: Value,
}

fn collection_label(kind: CollectionKind) -> &'static str {
    match kind {
        CollectionKind::Users => "users",
        CollectionKind::Clients => "clients",
        CollectionKind::Tasks => "tasks",
    }
}

/// Take a fetch result, recording its load status. Failures yield an empty
/// collection.
fn settle<T>(
    status: &mut LoadStatus,
    kind: CollectionKind,
    result: Result<Vec<T>>,
    failures: &mut Vec<(CollectionKind, AgencyError)>,
) -> Vec<T> {
    match result {
        Ok(items) => {
            status.set(kind, CollectionStatus::Loaded);
            items
        }
        Err(err) => {
            status.set(kind, CollectionStatus::Failed(err.message().to_string()));
            failures.push((kind, err));
            Vec::new()
        }
    }
}

impl DataStore {
    /// Start wiring a store. Every port except the audit sink is required.
    pub fn builder() -> DataStoreBuilder {
        DataStoreBuilder::default()
    }

    /// Restore the session and audit trail from the local cache and, when a
    /// session was restored, load the collections.
    #[instrument(skip(self))]
    pub async fn initialize(&self) {
        let restored = self.restore_cached().await;

        let session = {
            let mut state = self.state.write();
            state.trail = AuditTrail::restore(restored.activity, restored.errors, restored.changes);
            state.auth = restored.auth;
            state.auth.is_logged_in.then(|| state.auth.session_token.clone())
        };

        let Some(token) = session else {
            debug!("No cached session");
            return;
        };

        if self.resume(token).await {
            self.refresh().await;
        }
    }

    /// Re-attach to a cached session. Returns `false` when the session was
    /// ended instead.
    async fn resume(&self, token: Option<String>) -> bool {
        let Some(token) = token else {
            return true;
        };

        match self.auth_api.resume_session(&token).await {
            Ok(user) if user.is_active() => {
                info!(user_id = %user.id, "Resumed cached session");
                let user = users::with_avatar(user);
                self.state.write().auth = AuthState::signed_in(user, Some(token));
                self.persist(&[Slot::Auth]).await;
                true
            }
            Ok(user) => {
                info!(user_id = %user.id, "Cached session belongs to an inactive account");
                self.notifier.notify(Notification::warning(
                    "Signed out",
                    MSG_ACCOUNT_INACTIVE,
                ));
                self.end_session().await;
                false
            }
            Err(AgencyError::Auth(reason)) => {
                warn!(%reason, "Cached session is no longer valid");
                self.notifier
                    .notify(Notification::warning("Session expired", "Please sign in again"));
                self.end_session().await;
                false
            }
            Err(err) => {
                warn!(error = %err, "Could not verify cached session, keeping cached profile");
                true
            }
        }
    }

    /// Clear the session and collections without contacting the auth port.
    async fn end_session(&self) {
        {
            let mut state = self.state.write();
            state.auth = AuthState::signed_out();
            state.clear_collections();
        }
        self.persist(&[Slot::Auth]).await;
    }

    /// Fetch users, clients and tasks in parallel and replace the local
    /// copies. A failed fetch leaves its collection empty and marked
    /// [`CollectionStatus::Failed`].
    #[instrument(skip(self))]
    pub async fn refresh(&self) {
        {
            let mut state = self.state.write();
            if !state.auth.is_logged_in {
                debug!("Skipping refresh without a session");
                return;
            }
            state.status.set_all(&CollectionStatus::Loading);
        }

        let (fetched_users, fetched_clients, fetched_tasks) =
            futures::join!(self.users_api.list(), self.clients_api.list(), self.tasks_api.list());

        let mut failures = Vec::new();
        {
            let mut guard = self.state.write();
            if !guard.auth.is_logged_in {
                debug!("Session ended while loading, discarding results");
                return;
            }
            let state = &mut *guard;
            let status = &mut state.status;
            state.users = settle(status, CollectionKind::Users, fetched_users, &mut failures)
                .into_iter()
                .map(users::with_avatar)
                .collect();
            state.clients = settle(status, CollectionKind::Clients, fetched_clients, &mut failures);
            state.tasks = settle(status, CollectionKind::Tasks, fetched_tasks, &mut failures);
            aggregates::recount_all(&mut state.clients, &state.tasks);
            debug!(
                users = state.users.len(),
                clients = state.clients.len(),
                tasks = state.tasks.len(),
                "Collections loaded"
            );
        }

        for (kind, err) in failures {
            let label = collection_label(kind);
            warn!(collection = label, error = %err, "Failed to load collection");
            self.notifier.notify(Notification::from_error(format!("Failed to load {label}"), &err));
        }
    }

    /// Id of the signed-in user, taken before a remote call so the result can
    /// be checked against the session it was made for.
    pub(crate) fn session_owner(&self) -> Option<String> {
        self.state.read().auth.user().map(|user| user.id.clone())
    }

    /// Whether the session changed while a remote call was in flight. Its
    /// result then belongs to collections that no longer exist.
    pub(crate) fn session_changed(
        state: &StoreState,
        owner: Option<&str>,
        operation: &str,
    ) -> bool {
        let changed = state.auth.user().map(|user| user.id.as_str()) != owner;
        if changed {
            debug!(operation, "Session changed during remote call, skipping local merge");
        }
        changed
    }

    /// Report a failed remote call to the user and hand the error back.
    pub(crate) fn remote_failure(&self, title: &str, err: AgencyError) -> AgencyError {
        warn!(operation = title, kind = err.label(), error = %err, "Remote operation failed");
        self.notifier.notify(Notification::from_error(title, &err));
        err
    }

    /// Append the activity and change entries for a confirmed mutation.
    /// Nothing is recorded when nobody is signed in.
    pub(crate) fn audit_mutation(
        state: &mut StoreState,
        mutation: Mutation<'_>,
    ) -> Vec<AuditEntry> {
        let Some(actor) = state.actor() else {
            return Vec::new();
        };
        let now = Utc::now();
        let activity =
            state.trail.record_activity(&actor, mutation.description, mutation.location, now);
        let change = state.trail.record_change(
            &actor,
            mutation.kind,
            mutation.entity_id,
            mutation.action,
            mutation.details,
            now,
        );
        vec![AuditEntry::Activity(activity), AuditEntry::Change(change)]
    }

    /// Persist the logs touched by `entries` and forward them to the audit
    /// sink.
    pub(crate) async fn commit_audit(&self, entries: Vec<AuditEntry>) {
        if entries.is_empty() {
            return;
        }

        let mut slots = Vec::with_capacity(Slot::LOGS.len());
        for entry in &entries {
            let slot = match entry {
                AuditEntry::Activity(_) => Slot::ActivityLogs,
                AuditEntry::Error(_) => Slot::ErrorLogs,
                AuditEntry::Change(_) => Slot::ChangeLogs,
            };
            if !slots.contains(&slot) {
                slots.push(slot);
            }
        }
        self.persist(&slots).await;

        let Some(sink) = &self.audit_sink else {
            return;
        };
        for entry in &entries {
            let result = match entry {
                AuditEntry::Activity(log) => sink.record_activity(log).await,
                AuditEntry::Error(log) => sink.record_error(log).await,
                AuditEntry::Change(log) => sink.record_change(log).await,
            };
            if let Err(err) = result {
                warn!(error = %err, "Failed to forward audit entry");
            }
        }
    }

    // Snapshot accessors. Each returns an owned copy taken under the read
    // lock.

    /// Current session
    pub fn auth(&self) -> AuthState {
        self.state.read().auth.clone()
    }

    /// The signed-in user, if any
    pub fn current_user(&self) -> Option<User> {
        self.state.read().actor()
    }

    /// Whether a session is active
    pub fn is_logged_in(&self) -> bool {
        self.state.read().auth.is_logged_in
    }

    /// Loaded users, deactivated ones included
    pub fn users(&self) -> Vec<User> {
        self.state.read().users.clone()
    }

    /// Loaded clients with their derived task counts
    pub fn clients(&self) -> Vec<Client> {
        self.state.read().clients.clone()
    }

    /// Loaded tasks
    pub fn tasks(&self) -> Vec<Task> {
        self.state.read().tasks.clone()
    }

    /// Activity trail, oldest first
    pub fn activity_logs(&self) -> Vec<ActivityLog> {
        self.state.read().trail.activity().to_vec()
    }

    /// Error trail, oldest first
    pub fn error_logs(&self) -> Vec<ErrorLog> {
        self.state.read().trail.errors().to_vec()
    }

    /// Change trail, oldest first
    pub fn change_logs(&self) -> Vec<ChangeLog> {
        self.state.read().trail.changes().to_vec()
    }

    /// Load state of one mirrored collection
    pub fn collection_status(&self, kind: CollectionKind) -> CollectionStatus {
        self.state.read().status.get(kind).clone()
    }
}

/// Builder for [`DataStore`]
#[derive(Default)]
pub struct DataStoreBuilder {
    users: Option<Arc<dyn UserGateway>>,
    clients: Option<Arc<dyn ClientGateway>>,
    tasks: Option<Arc<dyn TaskGateway>>,
    auth: Option<Arc<dyn AuthGateway>>,
    cache: Option<Arc<dyn LocalCache>>,
    notifier: Option<Arc<dyn Notifier>>,
    audit_sink: Option<Arc<dyn AuditSink>>,
}

impl DataStoreBuilder {
    /// Remote port for user profiles
    pub fn users(mut self, gateway: Arc<dyn UserGateway>) -> Self {
        self.users = Some(gateway);
        self
    }

    /// Remote port for clients
    pub fn clients(mut self, gateway: Arc<dyn ClientGateway>) -> Self {
        self.clients = Some(gateway);
        self
    }

    /// Remote port for tasks
    pub fn tasks(mut self, gateway: Arc<dyn TaskGateway>) -> Self {
        self.tasks = Some(gateway);
        self
    }

    /// Authentication collaborator
    pub fn auth(mut self, gateway: Arc<dyn AuthGateway>) -> Self {
        self.auth = Some(gateway);
        self
    }

    /// Use one adapter for every remote port.
    pub fn remote<R>(self, remote: Arc<R>) -> Self
    where
        R: UserGateway + ClientGateway + TaskGateway + AuthGateway + 'static,
    {
        self.users(remote.clone()).clients(remote.clone()).tasks(remote.clone()).auth(remote)
    }

    /// Local cache for the session and audit trail
    pub fn cache(mut self, cache: Arc<dyn LocalCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Where user-facing notifications go
    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Mirror audit entries to a remote sink (optional).
    pub fn audit_sink(mut self, sink: Arc<dyn AuditSink>) -> Self {
        self.audit_sink = Some(sink);
        self
    }

    /// Build the store
    ///
    /// # Errors
    ///
    /// Returns [`AgencyError::Config`] if a required port is missing
    pub fn build(self) -> Result<DataStore> {
        fn missing(port: &str) -> AgencyError {
            AgencyError::Config(format!("{port} not set"))
        }

        Ok(DataStore {
            users_api: self.users.ok_or_else(|| missing("User gateway"))?,
            clients_api: self.clients.ok_or_else(|| missing("Client gateway"))?,
            tasks_api: self.tasks.ok_or_else(|| missing("Task gateway"))?,
            auth_api: self.auth.ok_or_else(|| missing("Auth gateway"))?,
            cache: self.cache.ok_or_else(|| missing("Local cache"))?,
            notifier: self.notifier.ok_or_else(|| missing("Notifier"))?,
            audit_sink: self.audit_sink,
            state: RwLock::new(StoreState::default()),
            persist_lock: tokio::sync::Mutex::new(()),
        })
    }
}
