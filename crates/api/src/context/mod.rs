//! Application context - dependency injection container
//!
//! Wires configuration, tracing and the infra adapters into a single shared
//! [`DataStore`]. The UI holds an [`AppContext`] and calls the store
//! directly; notifications arrive through [`AppContext::subscribe`].

use std::sync::Arc;

use agencydesk_core::{DataStore, Notification, Notifier};
use agencydesk_domain::{CollectionKind, CollectionStatus, Config, Result};
use agencydesk_infra::{
    config, observability, BroadcastNotifier, InMemoryBackend, RestDataService, SqliteCache,
    TracingNotifier,
};
use tokio::sync::broadcast;
use tracing::{debug, info, instrument, warn};

use crate::utils::health::{ComponentHealth, HealthStatus};

/// Where the store's remote ports are served from
#[derive(Clone)]
pub enum Backend {
    /// The remote data service over HTTP
    Remote(Arc<RestDataService>),
    /// Process-local data, for demos and offline work
    InMemory(Arc<InMemoryBackend>),
}

impl Backend {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Remote(_) => "remote",
            Self::InMemory(_) => "in-memory",
        }
    }
}

/// Logs every notification and forwards it to UI subscribers
struct UiNotifier {
    log: TracingNotifier,
    ui: BroadcastNotifier,
}

impl Notifier for UiNotifier {
    fn notify(&self, notification: Notification) {
        self.log.notify(notification.clone());
        self.ui.notify(notification);
    }
}

/// Application context - holds the store and the adapters behind it
pub struct AppContext {
    pub config: Config,
    pub store: Arc<DataStore>,
    pub backend: Backend,
    notifications: BroadcastNotifier,
    cache: Arc<SqliteCache>,
}

impl AppContext {
    /// Load `.env`, the configuration and the tracing subscriber, then build
    /// a context over the remote data service.
    pub async fn new() -> Result<Self> {
        let dotenv = dotenvy::dotenv();
        let config = config::load()?;
        observability::init_tracing(&config.logging)?;

        match dotenv {
            Ok(path) => debug!(path = %path.display(), "Loaded .env"),
            Err(err) => debug!(error = %err, "No .env file loaded"),
        }

        Self::new_with_config(config).await
    }

    /// Build a context over the remote data service described by `config`.
    pub async fn new_with_config(config: Config) -> Result<Self> {
        let remote = Arc::new(RestDataService::new(&config.api)?);
        Self::assemble(config, Backend::Remote(remote)).await
    }

    /// Build a context over a process-local backend.
    pub async fn offline(config: Config, backend: Arc<InMemoryBackend>) -> Result<Self> {
        Self::assemble(config, Backend::InMemory(backend)).await
    }

    #[instrument(skip_all, fields(backend = backend.label()))]
    async fn assemble(config: Config, backend: Backend) -> Result<Self> {
        let cache = Arc::new(SqliteCache::from_config(&config.cache)?);
        if cache.path().is_none() {
            debug!("No cache path configured, session will not survive restarts");
        }
        let notifications = BroadcastNotifier::default();
        let notifier = Arc::new(UiNotifier { log: TracingNotifier, ui: notifications.clone() });

        let builder = DataStore::builder().cache(cache.clone()).notifier(notifier);
        let builder = match &backend {
            Backend::Remote(remote) if config.api.forward_audit_logs => {
                builder.remote(remote.clone()).audit_sink(remote.clone())
            }
            Backend::Remote(remote) => builder.remote(remote.clone()),
            Backend::InMemory(memory) => builder.remote(memory.clone()),
        };
        let store = Arc::new(builder.build()?);

        store.initialize().await;
        info!(
            logged_in = store.is_logged_in(),
            forward_audit_logs = config.api.forward_audit_logs,
            "Application context ready"
        );

        Ok(Self { config, store, backend, notifications, cache })
    }

    /// Receive every notification raised after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.notifications.subscribe()
    }

    /// Check the cache and, for a signed-in session, the load state of every
    /// mirrored collection.
    pub async fn health_check(&self) -> HealthStatus {
        let mut status = HealthStatus::new().add_component(self.check_cache_health().await);

        if self.store.is_logged_in() {
            for kind in [CollectionKind::Users, CollectionKind::Clients, CollectionKind::Tasks] {
                let health = collection_health(kind, self.store.collection_status(kind));
                status = status.add_component(health);
            }
        }

        status.calculate_score();
        status
    }

    /// Read the schema version. The cache is never written here.
    async fn check_cache_health(&self) -> ComponentHealth {
        match self.cache.schema_version().await {
            Ok(version) => {
                debug!(schema_version = version, "Cache reachable");
                ComponentHealth::healthy("cache")
            }
            Err(err) => {
                warn!(error = %err, "Cache health check failed");
                ComponentHealth::unhealthy("cache", err.message())
            }
        }
    }

    /// Nothing needs explicit teardown: the cache pool and HTTP client close
    /// on drop. The session stays cached so the next start can resume it.
    pub async fn shutdown(&self) -> Result<()> {
        info!(
            backend = self.backend.label(),
            logged_in = self.store.is_logged_in(),
            "Shutting down"
        );
        Ok(())
    }
}

fn collection_health(kind: CollectionKind, status: CollectionStatus) -> ComponentHealth {
    let name = match kind {
        CollectionKind::Users => "users",
        CollectionKind::Clients => "clients",
        CollectionKind::Tasks => "tasks",
    };
    match status {
        CollectionStatus::Failed(reason) => ComponentHealth::unhealthy(name, reason),
        CollectionStatus::NotLoaded => ComponentHealth::unhealthy(name, "not loaded"),
        CollectionStatus::Loading | CollectionStatus::Loaded => ComponentHealth::healthy(name),
    }
}
