//! SQLite-backed local cache.
//!
//! Values live in a single `kv_store` table reached through an r2d2 pool.
//! All database work runs in `spawn_blocking` to keep the async runtime
//! free.

use std::path::{Path, PathBuf};
use std::time::Duration;

use agencydesk_core::LocalCache;
use agencydesk_domain::{AgencyError, CacheConfig, Result};
use async_trait::async_trait;
use chrono::Utc;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, Connection, OptionalExtension};
use tokio::task;
use tracing::{debug, info, instrument};

use crate::errors::InfraError;

const SCHEMA_VERSION: i32 = 1;
const SCHEMA_SQL: &str = include_str!("schema.sql");
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

type SqlitePool = Pool<SqliteConnectionManager>;

/// Key-value cache persisted in a SQLite file
#[derive(Clone)]
pub struct SqliteCache {
    pool: SqlitePool,
    path: Option<PathBuf>,
}

impl SqliteCache {
    /// Open (or create) the cache file at `path` and bring its schema up to
    /// date.
    #[instrument(fields(db_path = %path.as_ref().display()))]
    pub fn open<P: AsRef<Path> + std::fmt::Debug>(path: P, pool_size: u32) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                AgencyError::Storage(format!("cannot create {}: {e}", parent.display()))
            })?;
        }

        let manager = SqliteConnectionManager::file(&path).with_init(configure_connection);
        let cache = Self::with_manager(manager, pool_size.max(1), Some(path))?;
        info!(max_connections = pool_size.max(1), "SQLite cache opened");
        Ok(cache)
    }

    /// Private in-memory database. The pool holds a single connection so
    /// every call sees the same data.
    pub fn in_memory() -> Result<Self> {
        let manager = SqliteConnectionManager::memory().with_init(configure_connection);
        Self::with_manager(manager, 1, None)
    }

    /// Open the cache described by the `[cache]` configuration section.
    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        match &config.path {
            Some(path) => Self::open(path, config.pool_size),
            None => Self::in_memory(),
        }
    }

    fn with_manager(
        manager: SqliteConnectionManager,
        pool_size: u32,
        path: Option<PathBuf>,
    ) -> Result<Self> {
        let pool = Pool::builder()
            .max_size(pool_size)
            .connection_timeout(BUSY_TIMEOUT)
            .build(manager)
            .map_err(map_pool_error)?;

        let cache = Self { pool, path };
        cache.run_migrations()?;
        Ok(cache)
    }

    /// File backing the cache, `None` when in memory.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Highest schema version recorded in the database. Read-only, so it
    /// doubles as a liveness check for the pool.
    pub async fn schema_version(&self) -> Result<i32> {
        self.blocking(current_version).await
    }

    fn connection(&self) -> Result<PooledConnection<SqliteConnectionManager>> {
        self.pool.get().map_err(map_pool_error)
    }

    fn run_migrations(&self) -> Result<()> {
        let conn = self.connection()?;
        conn.execute_batch(SCHEMA_SQL).map_err(map_sql_error)?;

        let found = current_version(&conn).map_err(map_sql_error)?;
        if found > SCHEMA_VERSION {
            return Err(AgencyError::Storage(format!(
                "cache schema version {found} is newer than supported version {SCHEMA_VERSION}"
            )));
        }
        if found < SCHEMA_VERSION {
            conn.execute(
                "INSERT OR IGNORE INTO schema_version (version, applied_at) VALUES (?1, ?2)",
                params![SCHEMA_VERSION, Utc::now().timestamp()],
            )
            .map_err(map_sql_error)?;
            debug!(from = found, to = SCHEMA_VERSION, "Cache schema migrated");
        }
        Ok(())
    }

    async fn blocking<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> rusqlite::Result<T> + Send + 'static,
    {
        let pool = self.pool.clone();
        task::spawn_blocking(move || -> Result<T> {
            let conn = pool.get().map_err(map_pool_error)?;
            op(&conn).map_err(map_sql_error)
        })
        .await
        .map_err(|e| AgencyError::Internal(format!("cache task failed: {e}")))?
    }
}

#[async_trait]
impl LocalCache for SqliteCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let key = key.to_string();
        self.blocking(move |conn| {
            conn.query_row("SELECT value FROM kv_store WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()
        })
        .await
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let key = key.to_string();
        self.blocking(move |conn| {
            conn.execute(
                "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value,
                                                updated_at = excluded.updated_at",
                params![key, value, Utc::now().timestamp()],
            )
            .map(drop)
        })
        .await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let key = key.to_string();
        self.blocking(move |conn| {
            conn.execute("DELETE FROM kv_store WHERE key = ?1", params![key]).map(drop)
        })
        .await
    }
}

fn configure_connection(conn: &mut Connection) -> rusqlite::Result<()> {
    conn.busy_timeout(BUSY_TIMEOUT)
}

fn current_version(conn: &Connection) -> rusqlite::Result<i32> {
    conn.query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |row| row.get(0))
}

fn map_sql_error(err: rusqlite::Error) -> AgencyError {
    AgencyError::from(InfraError::from(err))
}

fn map_pool_error(err: r2d2::Error) -> AgencyError {
    AgencyError::from(InfraError::from(err))
}
