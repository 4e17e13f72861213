//! Configuration structures
//!
//! Loaded by `agencydesk-infra::config` from environment variables or a
//! JSON/TOML file. Every section has defaults so partial files are accepted.

use serde::{Deserialize, Serialize};

/// Top-level application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Remote data service settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL without trailing slash, e.g. `http://localhost:3001`
    pub base_url: String,
    pub timeout_seconds: u64,
    /// Total attempts per request, initial try included.
    pub max_attempts: usize,
    pub backoff_millis: u64,
    /// Mirror audit entries to the remote log endpoints.
    pub forward_audit_logs: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3001".to_string(),
            timeout_seconds: 30,
            max_attempts: 3,
            backoff_millis: 200,
            forward_audit_logs: false,
        }
    }
}

/// Local persisted cache settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// SQLite file path. `None` keeps the cache in memory.
    pub path: Option<String>,
    pub pool_size: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { path: None, pool_size: 4 }
    }
}

/// Tracing subscriber settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `agencydesk_core=debug`
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), json: false }
    }
}
