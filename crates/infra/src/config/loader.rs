//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. If `AGENCYDESK_API_BASE_URL` is set, the configuration comes from the
//!    environment, with defaults for every unset variable
//! 2. Otherwise the standard locations are probed for a config file
//! 3. With neither, built-in defaults apply (local development service)
//!
//! ## Environment Variables
//! - `AGENCYDESK_API_BASE_URL`: Remote data service base URL
//! - `AGENCYDESK_API_TIMEOUT_SECS`: Per-request timeout in seconds
//! - `AGENCYDESK_API_FORWARD_AUDIT`: Mirror audit entries remotely (true/false)
//! - `AGENCYDESK_CACHE_PATH`: SQLite cache file; unset keeps the cache in memory
//! - `AGENCYDESK_CACHE_POOL_SIZE`: Connection pool size
//! - `AGENCYDESK_LOG_LEVEL`: `EnvFilter` directive
//! - `AGENCYDESK_LOG_JSON`: JSON log output (true/false)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./agencydesk.json` or `./agencydesk.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. `../../config.json` or `../../config.toml` (grandparent directory)
//! 5. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use agencydesk_domain::{AgencyError, ApiConfig, CacheConfig, Config, LoggingConfig, Result};

pub const ENV_API_BASE_URL: &str = "AGENCYDESK_API_BASE_URL";
pub const ENV_API_TIMEOUT_SECS: &str = "AGENCYDESK_API_TIMEOUT_SECS";
pub const ENV_API_FORWARD_AUDIT: &str = "AGENCYDESK_API_FORWARD_AUDIT";
pub const ENV_CACHE_PATH: &str = "AGENCYDESK_CACHE_PATH";
pub const ENV_CACHE_POOL_SIZE: &str = "AGENCYDESK_CACHE_POOL_SIZE";
pub const ENV_LOG_LEVEL: &str = "AGENCYDESK_LOG_LEVEL";
pub const ENV_LOG_JSON: &str = "AGENCYDESK_LOG_JSON";

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `AgencyError::Config` if an environment variable has an invalid
/// value or a probed config file cannot be parsed.
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Environment configuration unavailable, trying file");
            if probe_config_paths().is_some() {
                load_from_file(None)
            } else {
                tracing::info!("No config file found, using defaults");
                Ok(Config::default())
            }
        }
    }
}

/// Load configuration from environment variables
///
/// `AGENCYDESK_API_BASE_URL` is required; every other variable falls back to
/// its default.
///
/// # Errors
/// Returns `AgencyError::Config` if the base URL is missing or a variable
/// has an invalid value.
pub fn load_from_env() -> Result<Config> {
    let api_defaults = ApiConfig::default();
    let cache_defaults = CacheConfig::default();
    let logging_defaults = LoggingConfig::default();

    let base_url = env_var(ENV_API_BASE_URL)?;
    if base_url.trim().is_empty() {
        return Err(AgencyError::Config(format!("{ENV_API_BASE_URL} is empty")));
    }

    Ok(Config {
        api: ApiConfig {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            timeout_seconds: env_parse(ENV_API_TIMEOUT_SECS, api_defaults.timeout_seconds)?,
            forward_audit_logs: env_bool(ENV_API_FORWARD_AUDIT, api_defaults.forward_audit_logs),
            ..api_defaults
        },
        cache: CacheConfig {
            path: std::env::var(ENV_CACHE_PATH).ok().filter(|p| !p.trim().is_empty()),
            pool_size: env_parse(ENV_CACHE_POOL_SIZE, cache_defaults.pool_size)?,
        },
        logging: LoggingConfig {
            level: std::env::var(ENV_LOG_LEVEL).unwrap_or(logging_defaults.level),
            json: env_bool(ENV_LOG_JSON, logging_defaults.json),
        },
    })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations. JSON and TOML are
/// supported, detected by file extension. Missing sections and fields take
/// their defaults.
///
/// # Errors
/// Returns `AgencyError::Config` if the file is missing, unreadable or
/// malformed.
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(AgencyError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            AgencyError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| AgencyError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| AgencyError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| AgencyError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(AgencyError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe the standard locations for a configuration file
///
/// Returns the first file that exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        roots.push(cwd);
    }
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            roots.push(exe_dir.to_path_buf());
        }
    }

    roots
        .iter()
        .flat_map(|root| {
            [
                "config.json",
                "config.toml",
                "agencydesk.json",
                "agencydesk.toml",
                "../config.json",
                "../config.toml",
                "../../config.json",
                "../../config.toml",
            ]
            .map(|name| root.join(name))
        })
        .find(|path| path.exists())
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key)
        .map_err(|_| AgencyError::Config(format!("Missing required environment variable: {key}")))
}

/// Parse an optional numeric environment variable, `default` when unset.
fn env_parse<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AgencyError::Config(format!("Invalid value for {key}: {e}"))),
        Err(_) => Ok(default),
    }
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
