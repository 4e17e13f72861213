//! # AgencyDesk Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - REST client for the remote data service (every gateway port plus the
//!   audit sink)
//! - Local cache implementations (SQLite through an r2d2 pool, in-memory)
//! - A self-contained in-memory backend for offline use and demos
//! - Notifiers, configuration loading and tracing setup
//!
//! ## Architecture
//! - Implements traits defined in `agencydesk-core`
//! - Contains all "impure" code (I/O, network, files)

pub mod api;
pub mod cache;
pub mod config;
pub mod errors;
pub mod http;
pub mod memory;
pub mod notifications;
pub mod observability;

// Re-export commonly used items
pub use api::{ApiClient, ApiClientConfig, ApiError, RestDataService, SessionTokens};
pub use cache::SqliteCache;
pub use errors::InfraError;
pub use http::HttpClient;
pub use memory::InMemoryBackend;
pub use notifications::{BroadcastNotifier, TracingNotifier};
