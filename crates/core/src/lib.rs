//! # AgencyDesk Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces (traits) for the remote data service, the
//!   authentication collaborator, the local cache and user notifications
//! - The [`DataStore`]: in-memory mirror of users, clients and tasks with
//!   its CRUD façade, audit trail and session lifecycle
//! - Pure aggregates used by dashboard charts
//!
//! ## Architecture Principles
//! - Only depends on `agencydesk-common` and `agencydesk-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits

pub mod aggregates;
pub mod audit;
pub mod auth;
pub mod errors;
pub mod records;
pub mod store;
pub mod validation;

// Infrastructure ports
pub mod cache_ports;
pub mod notification_ports;

// Re-export specific items to avoid ambiguity
pub use audit::ports::AuditSink;
pub use audit::AuditTrail;
pub use auth::ports::AuthGateway;
pub use cache_ports::LocalCache;
pub use notification_ports::{Notification, Notifier};
pub use records::ports::{ClientGateway, TaskGateway, UserGateway};
pub use store::{DataStore, DataStoreBuilder};
