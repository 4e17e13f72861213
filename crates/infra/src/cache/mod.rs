//! Local persisted cache adapter
//!
//! [`SqliteCache`] implements [`LocalCache`](agencydesk_core::LocalCache)
//! over a file, or over a private in-memory database when no path is
//! configured.

mod sqlite;

pub use sqlite::SqliteCache;
