//! Audit trail records
//!
//! All three log collections are append-only. Ids are assigned as
//! `max existing id + 1` and never reused.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "ts-gen")]
use ts_rs::TS;

use super::user::UserRole;
use crate::impl_domain_status_conversions;

pub type LogId = u64;

/// Human-readable record of something a user did
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct ActivityLog {
    #[cfg_attr(feature = "ts-gen", ts(type = "number"))]
    pub id: LogId,
    pub user_id: String,
    /// Name at the time of writing
    pub user_name: String,
    pub action: String,
    /// Logical screen the action happened on
    pub location: String,
    pub timestamp: DateTime<Utc>,
}

/// Recorded failure. The user fields are empty for unauthenticated errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct ErrorLog {
    #[cfg_attr(feature = "ts-gen", ts(type = "number"))]
    pub id: LogId,
    pub user_id: Option<String>,
    pub user_role: Option<UserRole>,
    pub location: String,
    pub form: Option<String>,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    User,
    Client,
    Task,
}

impl_domain_status_conversions!(EntityKind {
    User => "user",
    Client => "client",
    Task => "task",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
#[serde(rename_all = "lowercase")]
pub enum ChangeAction {
    Create,
    Update,
    Delete,
}

impl_domain_status_conversions!(ChangeAction {
    Create => "create",
    Update => "update",
    Delete => "delete",
});

/// Structured audit record of an entity mutation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct ChangeLog {
    #[cfg_attr(feature = "ts-gen", ts(type = "number"))]
    pub id: LogId,
    pub entity_type: EntityKind,
    pub entity_id: String,
    pub action: ChangeAction,
    pub user_id: String,
    pub user_name: String,
    /// Snapshot for creates and deletes, `{field: {from, to}}` for updates
    #[cfg_attr(feature = "ts-gen", ts(type = "unknown"))]
    pub details: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}
