//! Domain types and models

pub mod audit;
pub mod auth;
pub mod client;
pub mod stats;
pub mod task;
pub mod user;

use serde::{Deserialize, Serialize};
#[cfg(feature = "ts-gen")]
use ts_rs::TS;

pub use audit::{ActivityLog, ChangeAction, ChangeLog, EntityKind, ErrorLog, LogId};
pub use auth::{AuthOutcome, AuthState, Password, SignInResult, SignUpRequest};
pub use client::{Client, NewClient};
pub use stats::{
    ClientTaskCount, CollectionKind, CollectionStatus, DailyActivityCount, DailyTaskCount,
    EntityCount, TaskStatusDistribution, UserActivityCount, UserTaskCount,
};
pub use task::{NewTask, Task, TaskPriority, TaskStatus};
pub use user::{avatar_initials, NewUser, NewUserRecord, PasswordChange, User, UserRole};

use crate::impl_domain_status_conversions;

/// Active/inactive flag shared by users and clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
#[serde(rename_all = "lowercase")]
pub enum EntityStatus {
    #[default]
    Active,
    Inactive,
}

impl_domain_status_conversions!(EntityStatus {
    Active => "active",
    Inactive => "inactive",
});
