//! User (profile) types
//!
//! Users never carry a password in application state. Passwords only appear
//! on the draft types handed to the remote service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "ts-gen")]
use ts_rs::TS;

use super::auth::Password;
use super::EntityStatus;
use crate::constants::MAX_AVATAR_INITIALS;
use crate::impl_domain_status_conversions;

/// Role granted to a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Manager,
    Designer,
    Marketing,
    Copywriter,
    #[default]
    User,
}

impl_domain_status_conversions!(UserRole {
    Admin => "admin",
    Manager => "manager",
    Designer => "designer",
    Marketing => "marketing",
    Copywriter => "copywriter",
    User => "user",
});

/// User profile as mirrored from the remote service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub status: EntityStatus,
    /// Initials derived from `name`
    #[serde(default)]
    pub avatar: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_active(&self) -> bool {
        self.status == EntityStatus::Active
    }
}

/// Input for creating a user from the admin screen
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub status: EntityStatus,
    pub password: Password,
    pub confirm_password: Password,
}

/// Password change submitted together with a user update
#[derive(Debug, Clone)]
pub struct PasswordChange {
    pub password: Password,
    pub confirm_password: Password,
}

/// Payload sent to the remote service to create a profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUserRecord {
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub status: EntityStatus,
    pub avatar: String,
    pub password: Password,
}

/// Derive avatar initials from a display name.
///
/// Takes the first character of each whitespace-separated word, keeps the
/// first two and uppercases them: `"ana maria lopez"` becomes `"AM"`.
pub fn avatar_initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(MAX_AVATAR_INITIALS)
        .flat_map(char::to_uppercase)
        .collect()
}
