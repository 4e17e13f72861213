//! Append-only audit trail
//!
//! Holds the activity, error and change logs. Entries are never edited or
//! removed; each log assigns ids as `max existing id + 1`, so ids stay
//! strictly increasing even after a restore from a cache that was written
//! by an older build.

use agencydesk_domain::{
    ActivityLog, ChangeAction, ChangeLog, EntityKind, ErrorLog, LogId, User,
};
use chrono::{DateTime, Utc};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuditTrail {
    activity: Vec<ActivityLog>,
    errors: Vec<ErrorLog>,
    changes: Vec<ChangeLog>,
}

fn next_id(ids: impl Iterator<Item = LogId>) -> LogId {
    ids.max().map_or(1, |max| max + 1)
}

impl AuditTrail {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a trail from previously persisted logs.
    pub fn restore(
        activity: Vec<ActivityLog>,
        errors: Vec<ErrorLog>,
        changes: Vec<ChangeLog>,
    ) -> Self {
        Self { activity, errors, changes }
    }

    pub fn activity(&self) -> &[ActivityLog] {
        &self.activity
    }

    pub fn errors(&self) -> &[ErrorLog] {
        &self.errors
    }

    pub fn changes(&self) -> &[ChangeLog] {
        &self.changes
    }

    pub fn record_activity(
        &mut self,
        actor: &User,
        action: impl Into<String>,
        location: &str,
        at: DateTime<Utc>,
    ) -> ActivityLog {
        let entry = ActivityLog {
            id: next_id(self.activity.iter().map(|e| e.id)),
            user_id: actor.id.clone(),
            user_name: actor.name.clone(),
            action: action.into(),
            location: location.to_string(),
            timestamp: at,
        };
        self.activity.push(entry.clone());
        entry
    }

    /// Record a failure. `actor` is `None` for unauthenticated errors.
    pub fn record_error(
        &mut self,
        actor: Option<&User>,
        location: &str,
        form: Option<&str>,
        message: impl Into<String>,
        at: DateTime<Utc>,
    ) -> ErrorLog {
        let entry = ErrorLog {
            id: next_id(self.errors.iter().map(|e| e.id)),
            user_id: actor.map(|u| u.id.clone()),
            user_role: actor.map(|u| u.role),
            location: location.to_string(),
            form: form.map(str::to_string),
            message: message.into(),
            timestamp: at,
        };
        self.errors.push(entry.clone());
        entry
    }

    pub fn record_change(
        &mut self,
        actor: &User,
        entity_type: EntityKind,
        entity_id: &str,
        action: ChangeAction,
        details: Value,
        at: DateTime<Utc>,
    ) -> ChangeLog {
        let entry = ChangeLog {
            id: next_id(self.changes.iter().map(|e| e.id)),
            entity_type,
            entity_id: entity_id.to_string(),
            action,
            user_id: actor.id.clone(),
            user_name: actor.name.clone(),
            details,
            timestamp: at,
        };
        self.changes.push(entry.clone());
        entry
    }
}

#[cfg(test)]
mod tests {
    use agencydesk_domain::{EntityStatus, UserRole};
    use chrono::TimeZone;

    use super::*;

    fn actor() -> User {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        User {
            id: "u-1".into(),
            name: "Ana García".into(),
            email: "ana@agency.test".into(),
            role: UserRole::Admin,
            status: EntityStatus::Active,
            avatar: "AG".into(),
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn ids_start_at_one_and_increase() {
        let mut trail = AuditTrail::new();
        let now = Utc::now();
        let first = trail.record_activity(&actor(), "Signed in", "Login", now);
        let second = trail.record_activity(&actor(), "Signed out", "Logout", now);
        assert_eq!((first.id, second.id), (1, 2));
    }

    #[test]
    fn restored_gaps_continue_from_max() {
        let mut trail = AuditTrail::new();
        let now = Utc::now();
        let mut entry = trail.record_error(None, "Login Page", None, "boom", now);
        entry.id = 41;
        let mut restored = AuditTrail::restore(Vec::new(), vec![entry], Vec::new());

        let next = restored.record_error(Some(&actor()), "Users", Some("User Form"), "bad", now);
        assert_eq!(next.id, 42);
        assert_eq!(next.user_role, Some(UserRole::Admin));
        assert_eq!(restored.errors().len(), 2);
    }

    #[test]
    fn logs_are_numbered_independently() {
        let mut trail = AuditTrail::new();
        let now = Utc::now();
        trail.record_activity(&actor(), "Added client: Acme", "Clients", now);
        trail.record_activity(&actor(), "Updated client: Acme", "Clients", now);
        let change = trail.record_change(
            &actor(),
            EntityKind::Client,
            "c-1",
            ChangeAction::Create,
            Value::Null,
            now,
        );
        assert_eq!(change.id, 1);
    }
}
