//! User administration

use agencydesk_domain::constants::LOCATION_USERS;
use agencydesk_domain::{
    avatar_initials, AgencyError, ChangeAction, EntityKind, EntityStatus, NewUser, NewUserRecord,
    PasswordChange, Result, User,
};
use serde_json::json;
use tracing::{debug, info, instrument};

use super::persistence::Slot;
use super::state::{replace, upsert};
use super::{DataStore, Mutation};
use crate::audit::diff::{field_diff, snapshot, BOOKKEEPING_FIELDS};
use crate::validation;

/// Re-derive the avatar from the name.
pub(crate) fn with_avatar(mut user: User) -> User {
    user.avatar = avatar_initials(&user.name);
    user
}

fn email_taken(users: &[User], email: &str, except_id: Option<&str>) -> bool {
    users
        .iter()
        .filter(|u| Some(u.id.as_str()) != except_id)
        .any(|u| u.email.eq_ignore_ascii_case(email.trim()))
}

fn duplicate_email() -> AgencyError {
    AgencyError::Validation("email: A user with this email already exists".into())
}

impl DataStore {
    /// Create a profile. The email must not belong to a loaded user.
    #[instrument(skip(self, draft), fields(email = %draft.email))]
    pub async fn add_user(&self, draft: NewUser) -> Result<User> {
        validation::new_user(&draft)?;
        if email_taken(&self.state.read().users, &draft.email, None) {
            return Err(duplicate_email());
        }

        let name = draft.name.trim().to_string();
        let record = NewUserRecord {
            avatar: avatar_initials(&name),
            name,
            email: draft.email.trim().to_string(),
            role: draft.role,
            status: draft.status,
            password: draft.password,
        };
        let owner = self.session_owner();

        let created = self
            .users_api
            .create(record)
            .await
            .map_err(|err| self.remote_failure("Failed to add user", err))?;
        let created = with_avatar(created);

        let entries = {
            let mut state = self.state.write();
            if Self::session_changed(&state, owner.as_deref(), "add_user") {
                return Ok(created);
            }
            upsert(&mut state.users, created.clone());
            Self::audit_mutation(
                &mut state,
                Mutation {
                    kind: EntityKind::User,
                    entity_id: &created.id,
                    action: ChangeAction::Create,
                    description: format!("Added user: {}", created.name),
                    location: LOCATION_USERS,
                    details: snapshot(&created),
                },
            )
        };
        info!(user_id = %created.id, "User added");
        self.commit_audit(entries).await;
        Ok(created)
    }

    /// Save an edited profile, optionally changing its password.
    #[instrument(skip(self, user, password), fields(user_id = %user.id))]
    pub async fn update_user(&self, user: User, password: Option<PasswordChange>) -> Result<User> {
        validation::user_update(&user, password.as_ref())?;

        let existing = {
            let state = self.state.read();
            let existing = state
                .user(&user.id)
                .cloned()
                .ok_or_else(|| AgencyError::NotFound(format!("user {}", user.id)))?;
            if email_taken(&state.users, &user.email, Some(&user.id)) {
                return Err(duplicate_email());
            }
            let is_self = state.actor().is_some_and(|actor| actor.id == user.id);
            if is_self && user.status == EntityStatus::Inactive {
                return Err(AgencyError::Validation(
                    "status: You cannot deactivate your own account".into(),
                ));
            }
            existing
        };

        let owner = self.session_owner();
        let password_changed = password.is_some();
        let user = with_avatar(user);
        let updated = self
            .users_api
            .update(user, password.map(|change| change.password))
            .await
            .map_err(|err| self.remote_failure("Failed to update user", err))?;
        let updated = with_avatar(updated);

        let mut details = field_diff(&existing, &updated, BOOKKEEPING_FIELDS);
        if password_changed {
            if let Some(map) = details.as_object_mut() {
                map.insert("password".into(), json!({ "changed": true }));
            }
        }

        let (entries, refreshed_self) = {
            let mut state = self.state.write();
            if Self::session_changed(&state, owner.as_deref(), "update_user") {
                return Ok(updated);
            }
            if !replace(&mut state.users, updated.clone()) {
                debug!(user_id = %updated.id, "User left the collection during update");
                return Ok(updated);
            }
            let refreshed_self = state.actor().is_some_and(|actor| actor.id == updated.id);
            if refreshed_self {
                state.auth.current_user = Some(updated.clone());
            }
            let entries = Self::audit_mutation(
                &mut state,
                Mutation {
                    kind: EntityKind::User,
                    entity_id: &updated.id,
                    action: ChangeAction::Update,
                    description: format!("Updated user: {}", updated.name),
                    location: LOCATION_USERS,
                    details,
                },
            );
            (entries, refreshed_self)
        };
        if refreshed_self {
            self.persist(&[Slot::Auth]).await;
        }
        self.commit_audit(entries).await;
        Ok(updated)
    }

    /// Deactivate a user. Profiles are never removed so historical
    /// references keep resolving.
    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: &str) -> Result<User> {
        let existing = {
            let state = self.state.read();
            let existing =
                state.user(id).cloned().ok_or_else(|| AgencyError::NotFound(format!("user {id}")))?;
            if state.actor().is_some_and(|actor| actor.id == id) {
                return Err(AgencyError::Validation(
                    "id: You cannot delete your own account".into(),
                ));
            }
            existing
        };

        let owner = self.session_owner();
        let mut deactivated = existing.clone();
        deactivated.status = EntityStatus::Inactive;
        let updated = self
            .users_api
            .update(deactivated, None)
            .await
            .map_err(|err| self.remote_failure("Failed to delete user", err))?;
        let updated = with_avatar(updated);

        let entries = {
            let mut state = self.state.write();
            if Self::session_changed(&state, owner.as_deref(), "delete_user") {
                return Ok(updated);
            }
            if !replace(&mut state.users, updated.clone()) {
                debug!(user_id = %updated.id, "User left the collection during deactivation");
                return Ok(updated);
            }
            Self::audit_mutation(
                &mut state,
                Mutation {
                    kind: EntityKind::User,
                    entity_id: &updated.id,
                    action: ChangeAction::Delete,
                    description: format!("Deactivated user: {}", updated.name),
                    location: LOCATION_USERS,
                    details: json!({
                        "soft_delete": true,
                        "status": { "from": existing.status, "to": updated.status },
                    }),
                },
            )
        };
        info!(user_id = %updated.id, "User deactivated");
        self.commit_audit(entries).await;
        Ok(updated)
    }
}
