//! Session lifecycle: sign-in, sign-out, registration, password recovery
//! and error logging.

use agencydesk_common::error::CommonError;
use agencydesk_domain::constants::{
    FORM_LOGIN, FORM_PASSWORD_RECOVERY, FORM_SIGN_UP, LOCATION_LOGIN, LOCATION_LOGIN_PAGE,
    LOCATION_LOGOUT, LOCATION_PASSWORD_RECOVERY, LOCATION_SIGN_UP, MSG_ACCOUNT_INACTIVE,
    MSG_INVALID_CREDENTIALS, MSG_LOGIN_SUCCESS, MSG_RECOVERY_FAILED, MSG_RECOVERY_SENT,
    MSG_SERVER_UNREACHABLE, MSG_SIGN_UP_SUCCESS,
};
use agencydesk_domain::{
    avatar_initials, AgencyError, AuthOutcome, AuthState, CollectionKind, CollectionStatus,
    EntityStatus, ErrorLog, NewUserRecord, Password, SignInResult, SignUpRequest, UserRole,
};
use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use super::persistence::Slot;
use super::state::upsert;
use super::{users, AuditEntry, DataStore};
use crate::notification_ports::Notification;
use crate::validation;

impl DataStore {
    /// Sign in with email and password.
    ///
    /// Unknown emails and wrong passwords produce the same user-facing
    /// message but distinct error log entries.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &Password) -> AuthOutcome {
        let email = email.trim();
        if let Err(err) = validation::login(email, password) {
            return AuthOutcome::failure(err.message());
        }

        let result = match self.auth_api.sign_in(email, password).await {
            Ok(result) => result,
            Err(err) => {
                warn!(error = %err, "Sign-in request failed");
                self.notifier.notify(Notification::from_error("Sign-in failed", &err));
                let (message, detail) = match err {
                    AgencyError::Auth(_) | AgencyError::Validation(_) => {
                        (MSG_INVALID_CREDENTIALS, format!("Sign-in rejected for {email}: {err}"))
                    }
                    _ => (MSG_SERVER_UNREACHABLE, format!("Sign-in failed for {email}: {err}")),
                };
                self.log_error(LOCATION_LOGIN_PAGE, Some(FORM_LOGIN), detail).await;
                return AuthOutcome::failure(message);
            }
        };

        match result {
            SignInResult::UnknownEmail => {
                self.log_error(
                    LOCATION_LOGIN_PAGE,
                    Some(FORM_LOGIN),
                    format!("Login attempt with unregistered email: {email}"),
                )
                .await;
                AuthOutcome::failure(MSG_INVALID_CREDENTIALS)
            }
            SignInResult::WrongPassword => {
                self.log_error(
                    LOCATION_LOGIN_PAGE,
                    Some(FORM_LOGIN),
                    format!("Wrong password for user: {email}"),
                )
                .await;
                AuthOutcome::failure(MSG_INVALID_CREDENTIALS)
            }
            SignInResult::Authenticated { user, token } if !user.is_active() => {
                self.log_error(
                    LOCATION_LOGIN_PAGE,
                    Some(FORM_LOGIN),
                    format!("Login attempt with inactive account: {email}"),
                )
                .await;
                if let Err(err) = self.auth_api.sign_out(&token).await {
                    debug!(error = %err, "Could not discard session of inactive account");
                }
                AuthOutcome::failure(MSG_ACCOUNT_INACTIVE)
            }
            SignInResult::Authenticated { user, token } => {
                let user = users::with_avatar(user);
                info!(user_id = %user.id, "Signed in");
                let entry = {
                    let mut state = self.state.write();
                    state.auth = AuthState::signed_in(user.clone(), Some(token));
                    state.trail.record_activity(&user, "Signed in", LOCATION_LOGIN, Utc::now())
                };
                self.persist(&[Slot::Auth]).await;
                self.commit_audit(vec![AuditEntry::Activity(entry)]).await;
                self.refresh().await;
                AuthOutcome::success(MSG_LOGIN_SUCCESS)
            }
        }
    }

    /// End the session and clear the mirrored collections.
    #[instrument(skip(self))]
    pub async fn logout(&self) {
        let (entry, token) = {
            let mut state = self.state.write();
            let entry = state.actor().map(|user| {
                state.trail.record_activity(&user, "Signed out", LOCATION_LOGOUT, Utc::now())
            });
            let token = state.auth.session_token.take();
            state.auth = AuthState::signed_out();
            state.clear_collections();
            (entry, token)
        };

        if let Some(token) = token {
            if let Err(err) = self.auth_api.sign_out(&token).await {
                warn!(error = %err, "Failed to end remote session");
            }
        }

        self.persist(&[Slot::Auth]).await;
        if let Some(entry) = entry {
            info!(user_id = %entry.user_id, "Signed out");
            self.commit_audit(vec![AuditEntry::Activity(entry)]).await;
        }
    }

    /// Ask the auth service to send a password recovery email.
    ///
    /// The returned message is the same whether the address is unknown or
    /// the email could not be sent.
    #[instrument(skip(self))]
    pub async fn send_password_recovery_email(&self, email: &str) -> AuthOutcome {
        let email = email.trim();
        if let Err(err) = validation::recovery_email(email) {
            return AuthOutcome::failure(err.message());
        }

        // A loaded collection answers locally; otherwise the auth service
        // decides whether the account exists.
        let known_locally = {
            let state = self.state.read();
            let loaded = *state.status.get(CollectionKind::Users) == CollectionStatus::Loaded;
            loaded.then(|| state.user_by_email(email).is_some())
        };

        let sent = match known_locally {
            Some(false) => Ok(false),
            _ => self.auth_api.send_password_recovery(email).await,
        };

        match sent {
            Ok(true) => {
                info!("Password recovery email sent");
                AuthOutcome::success(MSG_RECOVERY_SENT)
            }
            Ok(false) => {
                self.log_error(
                    LOCATION_PASSWORD_RECOVERY,
                    Some(FORM_PASSWORD_RECOVERY),
                    format!("Password recovery requested for unregistered email: {email}"),
                )
                .await;
                AuthOutcome::failure(MSG_RECOVERY_FAILED)
            }
            Err(err) => {
                let err = self.remote_failure("Password recovery failed", err);
                self.log_error(
                    LOCATION_PASSWORD_RECOVERY,
                    Some(FORM_PASSWORD_RECOVERY),
                    format!("Failed to send recovery email to {email}: {err}"),
                )
                .await;
                AuthOutcome::failure(MSG_RECOVERY_FAILED)
            }
        }
    }

    /// Register a new account with the default role. The new user is not
    /// signed in.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn sign_up(&self, request: SignUpRequest) -> AuthOutcome {
        if let Err(err) = validation::sign_up(&request) {
            return AuthOutcome::failure(err.message());
        }

        let name = request.name.trim().to_string();
        let profile = NewUserRecord {
            avatar: avatar_initials(&name),
            name,
            email: request.email.trim().to_string(),
            role: UserRole::User,
            status: EntityStatus::Active,
            password: request.password,
        };

        match self.auth_api.sign_up(profile).await {
            Ok(user) => {
                info!(user_id = %user.id, "Account registered");
                {
                    let mut state = self.state.write();
                    if *state.status.get(CollectionKind::Users) == CollectionStatus::Loaded {
                        upsert(&mut state.users, users::with_avatar(user));
                    }
                }
                AuthOutcome::success(MSG_SIGN_UP_SUCCESS)
            }
            Err(err) => {
                let err = self.remote_failure("Sign-up failed", err);
                let message = err.message().to_string();
                let detail = format!("Sign-up failed: {err}");
                self.log_error(LOCATION_SIGN_UP, Some(FORM_SIGN_UP), detail).await;
                AuthOutcome::failure(message)
            }
        }
    }

    /// Append an error log entry attributed to the signed-in user, if any.
    #[instrument(skip(self, message))]
    pub async fn log_error(
        &self,
        location: &str,
        form: Option<&str>,
        message: impl Into<String> + Send,
    ) -> ErrorLog {
        let entry = {
            let mut state = self.state.write();
            let actor = state.actor();
            state.trail.record_error(actor.as_ref(), location, form, message, Utc::now())
        };
        debug!(id = entry.id, "Recorded error log entry");
        self.commit_audit(vec![AuditEntry::Error(entry.clone())]).await;
        entry
    }

    /// Record that the current user was refused access to `location`.
    ///
    /// Authorization itself is enforced by the caller; this only keeps the
    /// trail.
    pub async fn log_access_denied(&self, location: &str, required_role: UserRole) -> ErrorLog {
        let operation = format!("open {location}");
        let denial = CommonError::unauthorized(operation, required_role.to_string());
        let message = match self.current_user() {
            Some(user) => format!("{denial} by {} ({})", user.name, user.role),
            None => format!("{denial} by unauthenticated user"),
        };
        self.log_error(location, None, message).await
    }
}
