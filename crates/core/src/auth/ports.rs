//! Port interface for the authentication collaborator
//!
//! Credentials are only ever checked behind this trait. The store keeps the
//! returned session token so a restart can resume the session.

use agencydesk_domain::{NewUserRecord, Password, Result, SignInResult, User};
use async_trait::async_trait;

#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Check credentials. Unknown emails and wrong passwords are reported as
    /// outcomes, not errors.
    async fn sign_in(&self, email: &str, password: &Password) -> Result<SignInResult>;

    /// Register a new profile without signing it in
    async fn sign_up(&self, profile: NewUserRecord) -> Result<User>;

    /// End the session identified by `token`
    async fn sign_out(&self, token: &str) -> Result<()>;

    /// Re-attach to a session restored from the local cache and return the
    /// current profile of its user.
    ///
    /// Returns [`AgencyError::Auth`](agencydesk_domain::AgencyError::Auth)
    /// when the session is no longer valid.
    async fn resume_session(&self, token: &str) -> Result<User>;

    /// Send a password recovery email.
    ///
    /// Returns `Ok(false)` when no account uses `email`.
    async fn send_password_recovery(&self, email: &str) -> Result<bool>;
}
