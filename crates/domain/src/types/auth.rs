//! Authentication state and outcomes

use std::fmt;

use serde::{Deserialize, Serialize};
#[cfg(feature = "ts-gen")]
use ts_rs::TS;

use super::user::User;

/// Plaintext password in transit to the authentication collaborator.
///
/// `Debug` and `Display` never print the value.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Password(String);

impl Password {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Length in characters, not bytes.
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

impl From<&str> for Password {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Current session as seen by the data store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct AuthState {
    pub is_logged_in: bool,
    pub current_user: Option<User>,
    /// Opaque bearer token issued by the authentication collaborator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_token: Option<String>,
}

impl AuthState {
    pub fn signed_out() -> Self {
        Self::default()
    }

    pub fn signed_in(user: User, session_token: Option<String>) -> Self {
        Self { is_logged_in: true, current_user: Some(user), session_token }
    }

    /// The signed-in user, if the session is active.
    pub fn user(&self) -> Option<&User> {
        if self.is_logged_in {
            self.current_user.as_ref()
        } else {
            None
        }
    }
}

/// `{success, message}` result returned to forms for auth operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct AuthOutcome {
    pub success: bool,
    pub message: String,
}

impl AuthOutcome {
    pub fn success(message: impl Into<String>) -> Self {
        Self { success: true, message: message.into() }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self { success: false, message: message.into() }
    }
}

/// Credential check result reported by the authentication collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SignInResult {
    Authenticated { user: User, token: String },
    UnknownEmail,
    WrongPassword,
}

/// Self-service registration form
#[derive(Debug, Clone)]
pub struct SignUpRequest {
    pub name: String,
    pub email: String,
    pub password: Password,
    pub confirm_password: Password,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_debug_is_redacted() {
        let password = Password::new("hunter22");
        assert_eq!(format!("{password:?}"), "Password(***)");
        assert_eq!(serde_json::to_string(&password).unwrap(), "\"hunter22\"");
    }

    #[test]
    fn signed_out_state_has_no_user() {
        let state = AuthState::signed_out();
        assert!(!state.is_logged_in);
        assert!(state.user().is_none());
    }

    #[test]
    fn sign_in_result_is_tagged() {
        let json = serde_json::to_value(SignInResult::WrongPassword).unwrap();
        assert_eq!(json["outcome"], "wrong_password");
    }
}
