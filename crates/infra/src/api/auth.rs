//! Bearer token handling for the remote data service
//!
//! The service issues an opaque token at login. [`SessionTokens`] keeps it
//! for the lifetime of the session and the [`ApiClient`](super::ApiClient)
//! attaches it to every request.

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

use super::errors::ApiError;

/// Trait for providing the bearer token of the current session
///
/// Returning `Ok(None)` sends the request unauthenticated, which is what
/// login, sign-up and password recovery need.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    async fn access_token(&self) -> Result<Option<String>, ApiError>;
}

/// In-process holder of the current session token
#[derive(Debug, Default)]
pub struct SessionTokens {
    current: RwLock<Option<String>>,
}

impl SessionTokens {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, token: impl Into<String>) {
        debug!("Session token stored");
        *self.current.write() = Some(token.into());
    }

    /// Forget the token, but only if it is still `token`. A concurrent login
    /// may already have replaced it.
    pub fn clear_if(&self, token: &str) {
        let mut current = self.current.write();
        if current.as_deref() == Some(token) {
            debug!("Session token cleared");
            *current = None;
        }
    }

    pub fn current(&self) -> Option<String> {
        self.current.read().clone()
    }
}

#[async_trait]
impl AccessTokenProvider for SessionTokens {
    async fn access_token(&self) -> Result<Option<String>, ApiError> {
        Ok(self.current())
    }
}
