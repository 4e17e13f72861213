//! Argon2 password hashing

use std::fmt;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    PasswordHash as PhcHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
};
use argon2::Argon2;
use tracing::debug;

use crate::error::{CommonError, CommonResult};

/// Encoded Argon2 hash in PHC string format
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword(String);

impl HashedPassword {
    /// Wrap an existing PHC string, validating its format.
    pub fn from_phc(encoded: impl Into<String>) -> CommonResult<Self> {
        let encoded = encoded.into();
        PhcHash::new(&encoded)
            .map_err(|e| CommonError::validation("password_hash", format!("Malformed hash: {e}")))?;
        Ok(Self(encoded))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HashedPassword(***)")
    }
}

/// Hashes and verifies credentials with Argon2id default parameters
#[derive(Default, Clone)]
pub struct CredentialHasher {
    argon2: Argon2<'static>,
}

impl CredentialHasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hash a password with a fresh random salt.
    pub fn hash(&self, password: &str) -> CommonResult<HashedPassword> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| CommonError::internal_with_context(e.to_string(), "password hashing"))?;
        Ok(HashedPassword(hash.to_string()))
    }

    /// Check a password against a stored hash.
    ///
    /// Returns `Ok(false)` on mismatch; errors only when the stored hash
    /// cannot be parsed.
    pub fn verify(&self, password: &str, hashed: &HashedPassword) -> CommonResult<bool> {
        let parsed = PhcHash::new(hashed.as_str())
            .map_err(|e| CommonError::internal_with_context(e.to_string(), "password verify"))?;

        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(err) => {
                debug!(error = %err, "password verification failed unexpectedly");
                Err(CommonError::internal_with_context(err.to_string(), "password verify"))
            }
        }
    }
}

impl fmt::Debug for CredentialHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialHasher").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hasher = CredentialHasher::new();
        let hashed = hasher.hash("s3cret!").unwrap();

        assert!(hashed.as_str().starts_with("$argon2"));
        assert!(hasher.verify("s3cret!", &hashed).unwrap());
        assert!(!hasher.verify("S3cret!", &hashed).unwrap());
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let hasher = CredentialHasher::new();
        let a = hasher.hash("repeat").unwrap();
        let b = hasher.hash("repeat").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_hash_is_rejected() {
        assert!(HashedPassword::from_phc("plaintext").is_err());
    }
}
