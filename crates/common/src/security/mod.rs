//! Credential security primitives
//!
//! Passwords are only ever stored as Argon2 PHC strings. Verification goes
//! through [`CredentialHasher::verify`], which compares in constant time.

pub mod password;

pub use password::{CredentialHasher, HashedPassword};
