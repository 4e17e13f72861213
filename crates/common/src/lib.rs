//! # AgencyDesk Common
//!
//! Cross-cutting building blocks shared by the workspace crates, split into
//! opt-in tiers:
//!
//! - `foundation`: error classification ([`error`]) and field validation
//!   ([`validation`])
//! - `security`: Argon2 password hashing ([`security`])

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod error;
#[cfg(feature = "foundation")]
pub mod validation;

// Security tier
// -------------------------------------------------------------------
#[cfg(feature = "security")]
pub mod security;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "foundation")]
pub use error::{CommonError, CommonResult, ErrorClassification, ErrorSeverity};
#[cfg(feature = "security")]
pub use security::{CredentialHasher, HashedPassword};
#[cfg(feature = "foundation")]
pub use validation::{ValidationError, ValidationResult};
