//! Macro for implementing Display and FromStr for status enums
//!
//! Every enum that crosses the wire as a plain string (roles, statuses,
//! priorities) goes through this macro so that the textual form used in logs,
//! change-log diffs and cache snapshots is defined in exactly one place.
//!
//! # Example
//!
//! ```rust
//! use agencydesk_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum ReviewState {
//!     Draft,
//!     InReview,
//!     Approved,
//! }
//!
//! impl_domain_status_conversions!(ReviewState {
//!     Draft => "draft",
//!     InReview => "in-review",
//!     Approved => "approved",
//! });
//!
//! assert_eq!(ReviewState::InReview.to_string(), "in-review");
//! assert_eq!("APPROVED".parse::<ReviewState>(), Ok(ReviewState::Approved));
//! ```

/// Implements Display and FromStr traits for status enums
///
/// This macro generates:
/// - Display trait: converts enum variants to their wire strings
/// - FromStr trait: parses case-insensitive strings to enum variants
///
/// # Arguments
///
/// * `$enum_name` - The name of the enum type
/// * `$variant => $str` - Mapping of enum variants to their lowercase string
///   representations
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
