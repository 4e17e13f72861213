//! Shared error vocabulary
//!
//! [`CommonError`] covers the failures raised by the validation and security
//! tiers. [`ErrorClassification`] and [`ErrorSeverity`] are what callers use
//! to decide retries and pick log and notification levels; the domain error
//! type implements the same trait in `agencydesk-core`.
//!
//! | Level | Used for |
//! |-------|----------|
//! | **Info** | Confirmations |
//! | **Warning** | Rejected input, missing or conflicting records |
//! | **Error** | Auth, network and storage failures |
//! | **Critical** | Misconfiguration and broken invariants |

use std::fmt;

/// Standard result type using CommonError
pub type CommonResult<T> = Result<T, CommonError>;

/// Failures raised by the shared building blocks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommonError {
    /// A value failed a field rule
    Validation { field: String, message: String },

    /// The acting user lacks the role an operation requires
    Unauthorized { operation: String, required_role: Option<String> },

    /// Encoding or decoding failed
    Serialization { format: &'static str, message: String },

    /// File or database I/O failed
    Persistence { message: String },

    /// A primitive misbehaved, e.g. the hasher rejected its own parameters
    Internal { message: String, context: Option<String> },
}

impl fmt::Display for CommonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation { field, message } => write!(f, "{field}: {message}"),
            Self::Unauthorized { operation, required_role: Some(role) } => {
                write!(f, "Unauthorized to {operation} (requires {role})")
            }
            Self::Unauthorized { operation, required_role: None } => {
                write!(f, "Unauthorized to {operation}")
            }
            Self::Serialization { format, message } => {
                write!(f, "Could not encode or decode {format}: {message}")
            }
            Self::Persistence { message } => write!(f, "Persistence error: {message}"),
            Self::Internal { message, context: Some(ctx) } => {
                write!(f, "Internal error in {ctx}: {message}")
            }
            Self::Internal { message, context: None } => write!(f, "Internal error: {message}"),
        }
    }
}

impl std::error::Error for CommonError {}

impl ErrorClassification for CommonError {
    fn is_retryable(&self) -> bool {
        matches!(self, Self::Persistence { .. })
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Validation { .. } | Self::Unauthorized { .. } => ErrorSeverity::Warning,
            Self::Serialization { .. } | Self::Persistence { .. } => ErrorSeverity::Error,
            Self::Internal { .. } => ErrorSeverity::Critical,
        }
    }

    fn is_critical(&self) -> bool {
        matches!(self, Self::Internal { .. })
    }
}

impl CommonError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation { field: field.into(), message: message.into() }
    }

    /// Denial of `operation` for want of `role`.
    pub fn unauthorized(operation: impl Into<String>, role: impl Into<String>) -> Self {
        Self::Unauthorized { operation: operation.into(), required_role: Some(role.into()) }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal { message: message.into(), context: None }
    }

    pub fn internal_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Internal { message: message.into(), context: Some(context.into()) }
    }
}

/// Standard interface for classifying errors by their characteristics
pub trait ErrorClassification {
    /// Check if this error is retryable
    ///
    /// Retryable errors are transient issues that may succeed if attempted
    /// again: timeouts, rate limiting, temporary service unavailability.
    fn is_retryable(&self) -> bool;

    /// Get the error severity level
    ///
    /// Used for logging and user notification decisions.
    fn severity(&self) -> ErrorSeverity;

    /// Check if this is a critical error requiring immediate attention
    fn is_critical(&self) -> bool;
}

/// Error severity levels for monitoring and alerting
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorSeverity {
    /// Informational, typically for debugging
    Info,
    /// Warning, should be monitored but not critical
    Warning,
    /// Error, requires attention and action
    Error,
    /// Critical, immediate action required
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

// Standard conversions from common error types
impl From<serde_json::Error> for CommonError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization { format: "JSON", message: err.to_string() }
    }
}

impl From<std::io::Error> for CommonError {
    fn from(err: std::io::Error) -> Self {
        Self::Persistence { message: err.to_string() }
    }
}
