//! API-specific error types
//!
//! Maps HTTP outcomes of the remote data service onto categories with retry
//! metadata, and from there onto [`AgencyError`].

use std::time::Duration;

use agencydesk_domain::AgencyError;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Categories of API errors for retry logic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// 401, 403
    Authentication,
    /// 404
    NotFound,
    /// 409, the entity changed on the server
    Conflict,
    /// 429
    RateLimit,
    /// 5xx
    Server,
    /// Other 4xx, the request itself was rejected
    Client,
    /// Connection failures and timeouts
    Network,
    /// Local misconfiguration or an unreadable response
    Config,
}

/// API operation errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication failed ({status}): {message}")]
    Auth { status: u16, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Request rejected: {0}")]
    Client(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),
}

/// Error body returned by the service: `{"error": "..."}`
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(alias = "message")]
    error: String,
}

impl ApiError {
    /// Classify a non-success response.
    pub fn from_status(status: StatusCode, url: &str, body: &str) -> Self {
        let detail = serde_json::from_str::<ErrorBody>(body)
            .map(|b| b.error)
            .unwrap_or_else(|_| body.trim().to_string());
        let message = if detail.is_empty() {
            format!("{url} returned status {status}")
        } else {
            format!("{url} returned status {status}: {detail}")
        };

        match status.as_u16() {
            code @ (401 | 403) => Self::Auth { status: code, message },
            404 => Self::NotFound(message),
            409 => Self::Conflict(message),
            429 => Self::RateLimit(message),
            500..=599 => Self::Server(message),
            400..=499 => Self::Client(message),
            _ => Self::Network(message),
        }
    }

    pub fn category(&self) -> ApiErrorCategory {
        match self {
            Self::Auth { .. } => ApiErrorCategory::Authentication,
            Self::NotFound(_) => ApiErrorCategory::NotFound,
            Self::Conflict(_) => ApiErrorCategory::Conflict,
            Self::RateLimit(_) => ApiErrorCategory::RateLimit,
            Self::Server(_) => ApiErrorCategory::Server,
            Self::Client(_) => ApiErrorCategory::Client,
            Self::Network(_) | Self::Timeout(_) => ApiErrorCategory::Network,
            Self::Decode(_) | Self::Config(_) => ApiErrorCategory::Config,
        }
    }

    /// Transient failures worth retrying later
    pub fn should_retry(&self) -> bool {
        matches!(
            self.category(),
            ApiErrorCategory::RateLimit | ApiErrorCategory::Server | ApiErrorCategory::Network
        )
    }
}

impl From<AgencyError> for ApiError {
    fn from(err: AgencyError) -> Self {
        match err {
            AgencyError::Network(msg) => Self::Network(msg),
            AgencyError::Auth(msg) => Self::Auth { status: 401, message: msg },
            AgencyError::NotFound(msg) => Self::NotFound(msg),
            AgencyError::Conflict(msg) => Self::Conflict(msg),
            AgencyError::Validation(msg) => Self::Client(msg),
            AgencyError::Config(msg) => Self::Config(msg),
            AgencyError::Storage(msg) | AgencyError::Internal(msg) => Self::Decode(msg),
        }
    }
}

impl From<ApiError> for AgencyError {
    fn from(err: ApiError) -> Self {
        let message = err.to_string();
        match err.category() {
            ApiErrorCategory::Authentication => AgencyError::Auth(message),
            ApiErrorCategory::NotFound => AgencyError::NotFound(message),
            ApiErrorCategory::Conflict => AgencyError::Conflict(message),
            ApiErrorCategory::RateLimit
            | ApiErrorCategory::Server
            | ApiErrorCategory::Network => AgencyError::Network(message),
            ApiErrorCategory::Client => AgencyError::Validation(message),
            ApiErrorCategory::Config => AgencyError::Internal(message),
        }
    }
}
