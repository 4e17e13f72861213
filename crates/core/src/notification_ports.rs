//! User-facing notification port (toasts in the UI).

use agencydesk_common::error::ErrorSeverity;
use agencydesk_domain::AgencyError;

use crate::errors;

/// A message shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub severity: ErrorSeverity,
    pub title: String,
    pub message: String,
}

impl Notification {
    pub fn new(
        severity: ErrorSeverity,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self { severity, title: title.into(), message: message.into() }
    }

    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorSeverity::Info, title, message)
    }

    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorSeverity::Warning, title, message)
    }

    /// Build a notification for a failed operation, with the level taken
    /// from the error's severity.
    pub fn from_error(title: impl Into<String>, err: &AgencyError) -> Self {
        Self::new(errors::severity(err), title, err.message())
    }
}

/// Port for surfacing notifications.
///
/// Delivery is fire-and-forget; implementations must not block.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}
