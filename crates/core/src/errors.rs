//! Classification of [`AgencyError`] for notification levels and retry
//! decisions.

use agencydesk_common::error::{ErrorClassification, ErrorSeverity};
use agencydesk_common::validation::ValidationError;
use agencydesk_domain::AgencyError;

/// Borrowing wrapper that classifies a domain error.
#[derive(Debug, Clone, Copy)]
pub struct Classified<'a>(pub &'a AgencyError);

impl ErrorClassification for Classified<'_> {
    fn is_retryable(&self) -> bool {
        matches!(self.0, AgencyError::Network(_))
    }

    fn severity(&self) -> ErrorSeverity {
        match self.0 {
            AgencyError::Validation(_) | AgencyError::NotFound(_) | AgencyError::Conflict(_) => {
                ErrorSeverity::Warning
            }
            AgencyError::Auth(_) | AgencyError::Network(_) | AgencyError::Storage(_) => {
                ErrorSeverity::Error
            }
            AgencyError::Config(_) | AgencyError::Internal(_) => ErrorSeverity::Critical,
        }
    }

    fn is_critical(&self) -> bool {
        self.severity() == ErrorSeverity::Critical
    }
}

pub fn severity(err: &AgencyError) -> ErrorSeverity {
    Classified(err).severity()
}

pub fn is_retryable(err: &AgencyError) -> bool {
    Classified(err).is_retryable()
}

/// Collapse field errors into a single [`AgencyError::Validation`].
pub fn from_validation(err: ValidationError) -> AgencyError {
    AgencyError::Validation(err.to_string())
}
