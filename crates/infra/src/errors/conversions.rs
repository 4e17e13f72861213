//! Conversions from external infrastructure errors into domain errors.

use agencydesk_common::error::CommonError;
use agencydesk_domain::AgencyError;
use reqwest::Error as HttpError;
use rusqlite::Error as SqlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub AgencyError);

impl From<InfraError> for AgencyError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<AgencyError> for InfraError {
    fn from(value: AgencyError) -> Self {
        InfraError(value)
    }
}

trait IntoAgencyError {
    fn into_agency(self) -> AgencyError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → AgencyError */
/* -------------------------------------------------------------------------- */

impl IntoAgencyError for SqlError {
    fn into_agency(self) -> AgencyError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match err.code {
                    ErrorCode::DatabaseBusy => AgencyError::Storage("database is busy".into()),
                    ErrorCode::DatabaseLocked => AgencyError::Storage("database is locked".into()),
                    ErrorCode::NotADatabase => {
                        AgencyError::Storage("cache file is not a SQLite database".into())
                    }
                    ErrorCode::ReadOnly => AgencyError::Storage("cache file is read-only".into()),
                    _ => AgencyError::Storage(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => AgencyError::NotFound("no rows returned by query".into()),
            RE::FromSqlConversionFailure(_, _, cause) => {
                AgencyError::Storage(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, _, ty) => {
                AgencyError::Storage(format!("invalid column type: {ty}"))
            }
            RE::InvalidPath(path) => AgencyError::Config(format!(
                "invalid cache database path: {}",
                path.to_string_lossy()
            )),
            other => AgencyError::Storage(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_agency())
    }
}

/* -------------------------------------------------------------------------- */
/* r2d2::Error → AgencyError */
/* -------------------------------------------------------------------------- */

impl From<r2d2::Error> for InfraError {
    fn from(value: r2d2::Error) -> Self {
        InfraError(AgencyError::Storage(format!("connection pool: {value}")))
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → AgencyError */
/* -------------------------------------------------------------------------- */

impl IntoAgencyError for HttpError {
    fn into_agency(self) -> AgencyError {
        if self.is_timeout() {
            return AgencyError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return AgencyError::Network("HTTP connection failure".into());
        }

        if self.is_builder() {
            return AgencyError::Config(format!("invalid HTTP request: {self}"));
        }

        if self.is_decode() {
            return AgencyError::Internal(format!("malformed HTTP response: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 | 403 => AgencyError::Auth(message),
                404 => AgencyError::NotFound(message),
                409 => AgencyError::Conflict(message),
                429 => AgencyError::Network(message),
                400..=499 => AgencyError::Validation(message),
                _ => AgencyError::Network(message),
            };
        }

        AgencyError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_agency())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → AgencyError */
/* -------------------------------------------------------------------------- */

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        InfraError(AgencyError::Internal(format!("JSON encoding failed: {value}")))
    }
}

/* -------------------------------------------------------------------------- */
/* CommonError → AgencyError */
/* -------------------------------------------------------------------------- */

impl IntoAgencyError for CommonError {
    fn into_agency(self) -> AgencyError {
        let message = self.to_string();
        match self {
            CommonError::Validation { .. } => AgencyError::Validation(message),
            CommonError::Unauthorized { .. } => AgencyError::Auth(message),
            CommonError::Persistence { .. } => AgencyError::Storage(message),
            CommonError::Serialization { .. } | CommonError::Internal { .. } => {
                AgencyError::Internal(message)
            }
        }
    }
}

impl From<CommonError> for InfraError {
    fn from(value: CommonError) -> Self {
        InfraError(value.into_agency())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
