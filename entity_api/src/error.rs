//! Error types for entity API
use std::error::Error as StdError;
use std::fmt;

use serde::Serialize;

use sea_orm::error::DbErr;

/// Errors while executing operations related to entities.
/// The intent is to categorize errors into two major types:
///  * Errors related to data. Ex DbError::RecordNotFound
///  * Errors related to interactions with the database itself. Ex DbError::Conn
#[derive(Debug, PartialEq)]
pub struct Error {
    // Underlying error emitted from seaORM internals
    pub source: Option<DbErr>,
    // Enum representing which category of error
    pub error_kind: EntityApiErrorKind,
}

#[derive(Debug, PartialEq, Serialize)]
pub enum EntityApiErrorKind {
    // Record not found, or gone before it could be updated
    RecordNotFound,
    // Errors related to interactions with the database itself. Ex DbError::Conn
    SystemError,
    // Validation error
    ValidationError,
}

impl Error {
    pub(crate) fn not_found() -> Self {
        Error {
            source: None,
            error_kind: EntityApiErrorKind::RecordNotFound,
        }
    }

    pub(crate) fn invalid() -> Self {
        Error {
            source: None,
            error_kind: EntityApiErrorKind::ValidationError,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Entity API Error: {:?}", self)
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source.as_ref().map(|e| e as &(dyn StdError + 'static))
    }
}

impl From<DbErr> for Error {
    fn from(err: DbErr) -> Self {
        let error_kind = match err {
            DbErr::RecordNotFound(_) | DbErr::RecordNotUpdated => {
                EntityApiErrorKind::RecordNotFound
            }
            DbErr::ConnectionAcquire(_) | DbErr::Conn(_) | DbErr::Exec(_) => {
                EntityApiErrorKind::SystemError
            }
            _ => EntityApiErrorKind::SystemError,
        };

        Error {
            source: Some(err),
            error_kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_not_found_db_error_maps_to_record_not_found() {
        let err: Error = DbErr::RecordNotFound("messages".to_owned()).into();

        assert_eq!(err.error_kind, EntityApiErrorKind::RecordNotFound);
        assert!(err.source.is_some());
    }

    #[test]
    fn record_not_updated_db_error_maps_to_record_not_found() {
        let err: Error = DbErr::RecordNotUpdated.into();

        assert_eq!(err.error_kind, EntityApiErrorKind::RecordNotFound);
    }

    #[test]
    fn connection_errors_map_to_system_error() {
        let err: Error = DbErr::Custom("pool closed".to_owned()).into();

        assert_eq!(err.error_kind, EntityApiErrorKind::SystemError);
    }
}
