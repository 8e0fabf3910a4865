use sqlx::error::ErrorKind;
use thiserror::Error;

/// Postgres SQLSTATE for malformed literals, e.g. an out-of-range integer.
const INVALID_TEXT_REPRESENTATION: &str = "22P02";

/// Failure of a store operation, classified so the HTTP edge can pick a status.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    #[error("duplicate value violates {constraint}")]
    Duplicate { constraint: String },

    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    #[error("integrity violation: {message}")]
    Integrity { message: String },

    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl StoreError {
    pub fn duplicate(constraint: impl Into<String>) -> Self {
        Self::Duplicate {
            constraint: constraint.into(),
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(db) => match db.kind() {
                ErrorKind::UniqueViolation => StoreError::Duplicate {
                    constraint: db.constraint().unwrap_or("unknown").to_string(),
                },
                ErrorKind::ForeignKeyViolation => StoreError::InvalidInput {
                    message: db.message().to_string(),
                },
                ErrorKind::NotNullViolation | ErrorKind::CheckViolation => {
                    StoreError::Integrity {
                        message: db.message().to_string(),
                    }
                }
                _ if db.code().as_deref() == Some(INVALID_TEXT_REPRESENTATION) => {
                    StoreError::InvalidInput {
                        message: db.message().to_string(),
                    }
                }
                _ => StoreError::Database(sqlx::Error::Database(db)),
            },
            other => StoreError::Database(other),
        }
    }
}
