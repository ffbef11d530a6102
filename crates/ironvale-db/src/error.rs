//! Error types for store operations.

use crate::conflict::Conflict;
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Native DB error.
    #[error("Database error: {0}")]
    Database(String),

    /// A row the write set relies on does not exist.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Duplicate key.
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    /// A version-checked write found the row changed since it was read.
    ///
    /// Nothing from the write set was applied.
    #[error("Write conflict: {0}")]
    Conflict(Conflict),

    /// A record rule rejected the write (e.g. a credit overflowed).
    #[error(transparent)]
    Record(#[from] ironvale_core::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::Conflict(_))
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<native_db::db_type::Error> for Error {
    fn from(err: native_db::db_type::Error) -> Self {
        Error::Database(err.to_string())
    }
}

impl From<Conflict> for Error {
    fn from(conflict: Conflict) -> Self {
        Error::Conflict(conflict)
    }
}
