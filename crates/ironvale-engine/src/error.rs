//! Error types for ironvale-engine
//!
//! Business-rule failures pass through unchanged from `ironvale-core`.
//! Version conflicts never escape as such: the engine retries them and
//! reports `Transient` once the attempts run out.

use ironvale_core::ErrorCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in ironvale-engine
#[derive(Debug, Error)]
pub enum Error {
    /// An expected business outcome (not enough energy, listing sold, ...)
    #[error(transparent)]
    Rule(#[from] ironvale_core::Error),

    /// Every attempt hit a concurrent modification; safe to retry
    #[error("operation gave up after {attempts} conflicting attempts")]
    Transient { attempts: u32 },

    /// Unexpected storage failure; nothing was applied
    #[error("storage error: {0}")]
    Storage(ironvale_db::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// The failure category for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::Rule(err) => err.code(),
            Error::Transient { .. } => ErrorCode::Transient,
            Error::Storage(_) | Error::Config(_) => ErrorCode::Internal,
        }
    }

    /// Stable machine-readable name of the specific failure
    pub fn reason(&self) -> &'static str {
        match self {
            Error::Rule(err) => err.reason(),
            Error::Transient { .. } => "Transient",
            Error::Storage(_) => "Storage",
            Error::Config(_) => "Config",
        }
    }

    /// The business rule that failed, if that is what this is
    pub fn rule(&self) -> Option<&ironvale_core::Error> {
        match self {
            Error::Rule(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ironvale_db::Error> for Error {
    fn from(err: ironvale_db::Error) -> Self {
        match err {
            ironvale_db::Error::Record(rule) => Error::Rule(rule),
            ironvale_db::Error::DuplicateKey(what) => {
                Error::Rule(ironvale_core::Error::AlreadyExists(what))
            }
            other => Error::Storage(other),
        }
    }
}

/// Serializable failure half of an operation's result envelope
///
/// Storage details are not exposed; internal failures carry a generic
/// message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    pub code: ErrorCode,
    pub reason: String,
    pub message: String,
}

impl From<Error> for Failure {
    fn from(err: Error) -> Self {
        let message = match &err {
            Error::Storage(_) | Error::Config(_) => "internal error".to_string(),
            other => other.to_string(),
        };
        Failure {
            code: err.code(),
            reason: err.reason().to_string(),
            message,
        }
    }
}

/// Result envelope handed to the web layer: a payload or a [`Failure`]
pub type Outcome<T> = std::result::Result<T, Failure>;

// Compile-time check that Error is Send + Sync for thread-safe error propagation.
fn _assert_error_send_sync<T: Send + Sync>() {}
fn _error_is_send_sync() {
    _assert_error_send_sync::<Error>();
}

#[cfg(test)]
mod tests {
    use super::*;
    use ironvale_core::ListingId;

    #[test]
    fn test_rule_codes_pass_through() {
        let err = Error::from(ironvale_core::Error::AlreadySold(ListingId::new(4)));
        assert_eq!(err.code(), ErrorCode::AlreadyProcessed);
        assert_eq!(err.reason(), "AlreadySold");
    }

    #[test]
    fn test_db_duplicate_becomes_already_exists() {
        let err = Error::from(ironvale_db::Error::DuplicateKey("character".into()));
        assert!(matches!(
            err,
            Error::Rule(ironvale_core::Error::AlreadyExists(_))
        ));
    }

    #[test]
    fn test_failure_hides_storage_details() {
        let failure = Failure::from(Error::Storage(ironvale_db::Error::Database(
            "disk on fire".into(),
        )));
        assert_eq!(failure.code, ErrorCode::Internal);
        assert_eq!(failure.message, "internal error");
    }

    #[test]
    fn test_transient_failure() {
        let failure = Failure::from(Error::Transient { attempts: 3 });
        assert_eq!(failure.code, ErrorCode::Transient);
        assert!(failure.message.contains("3"));
    }
}
