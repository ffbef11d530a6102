//! Error types for ironvale-core
//!
//! These are the expected business outcomes of a game action. They are
//! reported to the caller verbatim and never retried automatically.

use crate::{Gold, ListingId};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Coarse failure category exposed to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    /// A referenced character, enemy, item, listing, or battle does not exist
    NotFound,
    /// The caller may not act on this record
    Forbidden,
    /// Not enough energy, gold, items, or upgrade points
    InsufficientResource,
    /// Unknown resource type, stat type, or malformed request values
    InvalidInput,
    /// The listing already left the Active state
    AlreadyProcessed,
    /// Concurrent modification; the whole operation may be retried
    Transient,
    /// Unexpected storage failure
    Internal,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorCode::NotFound => "NotFound",
            ErrorCode::Forbidden => "Forbidden",
            ErrorCode::InsufficientResource => "InsufficientResource",
            ErrorCode::InvalidInput => "InvalidInput",
            ErrorCode::AlreadyProcessed => "AlreadyProcessed",
            ErrorCode::Transient => "Transient",
            ErrorCode::Internal => "Internal",
        };
        f.write_str(name)
    }
}

/// Business-rule error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("{0} already exists")]
    AlreadyExists(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("inventory entry {0} belongs to another account")]
    NotOwned(String),

    #[error("not enough energy: need {required}, have {available}")]
    InsufficientEnergy { required: u32, available: u32 },

    #[error("not enough gold: need {required}, have {available}")]
    InsufficientFunds { required: Gold, available: Gold },

    #[error("not enough items: need {required}, have {available}")]
    InsufficientItems { required: u32, available: u32 },

    #[error("no upgrade points left")]
    InsufficientPoints,

    #[error("unknown resource type: {0}")]
    InvalidResource(String),

    #[error("unknown stat type: {0}")]
    InvalidStat(String),

    #[error("quantity must be at least 1")]
    InvalidQuantity,

    #[error("{0} cannot be traded")]
    NotTradeable(String),

    #[error("{0} is not a potion")]
    NotPotion(String),

    #[error("no {0} left")]
    NoStock(String),

    #[error("health is already full")]
    FullHealth,

    #[error("{0} cannot be equipped")]
    NotEquippable(String),

    #[error("{0} is not equipped")]
    NotEquipped(String),

    #[error("listing {0} was already processed")]
    AlreadyProcessed(ListingId),

    #[error("listing {0} was already sold or withdrawn")]
    AlreadySold(ListingId),

    #[error("cannot buy your own listing")]
    SelfPurchase,

    #[error("arithmetic overflow in {0}")]
    Overflow(&'static str),
}

impl Error {
    /// Shorthand for a missing record
    pub fn not_found(kind: &'static str, id: impl fmt::Display) -> Self {
        Error::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// The failure category for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::NotFound { .. } => ErrorCode::NotFound,
            Error::Forbidden(_) | Error::NotOwned(_) => ErrorCode::Forbidden,
            Error::InsufficientEnergy { .. }
            | Error::InsufficientFunds { .. }
            | Error::InsufficientItems { .. }
            | Error::InsufficientPoints
            | Error::NoStock(_) => ErrorCode::InsufficientResource,
            Error::AlreadyExists(_)
            | Error::InvalidResource(_)
            | Error::InvalidStat(_)
            | Error::InvalidQuantity
            | Error::NotTradeable(_)
            | Error::NotPotion(_)
            | Error::FullHealth
            | Error::NotEquippable(_)
            | Error::NotEquipped(_)
            | Error::SelfPurchase => ErrorCode::InvalidInput,
            Error::AlreadyProcessed(_) | Error::AlreadySold(_) => ErrorCode::AlreadyProcessed,
            Error::Overflow(_) => ErrorCode::Internal,
        }
    }

    /// Stable machine-readable name of the specific failure
    pub fn reason(&self) -> &'static str {
        match self {
            Error::NotFound { .. } => "NotFound",
            Error::AlreadyExists(_) => "AlreadyExists",
            Error::Forbidden(_) => "Forbidden",
            Error::NotOwned(_) => "NotOwned",
            Error::InsufficientEnergy { .. } => "InsufficientEnergy",
            Error::InsufficientFunds { .. } => "InsufficientFunds",
            Error::InsufficientItems { .. } => "InsufficientItems",
            Error::InsufficientPoints => "InsufficientPoints",
            Error::InvalidResource(_) => "InvalidResource",
            Error::InvalidStat(_) => "InvalidStat",
            Error::InvalidQuantity => "InvalidQuantity",
            Error::NotTradeable(_) => "NotTradeable",
            Error::NotPotion(_) => "NotPotion",
            Error::NoStock(_) => "NoStock",
            Error::FullHealth => "FullHealth",
            Error::NotEquippable(_) => "NotEquippable",
            Error::NotEquipped(_) => "NotEquipped",
            Error::AlreadyProcessed(_) => "AlreadyProcessed",
            Error::AlreadySold(_) => "AlreadySold",
            Error::SelfPurchase => "SelfPurchase",
            Error::Overflow(_) => "Overflow",
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
