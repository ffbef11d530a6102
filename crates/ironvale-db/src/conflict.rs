//! Version conflicts detected at commit
//!
//! A commit compares the version each update was computed from with the
//! version currently stored. Three outcomes abort the commit:
//!
//! - **Stale**: the row exists but was written by someone else in between
//! - **Vanished**: the row was deleted in between
//! - **Occupied**: an insert collided with a row that appeared in between
//!   (e.g. a second battle session for the same character)

use ironvale_core::PendingWrite;
use std::fmt;

/// How the stored row disagreed with the write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    Stale { expected: u64, found: u64 },
    Vanished { expected: u64 },
    Occupied { found: u64 },
}

/// A rejected write and the record it targeted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub target: String,
    pub kind: ConflictKind,
}

impl Conflict {
    /// Compare a versioned write with the version found in the store
    ///
    /// Returns `None` when the write may proceed.
    pub fn check(write: &PendingWrite, found: Option<u64>) -> Option<Conflict> {
        let expected = write.expected_version()?;
        let kind = match found {
            Some(found) if found == expected => return None,
            Some(found) => ConflictKind::Stale { expected, found },
            None => ConflictKind::Vanished { expected },
        };
        Some(Conflict {
            target: write.target(),
            kind,
        })
    }

    pub fn occupied(target: String, found: u64) -> Conflict {
        Conflict {
            target,
            kind: ConflictKind::Occupied { found },
        }
    }
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ConflictKind::Stale { expected, found } => write!(
                f,
                "{} changed underneath the operation (read version {}, stored version {})",
                self.target, expected, found
            ),
            ConflictKind::Vanished { expected } => write!(
                f,
                "{} was removed after it was read at version {}",
                self.target, expected
            ),
            ConflictKind::Occupied { found } => write!(
                f,
                "{} already exists at version {}",
                self.target, found
            ),
        }
    }
}
