//! Identity types for records in the entity store

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Create a new ID
            pub fn new(id: u64) -> Self {
                Self(id)
            }

            /// Get the raw ID value
            pub fn raw(&self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, ":{}"), self.0)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }
    };
}

record_id!(
    /// Account that owns a character, its wallet, and its inventory
    AccountId,
    "account"
);
record_id!(
    /// Player character
    CharacterId,
    "character"
);
record_id!(
    /// Catalog item
    ItemId,
    "item"
);
record_id!(
    /// Catalog enemy
    EnemyId,
    "enemy"
);
record_id!(
    /// A stack of one item type held by one account
    EntryId,
    "entry"
);
record_id!(
    /// Marketplace listing
    ListingId,
    "listing"
);
record_id!(
    /// Server-owned battle session
    BattleId,
    "battle"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefix() {
        assert_eq!(format!("{}", CharacterId::new(7)), "character:7");
        assert_eq!(format!("{}", ListingId::new(42)), "listing:42");
        assert_eq!(ItemId::from(3).raw(), 3);
    }

    #[test]
    fn test_ids_serialize_transparently() {
        let text = ron::to_string(&EnemyId::new(9)).expect("serialize");
        assert_eq!(text, "9");
    }
}
