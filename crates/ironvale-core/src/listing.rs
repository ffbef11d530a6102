//! Marketplace listings
//!
//! A listing escrows `quantity` units pulled out of the seller's inventory.
//! Status only ever moves out of `Active`, and exactly once.

use crate::error::{Error, Result};
use crate::{AccountId, Gold, ItemId, ListingId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListingStatus {
    Active,
    Sold,
    Cancelled,
}

impl ListingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingStatus::Active => "active",
            ListingStatus::Sold => "sold",
            ListingStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a listing was put up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListingType {
    /// Posted by a player from their own inventory
    Player,
    /// Fixed shop stock posted by an administrator
    Fixed,
}

/// Who set the price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceType {
    Player,
    Admin,
}

/// Requested kind of listing; `Admin` needs the admin role
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListingKind {
    #[default]
    Player,
    Admin,
}

impl ListingKind {
    pub fn types(&self) -> (ListingType, PriceType) {
        match self {
            ListingKind::Player => (ListingType::Player, PriceType::Player),
            ListingKind::Admin => (ListingType::Fixed, PriceType::Admin),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketListing {
    pub id: ListingId,
    pub seller: AccountId,
    pub item_id: ItemId,
    pub quantity: u32,
    /// Price for the whole lot
    pub price: Gold,
    pub status: ListingStatus,
    pub listing_type: ListingType,
    pub price_type: PriceType,
    pub created_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    pub buyer: Option<AccountId>,
    pub version: u64,
}

impl MarketListing {
    /// A new Active listing; the id is allocated on commit
    pub fn new(
        seller: AccountId,
        item_id: ItemId,
        quantity: u32,
        price: Gold,
        kind: ListingKind,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        if quantity == 0 {
            return Err(Error::InvalidQuantity);
        }
        let (listing_type, price_type) = kind.types();
        Ok(Self {
            id: ListingId::new(0),
            seller,
            item_id,
            quantity,
            price,
            status: ListingStatus::Active,
            listing_type,
            price_type,
            created_at: now,
            closed_at: None,
            buyer: None,
            version: 0,
        })
    }

    pub fn is_active(&self) -> bool {
        self.status == ListingStatus::Active
    }

    /// Close the listing as sold to `buyer`
    pub fn sell_to(&mut self, buyer: AccountId, now: DateTime<Utc>) -> Result<()> {
        if !self.is_active() {
            return Err(Error::AlreadySold(self.id));
        }
        if buyer == self.seller {
            return Err(Error::SelfPurchase);
        }
        self.status = ListingStatus::Sold;
        self.buyer = Some(buyer);
        self.closed_at = Some(now);
        Ok(())
    }

    /// Withdraw the listing on behalf of `caller`
    pub fn cancel_by(&mut self, caller: AccountId, now: DateTime<Utc>) -> Result<()> {
        if !self.is_active() {
            return Err(Error::AlreadyProcessed(self.id));
        }
        if caller != self.seller {
            return Err(Error::Forbidden(format!("{} is not the seller of {}", caller, self.id)));
        }
        self.status = ListingStatus::Cancelled;
        self.closed_at = Some(now);
        Ok(())
    }
}
