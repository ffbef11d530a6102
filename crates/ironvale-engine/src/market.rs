//! Player marketplace and system buy-back
//!
//! A listing escrows its units: they leave the seller's stack when the
//! listing is created and go to the buyer on sale, or back to the seller on
//! cancellation. The listing's version check is what makes a sale happen
//! exactly once when buyers race.

use crate::engine::{Engine, Require};
use crate::error::Result;
use crate::views::{ListingView, Page, Purchase, SystemSale};
use chrono::Utc;
use ironvale_core::{
    AccountId, Error as RuleError, Gold, Item, ItemCategory, ItemId, ListingId,
    ListingKind, ListingStatus, MarketListing, PendingWrite, Principal, WriteSet,
};
use ironvale_db::Snapshot;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// A listing request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewListing {
    pub item: ItemId,
    pub quantity: u32,
    /// Price for the whole lot
    pub price: Gold,
    #[serde(default)]
    pub kind: ListingKind,
}

/// Filters for browsing active listings; unset fields match everything
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingFilter {
    /// Case-insensitive match on item name or category
    pub search: Option<String>,
    pub category: Option<ItemCategory>,
    pub max_price: Option<Gold>,
}

impl ListingFilter {
    fn matches(&self, listing: &MarketListing, item: &Item) -> bool {
        if let Some(category) = self.category {
            if item.category != category {
                return false;
            }
        }
        if let Some(max_price) = self.max_price {
            if listing.price > max_price {
                return false;
            }
        }
        match self.search.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => {
                let needle = needle.to_lowercase();
                item.name.to_lowercase().contains(&needle)
                    || item.category.as_str().contains(&needle)
            }
            _ => true,
        }
    }
}

/// Zero-based page request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            per_page: 20,
        }
    }
}

/// Remove `quantity` units from the owner's stack of `item`
fn withdraw(
    snap: &Snapshot<'_>,
    owner: AccountId,
    item: ItemId,
    quantity: u32,
    ws: &mut WriteSet,
) -> Result<()> {
    let mut stack = snap.stack(owner, item)?.ok_or(RuleError::InsufficientItems {
        required: quantity,
        available: 0,
    })?;
    let version = stack.version;
    if stack.take(quantity)? {
        ws.push(PendingWrite::RemoveEntry {
            id: stack.id,
            version,
        });
    } else {
        ws.push(PendingWrite::UpdateEntry(stack));
    }
    Ok(())
}

impl Engine {
    /// Escrow units from the caller's inventory into a new Active listing
    pub fn create_listing(&self, principal: &Principal, request: NewListing) -> Result<ListingView> {
        let ((mut listing, item), committed) = self.transact("create_listing", principal, |snap| {
            if request.kind == ListingKind::Admin && !principal.is_admin() {
                return Err(RuleError::Forbidden(format!(
                    "{} may not post admin listings",
                    principal.account
                ))
                .into());
            }
            if request.quantity == 0 {
                return Err(RuleError::InvalidQuantity.into());
            }
            let item = snap.require_item(request.item)?;
            if !item.tradeable {
                return Err(RuleError::NotTradeable(item.name).into());
            }

            let mut ws = WriteSet::new();
            withdraw(snap, principal.account, item.id, request.quantity, &mut ws)?;
            let listing = MarketListing::new(
                principal.account,
                item.id,
                request.quantity,
                request.price,
                request.kind,
                Utc::now(),
            )?;
            ws.push(PendingWrite::InsertListing(listing.clone()));
            Ok((ws, (listing, item)))
        })?;

        if let Some(id) = committed.listing() {
            listing.id = id;
        }
        info!(
            account = %principal.account,
            listing = %listing.id,
            item = %listing.item_id,
            quantity = listing.quantity,
            price = %listing.price,
            "listing created"
        );
        Ok(ListingView::new(&listing, &item))
    }

    /// Withdraw an Active listing and return its units to the seller
    pub fn cancel_listing(&self, principal: &Principal, listing_id: ListingId) -> Result<ListingView> {
        let (view, _) = self.transact("cancel_listing", principal, |snap| {
            let mut listing = snap.require_listing(listing_id)?;
            listing.cancel_by(principal.account, Utc::now())?;
            let item = snap.require_item(listing.item_id)?;

            let mut ws = WriteSet::new();
            ws.push(PendingWrite::GrantItem {
                owner: listing.seller,
                item_id: listing.item_id,
                quantity: listing.quantity,
            });
            let view = ListingView::new(&listing, &item);
            ws.push(PendingWrite::UpdateListing(listing));
            Ok((ws, view))
        })?;

        info!(account = %principal.account, listing = %listing_id, "listing cancelled");
        Ok(view)
    }

    /// Buy an Active listing outright
    pub fn buy_item(&self, principal: &Principal, listing_id: ListingId) -> Result<Purchase> {
        let (purchase, _) = self.transact("buy_item", principal, |snap| {
            let mut listing = snap.require_listing(listing_id)?;
            listing.sell_to(principal.account, Utc::now())?;
            let mut wallet = snap.require_wallet(principal.account)?;
            wallet.debit(listing.price)?;

            let mut ws = WriteSet::new();
            let purchase = Purchase {
                listing: listing.id,
                item: listing.item_id,
                quantity: listing.quantity,
                price: listing.price,
                balance: wallet.balance,
            };
            if !listing.price.is_zero() {
                ws.push(PendingWrite::UpdateWallet(wallet));
                ws.push(PendingWrite::CreditWallet {
                    owner: listing.seller,
                    amount: listing.price,
                });
            }
            ws.push(PendingWrite::GrantItem {
                owner: principal.account,
                item_id: listing.item_id,
                quantity: listing.quantity,
            });
            ws.push(PendingWrite::UpdateListing(listing));
            Ok((ws, purchase))
        })?;

        info!(
            account = %principal.account,
            listing = %listing_id,
            price = %purchase.price,
            "listing bought"
        );
        Ok(purchase)
    }

    /// Sell units back to the game at the catalog price and buy-back rate
    pub fn sell_to_system(&self, principal: &Principal, item_id: ItemId, quantity: u32) -> Result<SystemSale> {
        let rate = self.config().buyback_percent;
        let (sale, _) = self.transact("sell_to_system", principal, |snap| {
            if quantity == 0 {
                return Err(RuleError::InvalidQuantity.into());
            }
            let item = snap.require_item(item_id)?;
            let mut wallet = snap.require_wallet(principal.account)?;

            let mut ws = WriteSet::new();
            withdraw(snap, principal.account, item.id, quantity, &mut ws)?;

            let payout = item
                .base_price
                .checked_mul(u64::from(quantity))
                .and_then(|gross| gross.checked_percent(rate))
                .ok_or(RuleError::Overflow("sell payout"))?;
            wallet.credit(payout)?;

            let sale = SystemSale {
                item: item.id,
                quantity,
                payout,
                balance: wallet.balance,
            };
            ws.push(PendingWrite::UpdateWallet(wallet));
            Ok((ws, sale))
        })?;

        info!(
            account = %principal.account,
            item = %item_id,
            quantity,
            payout = %sale.payout,
            "sold to system"
        );
        Ok(sale)
    }

    /// Browse Active listings, newest first
    pub fn list_active_listings(
        &self,
        filter: &ListingFilter,
        request: PageRequest,
    ) -> Result<Page<ListingView>> {
        let snap = self.snapshot()?;
        let mut matched = Vec::new();
        for listing in snap.listings_with_status(ListingStatus::Active)? {
            if let Some(item) = snap.item(listing.item_id)? {
                if filter.matches(&listing, &item) {
                    matched.push(ListingView::new(&listing, &item));
                }
            }
        }

        let per_page = request.per_page.clamp(1, self.config().max_page_size);
        let total = matched.len();
        debug!(total, page = request.page, per_page, "browsed listings");
        let items = matched
            .into_iter()
            .skip(request.page as usize * per_page as usize)
            .take(per_page as usize)
            .collect();
        Ok(Page {
            items,
            page: request.page,
            per_page,
            total,
        })
    }

    /// The caller's Active listings, newest first
    pub fn list_my_listings(&self, principal: &Principal) -> Result<Vec<ListingView>> {
        let snap = self.snapshot()?;
        let mut mine = Vec::new();
        for listing in snap.listings_by_seller(principal.account)? {
            if !listing.is_active() {
                continue;
            }
            let item = snap.require_item(listing.item_id)?;
            mine.push(ListingView::new(&listing, &item));
        }
        Ok(mine)
    }
}
