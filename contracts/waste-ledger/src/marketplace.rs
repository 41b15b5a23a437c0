//! Marketplace for processed output.
//!
//! Listings are price announcements by recyclers. Purchases settle in the
//! configured token straight from the buyer's allowance: the seller receives the
//! total minus the platform fee, and the fee lands in the contract's fee pool.

use soroban_sdk::{log, Address, Env, String, Vec};

use crate::access;
use crate::config;
use crate::events;
use crate::math;
use crate::storage::{self, DataKey};
use crate::treasury;
use crate::types::{
    Error, ListingStatus, MarketplaceListing, QualityGrade, UserRole, WasteStream,
};

/// Input of a new listing.
pub struct NewListing {
    pub waste_stream: WasteStream,
    pub amount: u64,
    pub price_per_unit: i128,
    pub quality: QualityGrade,
    pub description: String,
    pub carbon_credits: Option<i128>,
}

fn load_own_active(env: &Env, seller: &Address, id: u64) -> Result<MarketplaceListing, Error> {
    let listing = storage::get_listing(env, id)?;
    if listing.seller != *seller {
        return Err(Error::NotSeller);
    }
    if listing.status != ListingStatus::Active {
        return Err(Error::ListingNotActive);
    }
    Ok(listing)
}

/// Marks a listing closed and frees one slot of the seller's active cap.
fn close(env: &Env, listing: &mut MarketplaceListing, status: ListingStatus) -> Result<(), Error> {
    listing.status = status;
    listing.is_active = false;
    storage::remove_from_index(env, &DataKey::ActiveListings, listing.id);

    let mut profile = storage::get_profile(env, &listing.seller)?;
    profile.active_listings = profile.active_listings.saturating_sub(1);
    storage::set_profile(env, &listing.seller, &profile);
    Ok(())
}

pub fn create(env: &Env, seller: &Address, input: NewListing) -> Result<u64, Error> {
    access::require_not_paused(env)?;
    seller.require_auth();
    access::authorize(env, seller, UserRole::Recycler)?;

    if input.amount == 0 || input.price_per_unit <= 0 {
        return Err(Error::InvalidInput);
    }
    if matches!(input.carbon_credits, Some(credits) if credits < 0) {
        return Err(Error::InvalidInput);
    }

    let mut profile = storage::get_profile(env, seller)?;
    let limit = config::max_active_listings(env);
    if profile.active_listings >= limit {
        log!(env, "Active listing cap reached. Active: {}, Limit: {}", profile.active_listings, limit);
        return Err(Error::TooManyActiveListings);
    }

    let id = storage::next_id(env, &DataKey::ListingCounter)?;
    let listing = MarketplaceListing {
        id,
        seller: seller.clone(),
        waste_stream: input.waste_stream,
        amount: input.amount,
        price_per_unit: input.price_per_unit,
        quality: input.quality,
        description: input.description,
        is_active: true,
        status: ListingStatus::Active,
        created_at: env.ledger().timestamp(),
        carbon_credits: input.carbon_credits,
        sold_amount: 0,
    };
    storage::set_listing(env, &listing);
    storage::push_index(env, &DataKey::ActiveListings, id);

    profile.active_listings += 1;
    storage::set_profile(env, seller, &profile);

    events::listing_created(env, id, seller, listing.amount, listing.price_per_unit);
    Ok(id)
}

pub fn update(
    env: &Env,
    seller: &Address,
    id: u64,
    amount: u64,
    price_per_unit: i128,
    description: String,
) -> Result<(), Error> {
    access::require_not_paused(env)?;
    seller.require_auth();
    access::authorize(env, seller, UserRole::Recycler)?;

    let mut listing = load_own_active(env, seller, id)?;
    if amount == 0 || price_per_unit <= 0 {
        return Err(Error::InvalidInput);
    }

    listing.amount = amount;
    listing.price_per_unit = price_per_unit;
    listing.description = description;
    storage::set_listing(env, &listing);

    events::listing_updated(env, id, amount, price_per_unit);
    Ok(())
}

pub fn cancel(env: &Env, seller: &Address, id: u64) -> Result<(), Error> {
    access::require_not_paused(env)?;
    seller.require_auth();
    access::authorize(env, seller, UserRole::Recycler)?;

    let mut listing = load_own_active(env, seller, id)?;
    close(env, &mut listing, ListingStatus::Cancelled)?;
    storage::set_listing(env, &listing);

    events::listing_cancelled(env, id, seller);
    Ok(())
}

/// Buys `amount` units and returns the total price charged to the buyer.
pub fn purchase(env: &Env, buyer: &Address, id: u64, amount: u64) -> Result<i128, Error> {
    access::require_not_paused(env)?;
    buyer.require_auth();
    access::require_registered(env, buyer)?;

    let mut listing = storage::get_listing(env, id)?;
    if listing.status != ListingStatus::Active {
        return Err(Error::ListingNotActive);
    }
    if listing.seller == *buyer {
        return Err(Error::NotAuthorized);
    }
    if amount == 0 {
        return Err(Error::InvalidInput);
    }
    if amount > listing.amount {
        log!(env, "Purchase exceeds listing. Requested: {}, Remaining: {}", amount, listing.amount);
        return Err(Error::InsufficientAmount);
    }

    let total = math::total_price(amount, listing.price_per_unit)?;
    let payout = math::split_fee(total, config::platform_fee_bps(env))?;

    listing.amount -= amount;
    listing.sold_amount = listing
        .sold_amount
        .checked_add(amount)
        .ok_or(Error::Overflow)?;
    if listing.amount == 0 {
        close(env, &mut listing, ListingStatus::Completed)?;
    }
    storage::set_listing(env, &listing);

    let mut profile = storage::get_profile(env, &listing.seller)?;
    profile.total_earnings = profile
        .total_earnings
        .checked_add(payout.net)
        .ok_or(Error::Overflow)?;
    storage::set_profile(env, &listing.seller, &profile);

    treasury::accrue_fee(env, payout.fee)?;
    storage::add_amount(env, &DataKey::MarketplaceVolume, total)?;

    treasury::settle_purchase(env, buyer, &listing.seller, payout.net, payout.fee)?;

    events::listing_purchased(env, id, buyer, amount, total);
    Ok(total)
}

/// Largest page served by [`listings_page`].
pub const MAX_PAGE_SIZE: u32 = 100;

fn matches_stream(listing: &MarketplaceListing, waste_stream: Option<WasteStream>) -> bool {
    waste_stream.map_or(true, |stream| stream == listing.waste_stream)
}

/// Listings in id order, optionally restricted to one stream and to active ones.
/// Active queries walk the open-listing index only.
pub fn listings(env: &Env, waste_stream: Option<WasteStream>, active_only: bool) -> Vec<MarketplaceListing> {
    if !active_only {
        let count = storage::read_counter(env, &DataKey::ListingCounter);
        return listings_page(env, waste_stream, 1, count);
    }

    let mut result = Vec::new(env);
    for id in storage::read_index(env, &DataKey::ActiveListings).iter() {
        if let Ok(listing) = storage::get_listing(env, id) {
            if matches_stream(&listing, waste_stream) {
                result.push_back(listing);
            }
        }
    }
    result
}

/// Listings with ids in `start_id..start_id + limit`, active or not.
pub fn listings_page(
    env: &Env,
    waste_stream: Option<WasteStream>,
    start_id: u64,
    limit: u64,
) -> Vec<MarketplaceListing> {
    let mut result = Vec::new(env);
    let count = storage::read_counter(env, &DataKey::ListingCounter);
    let first = start_id.max(1);
    let last = first.saturating_add(limit).saturating_sub(1).min(count);
    for id in first..=last {
        let Ok(listing) = storage::get_listing(env, id) else {
            continue;
        };
        if matches_stream(&listing, waste_stream) {
            result.push_back(listing);
        }
    }
    result
}
