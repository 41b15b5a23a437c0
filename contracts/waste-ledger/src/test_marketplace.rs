#![cfg(test)]

use super::*;
use crate::test::Fixture;
use soroban_sdk::{testutils::Address as _, Address};

/// 0.1 token per unit
const PRICE: i128 = 1_000_000;
const BUYER_FUNDS: i128 = 1_000_000_000;

fn list(f: &Fixture, seller: &Address, amount: u64) -> u64 {
    f.client.create_listing(
        seller,
        &WasteStream::Plastic,
        &amount,
        &PRICE,
        &QualityGrade::High,
        &f.text("Clean PET flakes"),
        &None,
    )
}

/// Registered collector holding funds with the contract approved to spend them.
fn funded_buyer(f: &Fixture) -> Address {
    let buyer = f.collector();
    f.token_admin.mint(&buyer, &BUYER_FUNDS);
    let expiration = f.env.ledger().sequence() + 1_000;
    f.token.approve(&buyer, &f.contract_id, &BUYER_FUNDS, &expiration);
    buyer
}

#[test]
fn test_create_listing() {
    let f = Fixture::new();
    let seller = f.recycler();

    let id = list(&f, &seller, 100);
    assert!(f.emitted("ListingCreated"));

    let listing = f.client.get_listing(&id);
    assert_eq!(listing.seller, seller);
    assert_eq!(listing.amount, 100);
    assert_eq!(listing.status, ListingStatus::Active);
    assert!(listing.is_active);
    assert_eq!(f.client.get_recycler_stats(&seller).active_listings, 1);
}

#[test]
fn test_create_listing_validation() {
    let f = Fixture::new();
    let seller = f.recycler();
    let collector = f.collector();
    let create = |who: &Address, amount: u64, price: i128| {
        f.client.try_create_listing(
            who,
            &WasteStream::Metal,
            &amount,
            &price,
            &QualityGrade::Medium,
            &f.text("Copper wire"),
            &Some(10),
        )
    };

    assert_eq!(create(&collector, 10, PRICE), Err(Ok(Error::NotAuthorized)));
    assert_eq!(create(&seller, 0, PRICE), Err(Ok(Error::InvalidInput)));
    assert_eq!(create(&seller, 10, 0), Err(Ok(Error::InvalidInput)));
    assert_eq!(create(&seller, 10, PRICE), Ok(Ok(1)));
}

#[test]
fn test_active_listing_cap() {
    let f = Fixture::new();
    let seller = f.recycler();
    f.client.set_max_active_listings(&f.admin, &1);

    let first = list(&f, &seller, 10);
    let result = f.client.try_create_listing(
        &seller,
        &WasteStream::Plastic,
        &10,
        &PRICE,
        &QualityGrade::High,
        &f.text("more"),
        &None,
    );
    assert_eq!(result, Err(Ok(Error::TooManyActiveListings)));

    // Cancelling frees the slot
    f.client.cancel_listing(&seller, &first);
    list(&f, &seller, 10);
}

#[test]
fn test_update_and_cancel_listing() {
    let f = Fixture::new();
    let seller = f.recycler();
    let other = f.recycler();
    let id = list(&f, &seller, 100);

    assert_eq!(
        f.client.try_update_listing(&other, &id, &50, &PRICE, &f.text("x")),
        Err(Ok(Error::NotSeller))
    );
    f.client.update_listing(&seller, &id, &50, &(PRICE * 2), &f.text("Sorted PET"));
    assert!(f.emitted("ListingUpdated"));
    let listing = f.client.get_listing(&id);
    assert_eq!(listing.amount, 50);
    assert_eq!(listing.price_per_unit, PRICE * 2);

    assert_eq!(f.client.try_cancel_listing(&other, &id), Err(Ok(Error::NotSeller)));
    f.client.cancel_listing(&seller, &id);
    assert!(f.emitted("ListingCancelled"));

    let listing = f.client.get_listing(&id);
    assert_eq!(listing.status, ListingStatus::Cancelled);
    assert!(!listing.is_active);
    assert_eq!(f.client.get_recycler_stats(&seller).active_listings, 0);

    assert_eq!(f.client.try_cancel_listing(&seller, &id), Err(Ok(Error::ListingNotActive)));
    assert_eq!(
        f.client.try_update_listing(&seller, &id, &10, &PRICE, &f.text("x")),
        Err(Ok(Error::ListingNotActive))
    );
}

#[test]
fn test_purchase_transfers_price_minus_fee() {
    let f = Fixture::new();
    let seller = f.recycler();
    let buyer = funded_buyer(&f);
    let id = list(&f, &seller, 100);
    let custody_before = f.token.balance(&f.contract_id);

    let total = f.client.purchase_listing(&buyer, &id, &40);
    assert!(f.emitted("ListingPurchased"));

    // 40 * 0.1 = 4.0, of which 2% is the platform fee
    assert_eq!(total, 40_000_000);
    assert_eq!(f.token.balance(&buyer), BUYER_FUNDS - 40_000_000);
    assert_eq!(f.token.balance(&seller), 39_200_000);
    assert_eq!(f.token.balance(&f.contract_id), custody_before + 800_000);
    assert_eq!(f.client.get_platform_stats().fee_pool, 800_000);
    assert_eq!(f.client.get_global_stats().marketplace_volume, 40_000_000);
    assert_eq!(f.client.get_recycler_stats(&seller).total_earnings, 39_200_000);

    let listing = f.client.get_listing(&id);
    assert_eq!(listing.amount, 60);
    assert_eq!(listing.sold_amount, 40);
    assert_eq!(listing.status, ListingStatus::Active);
}

#[test]
fn test_purchase_of_remaining_amount_closes_listing() {
    let f = Fixture::new();
    let seller = f.recycler();
    let buyer = funded_buyer(&f);
    let id = list(&f, &seller, 100);
    f.client.purchase_listing(&buyer, &id, &40);

    assert_eq!(
        f.client.try_purchase_listing(&buyer, &id, &61),
        Err(Ok(Error::InsufficientAmount))
    );

    f.client.purchase_listing(&buyer, &id, &60);
    let listing = f.client.get_listing(&id);
    assert_eq!(listing.amount, 0);
    assert_eq!(listing.sold_amount, 100);
    assert_eq!(listing.status, ListingStatus::Completed);
    assert!(!listing.is_active);
    assert_eq!(f.client.get_recycler_stats(&seller).active_listings, 0);

    assert_eq!(
        f.client.try_purchase_listing(&buyer, &id, &1),
        Err(Ok(Error::ListingNotActive))
    );
}

#[test]
fn test_purchase_requires_balance_and_allowance() {
    let f = Fixture::new();
    let seller = f.recycler();
    let id = list(&f, &seller, 100);

    let broke = f.collector();
    assert_eq!(
        f.client.try_purchase_listing(&broke, &id, &10),
        Err(Ok(Error::InsufficientBalance))
    );

    let unapproved = f.collector();
    f.token_admin.mint(&unapproved, &BUYER_FUNDS);
    assert_eq!(
        f.client.try_purchase_listing(&unapproved, &id, &10),
        Err(Ok(Error::InsufficientAllowance))
    );

    assert_eq!(f.client.get_listing(&id).amount, 100);
    assert_eq!(f.token.balance(&unapproved), BUYER_FUNDS);
}

#[test]
fn test_purchase_buyer_rules() {
    let f = Fixture::new();
    let seller = f.recycler();
    let id = list(&f, &seller, 100);

    assert_eq!(
        f.client.try_purchase_listing(&seller, &id, &10),
        Err(Ok(Error::NotAuthorized))
    );
    assert_eq!(
        f.client.try_purchase_listing(&Address::generate(&f.env), &id, &10),
        Err(Ok(Error::NotRegistered))
    );

    let buyer = funded_buyer(&f);
    assert_eq!(f.client.try_purchase_listing(&buyer, &id, &0), Err(Ok(Error::InvalidInput)));

    f.client.suspend_user(&f.admin, &buyer);
    assert_eq!(
        f.client.try_purchase_listing(&buyer, &id, &10),
        Err(Ok(Error::UserSuspended))
    );
}

#[test]
fn test_marketplace_listing_filters() {
    let f = Fixture::new();
    let seller = f.recycler();
    let plastic = list(&f, &seller, 10);
    let metal = f.client.create_listing(
        &seller,
        &WasteStream::Metal,
        &5,
        &PRICE,
        &QualityGrade::Low,
        &f.text("Scrap steel"),
        &None,
    );
    let cancelled = list(&f, &seller, 20);
    f.client.cancel_listing(&seller, &cancelled);

    let all = f.client.get_marketplace_listings(&None, &false);
    assert_eq!(all.len(), 3);

    let active = f.client.get_marketplace_listings(&None, &true);
    assert_eq!(active.len(), 2);

    let active_plastic = f.client.get_marketplace_listings(&Some(WasteStream::Plastic), &true);
    assert_eq!(active_plastic.len(), 1);
    assert_eq!(active_plastic.get(0).map(|listing| listing.id), Some(plastic));

    let metal_only = f.client.get_marketplace_listings(&Some(WasteStream::Metal), &false);
    assert_eq!(metal_only.get(0).map(|listing| listing.id), Some(metal));
}

#[test]
fn test_pause_blocks_purchase() {
    let f = Fixture::new();
    let seller = f.recycler();
    let buyer = funded_buyer(&f);
    let id = list(&f, &seller, 100);
    f.client.pause(&f.admin);

    assert_eq!(
        f.client.try_purchase_listing(&buyer, &id, &10),
        Err(Ok(Error::ContractPaused))
    );
    assert_eq!(f.token.balance(&buyer), BUYER_FUNDS);
    assert_eq!(f.client.get_listing(&id).amount, 100);
}

#[test]
fn test_active_index_and_listing_pages() {
    let f = Fixture::new();
    let seller = f.recycler();
    let buyer = funded_buyer(&f);
    let first = list(&f, &seller, 10);
    let second = list(&f, &seller, 10);
    let third = list(&f, &seller, 10);

    f.client.cancel_listing(&seller, &first);
    f.client.purchase_listing(&buyer, &third, &10);

    let active = f.client.get_marketplace_listings(&None, &true);
    assert_eq!(active.len(), 1);
    assert_eq!(active.get(0).map(|listing| listing.id), Some(second));

    let page = f.client.get_listings_page(&None, &2, &5);
    assert_eq!(page.len(), 2);
    assert_eq!(page.get(0).map(|listing| listing.id), Some(second));
    assert_eq!(page.get(1).map(|listing| listing.status), Some(ListingStatus::Completed));

    assert_eq!(f.client.get_listings_page(&None, &1, &0).len(), 0);
    assert_eq!(f.client.get_listings_page(&None, &4, &10).len(), 0);
    assert_eq!(f.client.get_listings_page(&Some(WasteStream::Metal), &1, &10).len(), 0);
}
