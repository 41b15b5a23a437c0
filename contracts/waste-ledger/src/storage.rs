//! Storage keys and typed accessors for ledger entities.
//!
//! Bootstrap values, counters and global tallies live in instance storage.
//! Entities (profiles, collections, batches, listings, credits) and per-address
//! indexes live in persistent storage under [`DataKey`].

use soroban_sdk::{contracttype, Address, Env, Vec};

use crate::types::{
    EWasteDetails, Error, ImpactCredit, MarketplaceListing, ProcessingBatch, UserProfile,
    UserRole, WasteCollection, WasteStream,
};

#[contracttype]
#[derive(Clone, Debug)]
pub enum DataKey {
    // ---- instance ----
    /// Reward / settlement token contract
    Token,
    /// Address receiving withdrawn platform fees
    Treasury,
    Paused,
    /// Held while an outbound token transfer is in flight
    PayoutLock,
    UserCount,
    CollectionCounter,
    BatchCounter,
    ListingCounter,
    CreditCounter,
    ActiveCredits,
    FeePool,
    TotalFeesAccrued,
    TotalRewardsPaid,
    CollectedTotals,
    ProcessedTotals,
    TotalCarbonOffset,
    BurnedCarbonOffset,
    MarketplaceVolume,

    // ---- persistent ----
    Role(Address),
    Profile(Address),
    Suspended(Address),
    Blacklisted(Address),
    /// Recycler → collectors that registered with it
    Roster(Address),
    /// Withdrawable earnings per address
    Earnings(Address),
    Collection(u64),
    EWaste(u64),
    CollectorCollections(Address),
    RecyclerCollections(Address),
    Batch(u64),
    Listing(u64),
    /// Ids of listings still open for purchase, in creation order
    ActiveListings,
    Credit(u64),
    OwnerCredits(Address),
}

// ================================================================================================
// BOOTSTRAP
// ================================================================================================

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Token)
}

pub fn get_token(env: &Env) -> Result<Address, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Token)
        .ok_or(Error::NotInitialized)
}

pub fn set_token(env: &Env, token: &Address) {
    env.storage().instance().set(&DataKey::Token, token);
}

pub fn get_treasury(env: &Env) -> Result<Address, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Treasury)
        .ok_or(Error::NotInitialized)
}

pub fn set_treasury(env: &Env, treasury: &Address) {
    env.storage().instance().set(&DataKey::Treasury, treasury);
}

pub fn is_paused(env: &Env) -> bool {
    env.storage().instance().get(&DataKey::Paused).unwrap_or(false)
}

pub fn set_paused(env: &Env, paused: bool) {
    env.storage().instance().set(&DataKey::Paused, &paused);
}

pub fn is_payout_locked(env: &Env) -> bool {
    env.storage()
        .instance()
        .get(&DataKey::PayoutLock)
        .unwrap_or(false)
}

pub fn set_payout_lock(env: &Env, locked: bool) {
    env.storage().instance().set(&DataKey::PayoutLock, &locked);
}

// ================================================================================================
// COUNTERS AND TALLIES
// ================================================================================================

pub fn read_counter(env: &Env, key: &DataKey) -> u64 {
    env.storage().instance().get(key).unwrap_or(0)
}

/// Allocates the next entity id. Ids start at 1 and are never reused.
pub fn next_id(env: &Env, key: &DataKey) -> Result<u64, Error> {
    increment_counter(env, key)
}

/// Increments a counter and returns the new value.
pub fn increment_counter(env: &Env, key: &DataKey) -> Result<u64, Error> {
    let current = read_counter(env, key)
        .checked_add(1)
        .ok_or(Error::Overflow)?;
    env.storage().instance().set(key, &current);
    Ok(current)
}

pub fn decrement_counter(env: &Env, key: &DataKey) {
    let current = read_counter(env, key);
    env.storage()
        .instance()
        .set(key, &current.saturating_sub(1));
}

pub fn read_amount(env: &Env, key: &DataKey) -> i128 {
    env.storage().instance().get(key).unwrap_or(0)
}

pub fn add_amount(env: &Env, key: &DataKey, delta: i128) -> Result<i128, Error> {
    let updated = read_amount(env, key)
        .checked_add(delta)
        .ok_or(Error::Overflow)?;
    env.storage().instance().set(key, &updated);
    Ok(updated)
}

pub fn write_amount(env: &Env, key: &DataKey, value: i128) {
    env.storage().instance().set(key, &value);
}

/// Four zeroed slots, one per waste stream.
pub fn zero_tally(env: &Env) -> Vec<u64> {
    Vec::from_array(env, [0u64; 4])
}

/// Adds `amount` to the slot of `stream` in a per-stream tally vector.
pub fn bump_tally(tally: &mut Vec<u64>, stream: WasteStream, amount: u64) -> Result<(), Error> {
    let index = stream.index();
    let current = tally.get(index).unwrap_or(0);
    let updated = current.checked_add(amount).ok_or(Error::Overflow)?;
    tally.set(index, updated);
    Ok(())
}

pub fn read_tally(env: &Env, key: &DataKey) -> Vec<u64> {
    env.storage()
        .instance()
        .get(key)
        .unwrap_or_else(|| zero_tally(env))
}

pub fn add_to_tally(env: &Env, key: &DataKey, stream: WasteStream, amount: u64) -> Result<(), Error> {
    let mut tally = read_tally(env, key);
    bump_tally(&mut tally, stream, amount)?;
    env.storage().instance().set(key, &tally);
    Ok(())
}

// ================================================================================================
// IDENTITY
// ================================================================================================

pub fn get_role(env: &Env, account: &Address) -> Option<UserRole> {
    env.storage()
        .persistent()
        .get(&DataKey::Role(account.clone()))
}

pub fn set_role(env: &Env, account: &Address, role: UserRole) {
    env.storage()
        .persistent()
        .set(&DataKey::Role(account.clone()), &role);
}

pub fn get_profile(env: &Env, account: &Address) -> Result<UserProfile, Error> {
    env.storage()
        .persistent()
        .get(&DataKey::Profile(account.clone()))
        .ok_or(Error::NotRegistered)
}

pub fn set_profile(env: &Env, account: &Address, profile: &UserProfile) {
    env.storage()
        .persistent()
        .set(&DataKey::Profile(account.clone()), profile);
}

pub fn read_flag(env: &Env, key: &DataKey) -> bool {
    env.storage().persistent().get(key).unwrap_or(false)
}

pub fn write_flag(env: &Env, key: &DataKey, value: bool) {
    if value {
        env.storage().persistent().set(key, &true);
    } else {
        env.storage().persistent().remove(key);
    }
}

pub fn get_roster(env: &Env, recycler: &Address) -> Vec<Address> {
    env.storage()
        .persistent()
        .get(&DataKey::Roster(recycler.clone()))
        .unwrap_or_else(|| Vec::new(env))
}

pub fn set_roster(env: &Env, recycler: &Address, roster: &Vec<Address>) {
    env.storage()
        .persistent()
        .set(&DataKey::Roster(recycler.clone()), roster);
}

pub fn get_earnings(env: &Env, account: &Address) -> i128 {
    env.storage()
        .persistent()
        .get(&DataKey::Earnings(account.clone()))
        .unwrap_or(0)
}

pub fn set_earnings(env: &Env, account: &Address, amount: i128) {
    env.storage()
        .persistent()
        .set(&DataKey::Earnings(account.clone()), &amount);
}

// ================================================================================================
// ENTITIES
// ================================================================================================

pub fn get_collection(env: &Env, id: u64) -> Result<WasteCollection, Error> {
    env.storage()
        .persistent()
        .get(&DataKey::Collection(id))
        .ok_or(Error::CollectionNotFound)
}

pub fn set_collection(env: &Env, collection: &WasteCollection) {
    env.storage()
        .persistent()
        .set(&DataKey::Collection(collection.id), collection);
}

pub fn get_ewaste(env: &Env, id: u64) -> Option<EWasteDetails> {
    env.storage().persistent().get(&DataKey::EWaste(id))
}

pub fn set_ewaste(env: &Env, id: u64, details: &EWasteDetails) {
    env.storage().persistent().set(&DataKey::EWaste(id), details);
}

pub fn get_batch(env: &Env, id: u64) -> Result<ProcessingBatch, Error> {
    env.storage()
        .persistent()
        .get(&DataKey::Batch(id))
        .ok_or(Error::BatchNotFound)
}

pub fn set_batch(env: &Env, batch: &ProcessingBatch) {
    env.storage()
        .persistent()
        .set(&DataKey::Batch(batch.id), batch);
}

pub fn get_listing(env: &Env, id: u64) -> Result<MarketplaceListing, Error> {
    env.storage()
        .persistent()
        .get(&DataKey::Listing(id))
        .ok_or(Error::ListingNotFound)
}

pub fn set_listing(env: &Env, listing: &MarketplaceListing) {
    env.storage()
        .persistent()
        .set(&DataKey::Listing(listing.id), listing);
}

pub fn get_credit(env: &Env, id: u64) -> Result<ImpactCredit, Error> {
    env.storage()
        .persistent()
        .get(&DataKey::Credit(id))
        .ok_or(Error::CreditNotFound)
}

pub fn set_credit(env: &Env, credit: &ImpactCredit) {
    env.storage()
        .persistent()
        .set(&DataKey::Credit(credit.id), credit);
}

pub fn remove_credit(env: &Env, id: u64) {
    env.storage().persistent().remove(&DataKey::Credit(id));
}

// ================================================================================================
// PER-ADDRESS INDEXES
// ================================================================================================

pub fn read_index(env: &Env, key: &DataKey) -> Vec<u64> {
    env.storage()
        .persistent()
        .get(key)
        .unwrap_or_else(|| Vec::new(env))
}

pub fn push_index(env: &Env, key: &DataKey, id: u64) {
    let mut ids = read_index(env, key);
    ids.push_back(id);
    env.storage().persistent().set(key, &ids);
}

pub fn remove_from_index(env: &Env, key: &DataKey, id: u64) {
    let mut ids = read_index(env, key);
    if let Some(position) = ids.first_index_of(id) {
        ids.remove(position);
        env.storage().persistent().set(key, &ids);
    }
}
