//! Event emission.
//!
//! Every committed state change publishes one event named after the operation.
//! Topics are `(name, subject)` where the subject is the acting address or the
//! affected entity id; data carries the values an indexer needs to rebuild the
//! change without reading contract storage. Events are published in the same
//! invocation frame as the storage writes, so a failed call leaves none behind.

use soroban_sdk::{Address, Env, IntoVal, String, Symbol, Val};

use crate::types::{QualityGrade, UserRole, WasteStream};

fn topic(env: &Env, name: &str) -> Symbol {
    Symbol::new(env, name)
}

// ================================================================================================
// IDENTITY
// ================================================================================================

pub fn user_registered(env: &Env, account: &Address, role: UserRole, name: &String) {
    env.events().publish(
        (topic(env, "UserRegistered"), account.clone()),
        (role, name.clone()),
    );
}

pub fn role_granted(env: &Env, account: &Address, role: UserRole, granted_by: &Address) {
    env.events().publish(
        (topic(env, "RoleGranted"), account.clone()),
        (role, granted_by.clone()),
    );
}

pub fn profile_updated(env: &Env, account: &Address, timestamp: u64) {
    env.events()
        .publish((topic(env, "ProfileUpdated"), account.clone()), timestamp);
}

pub fn reputation_updated(env: &Env, account: &Address, old_score: u32, new_score: u32) {
    env.events().publish(
        (topic(env, "ReputationUpdated"), account.clone()),
        (old_score, new_score),
    );
}

pub fn user_suspended(env: &Env, account: &Address, suspended: bool) {
    let name = if suspended { "UserSuspended" } else { "UserUnsuspended" };
    env.events()
        .publish((topic(env, name), account.clone()), env.ledger().timestamp());
}

pub fn user_blacklisted(env: &Env, account: &Address, blacklisted: bool) {
    let name = if blacklisted { "UserBlacklisted" } else { "UserUnblacklisted" };
    env.events()
        .publish((topic(env, name), account.clone()), env.ledger().timestamp());
}

pub fn roster_changed(env: &Env, recycler: &Address, collector: &Address, added: bool, active: u32) {
    let name = if added { "CollectorAdded" } else { "CollectorRemoved" };
    env.events().publish(
        (topic(env, name), recycler.clone()),
        (collector.clone(), active),
    );
}

// ================================================================================================
// COLLECTIONS
// ================================================================================================

pub fn collection_created(
    env: &Env,
    id: u64,
    collector: &Address,
    weight: u32,
    stream: WasteStream,
) {
    env.events().publish(
        (topic(env, "CollectionCreated"), id),
        (collector.clone(), weight, stream),
    );
}

pub fn reward_paid(env: &Env, collection_id: u64, collector: &Address, amount: i128, fee: i128) {
    env.events().publish(
        (topic(env, "RewardPaid"), collector.clone()),
        (collection_id, amount, fee),
    );
}

pub fn pickup_scheduled(env: &Env, collection_id: u64, recycler: &Address, pickup_time: u64) {
    env.events().publish(
        (topic(env, "PickupScheduled"), collection_id),
        (recycler.clone(), pickup_time),
    );
}

pub fn collection_updated(env: &Env, collection_id: u64, weight: u32) {
    env.events()
        .publish((topic(env, "CollectionUpdated"), collection_id), weight);
}

pub fn pickup_confirmed(env: &Env, collection_id: u64, recycler: &Address) {
    env.events().publish(
        (topic(env, "PickupConfirmed"), collection_id),
        (recycler.clone(), env.ledger().timestamp()),
    );
}

pub fn pickup_rejected(env: &Env, collection_id: u64, recycler: &Address, reason: &String) {
    env.events().publish(
        (topic(env, "PickupRejected"), collection_id),
        (recycler.clone(), reason.clone()),
    );
}

pub fn quality_updated(env: &Env, collection_id: u64, old: QualityGrade, new: QualityGrade) {
    env.events()
        .publish((topic(env, "QualityUpdated"), collection_id), (old, new));
}

pub fn ewaste_details_added(env: &Env, collection_id: u64, component_total: u32) {
    env.events().publish(
        (topic(env, "EWasteDetailsAdded"), collection_id),
        component_total,
    );
}

pub fn collection_cancelled(env: &Env, collection_id: u64, admin: &Address, reason: &String) {
    env.events().publish(
        (topic(env, "CollectionCancelled"), collection_id),
        (admin.clone(), reason.clone()),
    );
}

// ================================================================================================
// PROCESSING AND CREDITS
// ================================================================================================

pub fn batch_created(env: &Env, batch_id: u64, processor: &Address, input_amount: u64, members: u32) {
    env.events().publish(
        (topic(env, "ProcessingBatchCreated"), batch_id),
        (processor.clone(), input_amount, members),
    );
}

pub fn batch_updated(env: &Env, batch_id: u64, input_amount: u64, output_amount: u64) {
    env.events().publish(
        (topic(env, "ProcessingBatchUpdated"), batch_id),
        (input_amount, output_amount),
    );
}

pub fn batch_completed(env: &Env, batch_id: u64, output_amount: u64, quality: QualityGrade, carbon_offset: i128) {
    env.events().publish(
        (topic(env, "ProcessingBatchCompleted"), batch_id),
        (output_amount, quality, carbon_offset),
    );
}

pub fn credit_minted(env: &Env, credit_id: u64, owner: &Address, amount: u64, carbon_offset: i128) {
    env.events().publish(
        (topic(env, "ImpactCreditMinted"), credit_id),
        (owner.clone(), amount, carbon_offset),
    );
}

pub fn credit_transferred(env: &Env, credit_id: u64, from: &Address, to: &Address) {
    env.events().publish(
        (topic(env, "ImpactCreditTransferred"), credit_id),
        (from.clone(), to.clone()),
    );
}

pub fn credit_burned(env: &Env, credit_id: u64, owner: &Address, carbon_offset: i128) {
    env.events().publish(
        (topic(env, "ImpactCreditBurned"), credit_id),
        (owner.clone(), carbon_offset),
    );
}

pub fn credit_verified(env: &Env, credit_id: u64, admin: &Address, proof: &String) {
    env.events().publish(
        (topic(env, "ImpactCreditVerified"), credit_id),
        (admin.clone(), proof.clone()),
    );
}

// ================================================================================================
// MARKETPLACE
// ================================================================================================

pub fn listing_created(env: &Env, listing_id: u64, seller: &Address, amount: u64, price_per_unit: i128) {
    env.events().publish(
        (topic(env, "ListingCreated"), listing_id),
        (seller.clone(), amount, price_per_unit),
    );
}

pub fn listing_updated(env: &Env, listing_id: u64, amount: u64, price_per_unit: i128) {
    env.events().publish(
        (topic(env, "ListingUpdated"), listing_id),
        (amount, price_per_unit),
    );
}

pub fn listing_cancelled(env: &Env, listing_id: u64, seller: &Address) {
    env.events()
        .publish((topic(env, "ListingCancelled"), listing_id), seller.clone());
}

pub fn listing_purchased(env: &Env, listing_id: u64, buyer: &Address, amount: u64, total_price: i128) {
    env.events().publish(
        (topic(env, "ListingPurchased"), listing_id),
        (buyer.clone(), amount, total_price),
    );
}

// ================================================================================================
// TREASURY AND ADMIN
// ================================================================================================

pub fn earnings_credited(env: &Env, account: &Address, amount: i128, balance: i128) {
    env.events().publish(
        (topic(env, "EarningsCredited"), account.clone()),
        (amount, balance),
    );
}

pub fn earnings_withdrawn(env: &Env, account: &Address, amount: i128, remaining: i128) {
    env.events().publish(
        (topic(env, "EarningsWithdrawn"), account.clone()),
        (amount, remaining),
    );
}

pub fn platform_fees_withdrawn(env: &Env, treasury: &Address, amount: i128) {
    env.events().publish(
        (topic(env, "PlatformFeesWithdrawn"), treasury.clone()),
        amount,
    );
}

pub fn emergency_withdrawal(env: &Env, admin: &Address, to: &Address, amount: i128) {
    env.events().publish(
        (topic(env, "EmergencyWithdrawal"), admin.clone()),
        (to.clone(), amount),
    );
}

pub fn reward_pool_funded(env: &Env, from: &Address, amount: i128) {
    env.events()
        .publish((topic(env, "RewardPoolFunded"), from.clone()), amount);
}

pub fn paused(env: &Env, admin: &Address, paused: bool) {
    let name = if paused { "ContractPaused" } else { "ContractUnpaused" };
    env.events()
        .publish((topic(env, name), admin.clone()), env.ledger().timestamp());
}

/// `key` names the parameter; `data` carries its selector (stream, grade) and
/// the new value.
pub fn config_updated<D>(env: &Env, key: &str, data: D)
where
    D: IntoVal<Env, Val>,
{
    env.events()
        .publish((topic(env, "ConfigUpdated"), topic(env, key)), data);
}
