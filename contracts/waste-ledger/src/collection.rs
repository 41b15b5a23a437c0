//! Collection lifecycle: creation with immediate reward payout, pickup
//! confirmation or rejection, quality assessment and e-waste details.
//!
//! The reward is computed exactly once, at creation, at the Medium quality
//! multiplier. Later quality changes never touch `reward_amount`; they only feed
//! processing-time calculations.

use soroban_sdk::{Address, Env, String, Vec};

use crate::access;
use crate::config;
use crate::events;
use crate::math;
use crate::storage::{self, DataKey};
use crate::treasury;
use crate::types::{
    CollectionStatus, EWasteDetails, Error, QualityGrade, UserRole, WasteCollection, WasteStream,
};

/// Component slots expected in `add_ewaste_details`: CPU, battery, PCB, other.
pub const EWASTE_COMPONENT_SLOTS: u32 = 4;

/// Input of one collection, shared by single and batch creation.
pub struct NewCollection {
    pub waste_stream: WasteStream,
    pub weight: u32,
    pub location: String,
    pub image_hash: String,
    pub pickup_time: u64,
    pub recycler: Address,
}

fn validate_weight(env: &Env, weight: u32) -> Result<(), Error> {
    if weight == 0 || weight > config::max_collection_weight(env) {
        return Err(Error::InvalidWeight);
    }
    Ok(())
}

fn validate_new(env: &Env, input: &NewCollection) -> Result<(), Error> {
    validate_weight(env, input.weight)?;
    if input.location.len() == 0 || input.image_hash.len() == 0 {
        return Err(Error::InvalidInput);
    }
    if input.pickup_time <= env.ledger().timestamp() {
        return Err(Error::InvalidPickupTime);
    }
    if storage::get_role(env, &input.recycler) != Some(UserRole::Recycler) {
        return Err(Error::NotRegistered);
    }
    Ok(())
}

/// Writes one validated collection and its accounting. Returns the id and the
/// net reward owed to the collector; the transfer itself is left to the caller.
fn insert(env: &Env, collector: &Address, input: NewCollection) -> Result<(u64, i128), Error> {
    let quality = QualityGrade::Medium;
    let payout = math::collection_reward(
        input.weight,
        config::reward_rate(env, input.waste_stream),
        config::quality_multiplier(env, input.waste_stream, quality),
        config::platform_fee_bps(env),
    )?;

    let id = storage::next_id(env, &DataKey::CollectionCounter)?;
    let collection = WasteCollection {
        id,
        collector: collector.clone(),
        waste_stream: input.waste_stream,
        weight: input.weight,
        location: input.location,
        image_hash: input.image_hash,
        status: CollectionStatus::Pending,
        created_at: env.ledger().timestamp(),
        pickup_time: input.pickup_time,
        recycler: input.recycler.clone(),
        quality,
        base_reward: payout.gross,
        platform_fee: payout.fee,
        reward_amount: payout.net,
        is_processed: false,
        batch_id: None,
        rejection_reason: None,
    };
    storage::set_collection(env, &collection);
    storage::push_index(env, &DataKey::CollectorCollections(collector.clone()), id);
    storage::push_index(env, &DataKey::RecyclerCollections(input.recycler.clone()), id);

    let mut profile = storage::get_profile(env, collector)?;
    profile.collection_count = profile.collection_count.saturating_add(1);
    profile.total_earnings = profile
        .total_earnings
        .checked_add(payout.net)
        .ok_or(Error::Overflow)?;
    storage::set_profile(env, collector, &profile);

    treasury::accrue_fee(env, payout.fee)?;
    storage::add_amount(env, &DataKey::TotalRewardsPaid, payout.net)?;

    events::collection_created(env, id, collector, collection.weight, collection.waste_stream);
    events::reward_paid(env, id, collector, payout.net, payout.fee);
    events::pickup_scheduled(env, id, &input.recycler, input.pickup_time);
    Ok((id, payout.net))
}

pub fn create(env: &Env, collector: &Address, input: NewCollection) -> Result<u64, Error> {
    access::require_not_paused(env)?;
    collector.require_auth();
    access::authorize(env, collector, UserRole::Collector)?;

    validate_new(env, &input)?;
    let (id, reward) = insert(env, collector, input)?;
    treasury::pay_out(env, collector, reward)?;
    Ok(id)
}

/// Creates every collection or none. All elements are validated before the
/// first write and the combined reward moves in a single transfer.
#[allow(clippy::too_many_arguments)]
pub fn create_batch(
    env: &Env,
    collector: &Address,
    waste_streams: Vec<WasteStream>,
    weights: Vec<u32>,
    locations: Vec<String>,
    image_hashes: Vec<String>,
    pickup_times: Vec<u64>,
    recyclers: Vec<Address>,
) -> Result<Vec<u64>, Error> {
    access::require_not_paused(env)?;
    collector.require_auth();
    access::authorize(env, collector, UserRole::Collector)?;

    let count = waste_streams.len();
    if weights.len() != count
        || locations.len() != count
        || image_hashes.len() != count
        || pickup_times.len() != count
        || recyclers.len() != count
    {
        return Err(Error::ArrayLengthMismatch);
    }
    if count == 0 {
        return Err(Error::InvalidInput);
    }
    if count > config::max_batch_size(env) {
        return Err(Error::BatchTooLarge);
    }

    let columns = Columns {
        waste_streams: &waste_streams,
        weights: &weights,
        locations: &locations,
        image_hashes: &image_hashes,
        pickup_times: &pickup_times,
        recyclers: &recyclers,
    };
    for i in 0..count {
        validate_new(env, &columns.row(i)?)?;
    }

    let mut ids = Vec::new(env);
    let mut total_reward: i128 = 0;
    for i in 0..count {
        let (id, reward) = insert(env, collector, columns.row(i)?)?;
        total_reward = total_reward.checked_add(reward).ok_or(Error::Overflow)?;
        ids.push_back(id);
    }

    treasury::pay_out(env, collector, total_reward)?;
    Ok(ids)
}

/// Column-wise batch input, read one row at a time.
struct Columns<'a> {
    waste_streams: &'a Vec<WasteStream>,
    weights: &'a Vec<u32>,
    locations: &'a Vec<String>,
    image_hashes: &'a Vec<String>,
    pickup_times: &'a Vec<u64>,
    recyclers: &'a Vec<Address>,
}

impl Columns<'_> {
    fn row(&self, index: u32) -> Result<NewCollection, Error> {
        Ok(NewCollection {
            waste_stream: self.waste_streams.get(index).ok_or(Error::ArrayLengthMismatch)?,
            weight: self.weights.get(index).ok_or(Error::ArrayLengthMismatch)?,
            location: self.locations.get(index).ok_or(Error::ArrayLengthMismatch)?,
            image_hash: self.image_hashes.get(index).ok_or(Error::ArrayLengthMismatch)?,
            pickup_time: self.pickup_times.get(index).ok_or(Error::ArrayLengthMismatch)?,
            recycler: self.recyclers.get(index).ok_or(Error::ArrayLengthMismatch)?,
        })
    }
}

/// Collector-side correction while the pickup is still pending. The reward
/// stays as paid at creation.
pub fn update(
    env: &Env,
    collector: &Address,
    id: u64,
    weight: u32,
    location: String,
    image_hash: String,
) -> Result<(), Error> {
    access::require_not_paused(env)?;
    collector.require_auth();
    access::authorize(env, collector, UserRole::Collector)?;

    let mut collection = storage::get_collection(env, id)?;
    if collection.collector != *collector {
        return Err(Error::NotOwner);
    }
    if collection.status != CollectionStatus::Pending {
        return Err(Error::InvalidStatus);
    }
    validate_weight(env, weight)?;
    if location.len() == 0 || image_hash.len() == 0 {
        return Err(Error::InvalidInput);
    }

    collection.weight = weight;
    collection.location = location;
    collection.image_hash = image_hash;
    storage::set_collection(env, &collection);

    events::collection_updated(env, id, weight);
    Ok(())
}

fn load_for_recycler(env: &Env, recycler: &Address, id: u64) -> Result<WasteCollection, Error> {
    let collection = storage::get_collection(env, id)?;
    if collection.recycler != *recycler {
        return Err(Error::NotAuthorized);
    }
    Ok(collection)
}

pub fn confirm_pickup(env: &Env, recycler: &Address, id: u64) -> Result<(), Error> {
    access::require_not_paused(env)?;
    recycler.require_auth();
    access::authorize(env, recycler, UserRole::Recycler)?;

    let mut collection = load_for_recycler(env, recycler, id)?;
    if collection.status != CollectionStatus::Pending {
        return Err(Error::InvalidStatus);
    }

    collection.status = CollectionStatus::Verified;
    storage::set_collection(env, &collection);

    let weight = collection.weight as u64;
    let mut profile = storage::get_profile(env, &collection.collector)?;
    storage::bump_tally(&mut profile.collected_by_type, collection.waste_stream, weight)?;
    storage::set_profile(env, &collection.collector, &profile);
    storage::add_to_tally(env, &DataKey::CollectedTotals, collection.waste_stream, weight)?;

    events::pickup_confirmed(env, id, recycler);
    Ok(())
}

pub fn reject_pickup(env: &Env, recycler: &Address, id: u64, reason: String) -> Result<(), Error> {
    access::require_not_paused(env)?;
    recycler.require_auth();
    access::authorize(env, recycler, UserRole::Recycler)?;

    let mut collection = load_for_recycler(env, recycler, id)?;
    if collection.status != CollectionStatus::Pending {
        return Err(Error::InvalidStatus);
    }
    if reason.len() == 0 {
        return Err(Error::InvalidInput);
    }

    collection.status = CollectionStatus::Rejected;
    collection.rejection_reason = Some(reason.clone());
    storage::set_collection(env, &collection);

    events::pickup_rejected(env, id, recycler, &reason);
    Ok(())
}

fn check_quality_target(collection: &WasteCollection) -> Result<(), Error> {
    if collection.is_processed {
        return Err(Error::AlreadyProcessed);
    }
    if collection.status != CollectionStatus::Verified {
        return Err(Error::InvalidStatus);
    }
    Ok(())
}

fn apply_quality(env: &Env, mut collection: WasteCollection, quality: QualityGrade) {
    let old = collection.quality;
    collection.quality = quality;
    storage::set_collection(env, &collection);
    events::quality_updated(env, collection.id, old, quality);
}

pub fn update_quality(env: &Env, recycler: &Address, id: u64, quality: QualityGrade) -> Result<(), Error> {
    access::require_not_paused(env)?;
    recycler.require_auth();
    access::authorize(env, recycler, UserRole::Recycler)?;

    let collection = load_for_recycler(env, recycler, id)?;
    check_quality_target(&collection)?;
    apply_quality(env, collection, quality);
    Ok(())
}

pub fn batch_update_quality(
    env: &Env,
    recycler: &Address,
    ids: Vec<u64>,
    qualities: Vec<QualityGrade>,
) -> Result<(), Error> {
    access::require_not_paused(env)?;
    recycler.require_auth();
    access::authorize(env, recycler, UserRole::Recycler)?;

    if ids.len() != qualities.len() {
        return Err(Error::ArrayLengthMismatch);
    }
    if ids.is_empty() {
        return Err(Error::InvalidInput);
    }
    if ids.len() > config::max_batch_size(env) {
        return Err(Error::BatchTooLarge);
    }

    let mut seen: Vec<u64> = Vec::new(env);
    let mut targets = Vec::new(env);
    for id in ids.iter() {
        if seen.contains(id) {
            return Err(Error::DuplicateCollection);
        }
        seen.push_back(id);
        let collection = load_for_recycler(env, recycler, id)?;
        check_quality_target(&collection)?;
        targets.push_back(collection);
    }
    for (collection, quality) in targets.iter().zip(qualities.iter()) {
        apply_quality(env, collection, quality);
    }
    Ok(())
}

pub fn add_ewaste_details(
    env: &Env,
    collector: &Address,
    id: u64,
    components: Vec<u32>,
    serial_number: String,
    manufacturer: String,
    estimated_value: i128,
) -> Result<EWasteDetails, Error> {
    access::require_not_paused(env)?;
    collector.require_auth();
    access::authorize(env, collector, UserRole::Collector)?;

    let collection = storage::get_collection(env, id)?;
    if collection.collector != *collector {
        return Err(Error::NotOwner);
    }
    if collection.waste_stream != WasteStream::EWaste {
        return Err(Error::NotEWaste);
    }
    if components.len() != EWASTE_COMPONENT_SLOTS {
        return Err(Error::InvalidComponentCount);
    }
    match collection.status {
        CollectionStatus::Pending | CollectionStatus::Verified => {}
        _ => return Err(Error::InvalidStatus),
    }
    if estimated_value < 0 {
        return Err(Error::InvalidInput);
    }

    let details = EWasteDetails {
        cpu_count: components.get(0).unwrap_or(0),
        battery_count: components.get(1).unwrap_or(0),
        pcb_count: components.get(2).unwrap_or(0),
        other_count: components.get(3).unwrap_or(0),
        serial_number,
        manufacturer,
        estimated_value,
    };
    storage::set_ewaste(env, id, &details);

    let total = components
        .iter()
        .fold(0u32, |acc, count| acc.saturating_add(count));
    events::ewaste_details_added(env, id, total);
    Ok(details)
}

/// Admin override: retire a collection that has not entered processing.
pub fn cancel(env: &Env, admin: &Address, id: u64, reason: String) -> Result<(), Error> {
    access::require_admin(env, admin)?;

    let mut collection = storage::get_collection(env, id)?;
    match collection.status {
        CollectionStatus::Pending | CollectionStatus::Verified if collection.batch_id.is_none() => {}
        _ => return Err(Error::InvalidStatus),
    }

    collection.status = CollectionStatus::Cancelled;
    storage::set_collection(env, &collection);

    events::collection_cancelled(env, id, admin, &reason);
    Ok(())
}
