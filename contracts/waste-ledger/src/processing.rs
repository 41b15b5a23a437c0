//! Processing batch engine.
//!
//! A recycler groups verified, unprocessed, same-stream collections into a
//! batch, then completes it with an output amount and quality. Completion is the
//! only place `is_processed` flips to true, and it mints the batch's single
//! impact credit.

use soroban_sdk::{Address, Env, String, Vec};

use crate::access;
use crate::config;
use crate::credits;
use crate::events;
use crate::math;
use crate::storage::{self, DataKey};
use crate::treasury;
use crate::types::{
    BatchStatus, CollectionStatus, Error, ProcessingBatch, QualityGrade, UserRole, WasteCollection,
    WasteStream,
};

/// Validated batch membership.
struct Members {
    waste_stream: WasteStream,
    input_amount: u64,
    collections: Vec<WasteCollection>,
}

/// Checks every candidate without writing anything.
fn validate_members(env: &Env, processor: &Address, ids: &Vec<u64>) -> Result<Members, Error> {
    if ids.is_empty() {
        return Err(Error::NoCollections);
    }
    if ids.len() > config::max_batch_size(env) {
        return Err(Error::BatchTooLarge);
    }

    let mut collections: Vec<WasteCollection> = Vec::new(env);
    let mut seen: Vec<u64> = Vec::new(env);
    let mut waste_stream: Option<WasteStream> = None;
    let mut input_amount: u64 = 0;

    for id in ids.iter() {
        if seen.contains(id) {
            return Err(Error::DuplicateCollection);
        }
        seen.push_back(id);

        let collection = storage::get_collection(env, id)?;
        if collection.recycler != *processor {
            return Err(Error::NotAuthorized);
        }
        if collection.is_processed || collection.batch_id.is_some() {
            return Err(Error::AlreadyProcessed);
        }
        if collection.status != CollectionStatus::Verified {
            return Err(Error::InvalidStatus);
        }
        match waste_stream {
            None => waste_stream = Some(collection.waste_stream),
            Some(stream) if stream != collection.waste_stream => {
                return Err(Error::MixedWasteTypes)
            }
            Some(_) => {}
        }

        input_amount = input_amount
            .checked_add(collection.weight as u64)
            .ok_or(Error::Overflow)?;
        collections.push_back(collection);
    }

    Ok(Members {
        waste_stream: waste_stream.ok_or(Error::NoCollections)?,
        input_amount,
        collections,
    })
}

fn attach(env: &Env, batch_id: u64, members: &Vec<WasteCollection>) {
    for mut collection in members.iter() {
        collection.status = CollectionStatus::InProgress;
        collection.batch_id = Some(batch_id);
        storage::set_collection(env, &collection);
    }
}

fn release(env: &Env, ids: &Vec<u64>) -> Result<(), Error> {
    for id in ids.iter() {
        let mut collection = storage::get_collection(env, id)?;
        collection.status = CollectionStatus::Verified;
        collection.batch_id = None;
        storage::set_collection(env, &collection);
    }
    Ok(())
}

fn load_open_batch(env: &Env, processor: &Address, batch_id: u64) -> Result<ProcessingBatch, Error> {
    let batch = storage::get_batch(env, batch_id)?;
    if batch.processor != *processor {
        return Err(Error::NotProcessor);
    }
    if batch.status != BatchStatus::InProgress {
        return Err(Error::BatchAlreadyCompleted);
    }
    Ok(batch)
}

pub fn create(
    env: &Env,
    processor: &Address,
    collection_ids: Vec<u64>,
    description: String,
) -> Result<u64, Error> {
    access::require_not_paused(env)?;
    processor.require_auth();
    access::authorize(env, processor, UserRole::Recycler)?;

    let members = validate_members(env, processor, &collection_ids)?;

    let id = storage::next_id(env, &DataKey::BatchCounter)?;
    let batch = ProcessingBatch {
        id,
        processor: processor.clone(),
        waste_stream: members.waste_stream,
        collection_ids: collection_ids.clone(),
        input_amount: members.input_amount,
        output_amount: 0,
        output_quality: QualityGrade::Medium,
        carbon_offset: 0,
        description,
        status: BatchStatus::InProgress,
        created_at: env.ledger().timestamp(),
        completed_at: None,
        credit_id: None,
    };
    storage::set_batch(env, &batch);
    attach(env, id, &members.collections);

    let mut profile = storage::get_profile(env, processor)?;
    profile.batch_count = profile.batch_count.saturating_add(1);
    storage::set_profile(env, processor, &profile);

    events::batch_created(env, id, processor, members.input_amount, collection_ids.len());
    Ok(id)
}

/// Replaces the whole membership of an open batch. Previous members go back
/// to Verified; the new set is validated exactly as at creation.
pub fn replace_collections(
    env: &Env,
    processor: &Address,
    batch_id: u64,
    collection_ids: Vec<u64>,
) -> Result<(), Error> {
    access::require_not_paused(env)?;
    processor.require_auth();
    access::authorize(env, processor, UserRole::Recycler)?;

    let mut batch = load_open_batch(env, processor, batch_id)?;

    release(env, &batch.collection_ids)?;
    let members = validate_members(env, processor, &collection_ids)?;
    attach(env, batch_id, &members.collections);

    batch.collection_ids = collection_ids;
    batch.waste_stream = members.waste_stream;
    batch.input_amount = members.input_amount;
    if batch.output_amount > batch.input_amount {
        batch.output_amount = 0;
    }
    storage::set_batch(env, &batch);

    events::batch_updated(env, batch_id, batch.input_amount, batch.output_amount);
    Ok(())
}

/// Records a provisional output on an open batch.
pub fn update(
    env: &Env,
    processor: &Address,
    batch_id: u64,
    output_amount: u64,
    output_quality: QualityGrade,
) -> Result<(), Error> {
    access::require_not_paused(env)?;
    processor.require_auth();
    access::authorize(env, processor, UserRole::Recycler)?;

    let mut batch = load_open_batch(env, processor, batch_id)?;
    if output_amount > batch.input_amount {
        return Err(Error::InvalidOutputAmount);
    }

    batch.output_amount = output_amount;
    batch.output_quality = output_quality;
    storage::set_batch(env, &batch);

    events::batch_updated(env, batch_id, batch.input_amount, output_amount);
    Ok(())
}

/// Closes a batch: members become processed and Completed, collectors receive
/// any quality bonus, the processor is credited and receives the impact credit.
pub fn complete(
    env: &Env,
    processor: &Address,
    batch_id: u64,
    output_amount: u64,
    output_quality: QualityGrade,
) -> Result<u64, Error> {
    access::require_not_paused(env)?;
    processor.require_auth();
    access::authorize(env, processor, UserRole::Recycler)?;

    let mut batch = load_open_batch(env, processor, batch_id)?;
    if output_amount == 0 || output_amount > batch.input_amount {
        return Err(Error::InvalidOutputAmount);
    }

    let stream = batch.waste_stream;
    let carbon_offset = math::carbon_offset(
        output_amount,
        config::carbon_multiplier(env, stream),
        config::quality_carbon_multiplier(env, output_quality),
    )?;

    let rate = config::reward_rate(env, stream);
    let fee_bps = config::platform_fee_bps(env);
    for id in batch.collection_ids.iter() {
        let mut collection = storage::get_collection(env, id)?;
        if collection.is_processed {
            return Err(Error::AlreadyProcessed);
        }
        collection.is_processed = true;
        collection.status = CollectionStatus::Completed;
        storage::set_collection(env, &collection);

        let bonus = math::quality_bonus(
            collection.weight,
            rate,
            collection.base_reward,
            config::quality_multiplier(env, stream, collection.quality),
            fee_bps,
        )?;
        treasury::accrue_fee(env, bonus.fee)?;
        treasury::credit_earnings(env, &collection.collector, bonus.net)?;
    }

    let credit_id = credits::mint(env, processor, stream, output_amount, carbon_offset, batch_id)?;

    batch.output_amount = output_amount;
    batch.output_quality = output_quality;
    batch.carbon_offset = carbon_offset;
    batch.status = BatchStatus::Completed;
    batch.completed_at = Some(env.ledger().timestamp());
    batch.credit_id = Some(credit_id);
    storage::set_batch(env, &batch);

    let mut profile = storage::get_profile(env, processor)?;
    storage::bump_tally(&mut profile.processed_by_type, stream, output_amount)?;
    storage::set_profile(env, processor, &profile);
    storage::add_to_tally(env, &DataKey::ProcessedTotals, stream, output_amount)?;
    storage::add_amount(env, &DataKey::TotalCarbonOffset, carbon_offset)?;

    let processing_earnings = (output_amount as i128)
        .checked_mul(config::processing_rate(env, stream))
        .ok_or(Error::Overflow)?;
    treasury::credit_earnings(env, processor, processing_earnings)?;

    events::batch_completed(env, batch_id, output_amount, output_quality, carbon_offset);
    Ok(credit_id)
}
