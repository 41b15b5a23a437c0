#![cfg(test)]

use super::*;
use crate::test::{Fixture, PLASTIC_500_FEE, PLASTIC_500_REWARD};
use soroban_sdk::{testutils::Address as _, vec, Address};

/// Collector and recycler with one verified collection between them.
fn verified_setup(f: &Fixture, stream: WasteStream, weight: u32) -> (Address, Address, u64) {
    let collector = f.collector();
    let recycler = f.recycler();
    let id = f.verified(&collector, &recycler, stream, weight);
    (collector, recycler, id)
}

#[test]
fn test_end_to_end_collection_to_credit() {
    let f = Fixture::new();
    let collector = f.collector();
    let recycler = f.recycler();

    let id = f.collect(&collector, &recycler, WasteStream::Plastic, 500);
    assert_eq!(f.token.balance(&collector), PLASTIC_500_REWARD);

    f.client.confirm_pickup(&recycler, &id);
    assert_eq!(f.client.get_collection_details(&id).status, CollectionStatus::Verified);

    f.client.update_collection_quality(&recycler, &id, &QualityGrade::High);

    let batch_id = f.client.create_processing_batch(&recycler, &vec![&f.env, id], &f.text("shred run"));
    assert!(f.emitted("ProcessingBatchCreated"));
    let collection = f.client.get_collection_details(&id);
    assert_eq!(collection.status, CollectionStatus::InProgress);
    assert_eq!(collection.batch_id, Some(batch_id));
    assert!(!collection.is_processed);

    let credit_id = f.client.complete_processing(&recycler, &batch_id, &450, &QualityGrade::High);
    assert!(f.emitted("ProcessingBatchCompleted"));
    assert!(f.emitted("ImpactCreditMinted"));

    let collection = f.client.get_collection_details(&id);
    assert_eq!(collection.status, CollectionStatus::Completed);
    assert!(collection.is_processed);
    assert_eq!(collection.reward_amount, PLASTIC_500_REWARD);

    let batch = f.client.get_processing_batch(&batch_id);
    assert_eq!(batch.status, BatchStatus::Completed);
    assert_eq!(batch.input_amount, 500);
    assert_eq!(batch.output_amount, 450);
    assert_eq!(batch.credit_id, Some(credit_id));
    assert_eq!(batch.completed_at, Some(crate::test::START));

    // 450 * 1.5 * 1.2
    let credit = f.client.get_impact_credit(&credit_id);
    assert_eq!(credit.owner, recycler);
    assert_eq!(credit.amount, 450);
    assert_eq!(credit.carbon_offset, 810);
    assert_eq!(credit.batch_id, batch_id);
    assert_eq!(batch.carbon_offset, credit.carbon_offset);

    // 450 kg output at 0.02 per kg
    assert_eq!(f.client.get_earnings(&recycler), 90_000_000);
    let recycler_stats = f.client.get_recycler_stats(&recycler);
    assert_eq!(recycler_stats.batch_count, 1);
    assert_eq!(recycler_stats.processed_by_type, vec![&f.env, 450u64, 0, 0, 0]);
    assert_eq!(recycler_stats.pending_earnings, 90_000_000);

    // High grade pays 1.2x over the Medium reward already paid: 50_000_000 gross, 2% fee
    assert_eq!(f.client.get_earnings(&collector), 49_000_000);
    assert_eq!(
        f.client.get_collector_stats(&collector).total_earnings,
        PLASTIC_500_REWARD + 49_000_000
    );

    let platform = f.client.get_platform_stats();
    assert_eq!(platform.fee_pool, PLASTIC_500_FEE + 1_000_000);
    assert_eq!(platform.total_batches, 1);
    assert_eq!(platform.total_credits, 1);
    assert_eq!(platform.active_credits, 1);

    let global = f.client.get_global_stats();
    assert_eq!(global.processed_by_type, vec![&f.env, 450u64, 0, 0, 0]);
    assert_eq!(global.total_carbon_offset, 810);
}

#[test]
fn test_no_bonus_at_or_below_medium() {
    let f = Fixture::new();
    let (collector, recycler, id) = verified_setup(&f, WasteStream::Metal, 200);
    f.client.update_collection_quality(&recycler, &id, &QualityGrade::Low);

    let batch_id = f.client.create_processing_batch(&recycler, &vec![&f.env, id], &f.text("melt"));
    f.client.complete_processing(&recycler, &batch_id, &150, &QualityGrade::Medium);

    assert_eq!(f.client.get_earnings(&collector), 0);
    // 150 kg at 0.04 per kg
    assert_eq!(f.client.get_earnings(&recycler), 60_000_000);
}

#[test]
fn test_bonus_measured_against_reward_paid_at_creation() {
    let f = Fixture::new();
    let (collector, recycler, id) = verified_setup(&f, WasteStream::Plastic, 500);
    assert_eq!(f.client.get_collection_details(&id).base_reward, 250_000_000);

    // Cheapening the paid grade after payout must not look like an upgrade
    f.client.set_quality_multiplier(&f.admin, &WasteStream::Plastic, &QualityGrade::Medium, &1);
    f.client.update_collection_quality(&recycler, &id, &QualityGrade::High);
    let batch_id = f.client.create_processing_batch(&recycler, &vec![&f.env, id], &f.text("run"));
    f.client.complete_processing(&recycler, &batch_id, &450, &QualityGrade::High);
    assert_eq!(f.client.get_earnings(&collector), 49_000_000);

    // A lower rate at completion leaves nothing above the frozen reward
    f.client.set_quality_multiplier(&f.admin, &WasteStream::Plastic, &QualityGrade::Medium, &10_000);
    let other = f.collector();
    let second = f.verified(&other, &recycler, WasteStream::Plastic, 500);
    f.client.set_reward_rate(&f.admin, &WasteStream::Plastic, &250_000);
    f.client.update_collection_quality(&recycler, &second, &QualityGrade::Premium);
    let batch_id = f.client.create_processing_batch(&recycler, &vec![&f.env, second], &f.text("run"));
    f.client.complete_processing(&recycler, &batch_id, &450, &QualityGrade::High);
    assert_eq!(f.client.get_earnings(&other), 0);
}

#[test]
fn test_pause_blocks_batch_creation() {
    let f = Fixture::new();
    let (_, recycler, id) = verified_setup(&f, WasteStream::Plastic, 100);
    f.client.pause(&f.admin);

    assert_eq!(
        f.client.try_create_processing_batch(&recycler, &vec![&f.env, id], &f.text("run")),
        Err(Ok(Error::ContractPaused))
    );
    f.client.unpause(&f.admin);
    f.client.create_processing_batch(&recycler, &vec![&f.env, id], &f.text("run"));
}

#[test]
fn test_collection_cannot_join_two_batches() {
    let f = Fixture::new();
    let (_, recycler, id) = verified_setup(&f, WasteStream::Plastic, 100);

    let batch_id = f.client.create_processing_batch(&recycler, &vec![&f.env, id], &f.text("first"));
    assert_eq!(
        f.client.try_create_processing_batch(&recycler, &vec![&f.env, id], &f.text("second")),
        Err(Ok(Error::AlreadyProcessed))
    );

    f.client.complete_processing(&recycler, &batch_id, &90, &QualityGrade::Medium);
    assert_eq!(
        f.client.try_create_processing_batch(&recycler, &vec![&f.env, id], &f.text("third")),
        Err(Ok(Error::AlreadyProcessed))
    );
}

#[test]
fn test_mixed_waste_streams_fail() {
    let f = Fixture::new();
    let collector = f.collector();
    let recycler = f.recycler();
    let plastic = f.verified(&collector, &recycler, WasteStream::Plastic, 100);
    let metal = f.verified(&collector, &recycler, WasteStream::Metal, 100);

    let result = f.client.try_create_processing_batch(
        &recycler,
        &vec![&f.env, plastic, metal],
        &f.text("mixed"),
    );
    assert_eq!(result, Err(Ok(Error::MixedWasteTypes)));
    assert_eq!(f.client.get_collection_details(&plastic).batch_id, None);
    assert_eq!(f.client.get_platform_stats().total_batches, 0);
}

#[test]
fn test_batch_membership_rules() {
    let f = Fixture::new();
    let collector = f.collector();
    let recycler = f.recycler();
    let other = f.recycler();
    let verified = f.verified(&collector, &recycler, WasteStream::Plastic, 100);
    let pending = f.collect(&collector, &recycler, WasteStream::Plastic, 100);
    let foreign = f.verified(&collector, &other, WasteStream::Plastic, 100);
    let description = f.text("run");

    assert_eq!(
        f.client.try_create_processing_batch(&recycler, &vec![&f.env], &description),
        Err(Ok(Error::NoCollections))
    );
    assert_eq!(
        f.client.try_create_processing_batch(&recycler, &vec![&f.env, verified, verified], &description),
        Err(Ok(Error::DuplicateCollection))
    );
    assert_eq!(
        f.client.try_create_processing_batch(&recycler, &vec![&f.env, verified, pending], &description),
        Err(Ok(Error::InvalidStatus))
    );
    assert_eq!(
        f.client.try_create_processing_batch(&recycler, &vec![&f.env, verified, foreign], &description),
        Err(Ok(Error::NotAuthorized))
    );
    assert_eq!(
        f.client.try_create_processing_batch(&collector, &vec![&f.env, verified], &description),
        Err(Ok(Error::NotAuthorized))
    );
}

#[test]
fn test_output_cannot_exceed_input() {
    let f = Fixture::new();
    let (_, recycler, id) = verified_setup(&f, WasteStream::EWaste, 100);
    let batch_id = f.client.create_processing_batch(&recycler, &vec![&f.env, id], &f.text("strip"));

    assert_eq!(
        f.client.try_complete_processing(&recycler, &batch_id, &101, &QualityGrade::High),
        Err(Ok(Error::InvalidOutputAmount))
    );
    assert_eq!(
        f.client.try_complete_processing(&recycler, &batch_id, &0, &QualityGrade::High),
        Err(Ok(Error::InvalidOutputAmount))
    );
    assert_eq!(
        f.client.try_update_processing_batch(&recycler, &batch_id, &101, &QualityGrade::High),
        Err(Ok(Error::InvalidOutputAmount))
    );

    f.client.complete_processing(&recycler, &batch_id, &100, &QualityGrade::High);
}

#[test]
fn test_only_processor_completes_once() {
    let f = Fixture::new();
    let (_, recycler, id) = verified_setup(&f, WasteStream::Plastic, 100);
    let other = f.recycler();
    let batch_id = f.client.create_processing_batch(&recycler, &vec![&f.env, id], &f.text("run"));

    assert_eq!(
        f.client.try_complete_processing(&other, &batch_id, &50, &QualityGrade::Medium),
        Err(Ok(Error::NotProcessor))
    );

    f.client.complete_processing(&recycler, &batch_id, &50, &QualityGrade::Medium);
    assert_eq!(
        f.client.try_complete_processing(&recycler, &batch_id, &50, &QualityGrade::Medium),
        Err(Ok(Error::BatchAlreadyCompleted))
    );
    assert_eq!(
        f.client.try_update_processing_batch(&recycler, &batch_id, &50, &QualityGrade::Low),
        Err(Ok(Error::BatchAlreadyCompleted))
    );
    assert_eq!(f.client.get_platform_stats().total_credits, 1);
}

#[test]
fn test_provisional_output_and_member_replacement() {
    let f = Fixture::new();
    let collector = f.collector();
    let recycler = f.recycler();
    let first = f.verified(&collector, &recycler, WasteStream::Plastic, 300);
    let second = f.verified(&collector, &recycler, WasteStream::Plastic, 100);
    let batch_id = f.client.create_processing_batch(&recycler, &vec![&f.env, first], &f.text("run"));

    f.client.update_processing_batch(&recycler, &batch_id, &250, &QualityGrade::High);
    assert!(f.emitted("ProcessingBatchUpdated"));
    let batch = f.client.get_processing_batch(&batch_id);
    assert_eq!(batch.output_amount, 250);
    assert_eq!(batch.status, BatchStatus::InProgress);

    f.client.replace_batch_collections(&recycler, &batch_id, &vec![&f.env, second]);
    let batch = f.client.get_processing_batch(&batch_id);
    assert_eq!(batch.collection_ids, vec![&f.env, second]);
    assert_eq!(batch.input_amount, 100);
    // Provisional output above the new input is discarded
    assert_eq!(batch.output_amount, 0);

    let released = f.client.get_collection_details(&first);
    assert_eq!(released.status, CollectionStatus::Verified);
    assert_eq!(released.batch_id, None);
    assert_eq!(f.client.get_collection_details(&second).status, CollectionStatus::InProgress);

    // The released collection can be batched again
    f.client.create_processing_batch(&recycler, &vec![&f.env, first], &f.text("rerun"));
}

#[test]
fn test_carbon_offset_calculation() {
    let f = Fixture::new();
    let offset = |quality: QualityGrade| {
        f.client
            .calculate_carbon_offset(&WasteStream::Plastic, &450, &quality)
    };

    assert_eq!(offset(QualityGrade::Medium), 675);
    assert!(offset(QualityGrade::High) > offset(QualityGrade::Low));
    assert!(offset(QualityGrade::Premium) > offset(QualityGrade::High));

    f.client.set_carbon_multiplier(&f.admin, &WasteStream::Plastic, &20_000);
    assert_eq!(offset(QualityGrade::Medium), 900);
}

// ================================================================================================
// IMPACT CREDITS
// ================================================================================================

fn minted_credit(f: &Fixture) -> (Address, u64) {
    let (_, recycler, id) = verified_setup(f, WasteStream::Metal, 100);
    let batch_id = f.client.create_processing_batch(&recycler, &vec![&f.env, id], &f.text("run"));
    let credit_id = f.client.complete_processing(&recycler, &batch_id, &80, &QualityGrade::Medium);
    (recycler, credit_id)
}

#[test]
fn test_transfer_impact_credit() {
    let f = Fixture::new();
    let (recycler, credit_id) = minted_credit(&f);
    let buyer = Address::generate(&f.env);

    assert_eq!(
        f.client.try_transfer_impact_credit(&buyer, &credit_id, &recycler),
        Err(Ok(Error::NotOwner))
    );
    assert_eq!(
        f.client.try_transfer_impact_credit(&recycler, &credit_id, &recycler),
        Err(Ok(Error::InvalidInput))
    );

    let before = f.client.get_impact_credit(&credit_id);
    f.client.transfer_impact_credit(&recycler, &credit_id, &buyer);
    assert!(f.emitted("ImpactCreditTransferred"));

    let after = f.client.get_impact_credit(&credit_id);
    assert_eq!(after.owner, buyer);
    assert_eq!(after.amount, before.amount);
    assert_eq!(after.carbon_offset, before.carbon_offset);
    assert_eq!(f.client.get_credits_by_owner(&buyer), vec![&f.env, credit_id]);
    assert_eq!(f.client.get_credits_by_owner(&recycler).len(), 0);
}

#[test]
fn test_burn_impact_credit() {
    let f = Fixture::new();
    let (recycler, credit_id) = minted_credit(&f);
    let offset = f.client.get_impact_credit(&credit_id).carbon_offset;
    let outsider = f.collector();

    assert_eq!(
        f.client.try_burn_impact_credit(&outsider, &credit_id),
        Err(Ok(Error::NotOwner))
    );

    f.client.burn_impact_credit(&recycler, &credit_id);
    assert!(f.emitted("ImpactCreditBurned"));
    assert_eq!(
        f.client.try_get_impact_credit(&credit_id),
        Err(Ok(Error::CreditNotFound))
    );
    assert_eq!(
        f.client.try_burn_impact_credit(&recycler, &credit_id),
        Err(Ok(Error::CreditNotFound))
    );

    let platform = f.client.get_platform_stats();
    assert_eq!(platform.total_credits, 1);
    assert_eq!(platform.active_credits, 0);
    assert_eq!(f.client.get_global_stats().burned_carbon_offset, offset);
}

#[test]
fn test_verify_impact_credit() {
    let f = Fixture::new();
    let (recycler, credit_id) = minted_credit(&f);
    let proof = f.text("ipfs://audit-2024-07");

    assert_eq!(
        f.client.try_verify_impact_credit(&recycler, &credit_id, &proof),
        Err(Ok(Error::NotAuthorized))
    );

    f.client.verify_impact_credit(&f.admin, &credit_id, &proof);
    assert_eq!(
        f.client.get_impact_credit(&credit_id).verification_proof,
        Some(proof)
    );

    // Verification does not gate ownership changes
    f.client.transfer_impact_credit(&recycler, &credit_id, &Address::generate(&f.env));
}
