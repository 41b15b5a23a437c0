/*!
 * Waste Ledger Smart Contract
 *
 * Tracks recyclable waste from collection through processing to sale, pays
 * collectors a token reward per kilogram, and mints impact credits for the
 * carbon offset of processed output.
 *
 * Key features:
 * - Role registry for collectors, recyclers and admins, with suspension,
 *   blacklisting and reputation scores
 * - Collection lifecycle with the reward paid in the creating transaction
 * - Processing batches that close a set of verified collections and mint one
 *   impact credit each
 * - Marketplace for processed output settled from the buyer's token allowance
 * - Platform fee pool and per-address earnings ledger
 *
 * Business Logic:
 * 1. Collectors and recyclers register; admins are granted by other admins
 * 2. A collector records a collection and is paid immediately (minus fee)
 * 3. The chosen recycler confirms the pickup and grades its quality
 * 4. The recycler batches verified collections and completes the batch
 * 5. Completion credits earnings, pays quality bonuses and mints the credit
 * 6. Recyclers list output on the marketplace; buyers purchase with tokens
 *
 * Every entry point either commits all its writes and events or none of them.
 */

#![no_std]

mod access;
mod collection;
mod config;
mod credits;
mod events;
mod identity;
mod marketplace;
mod math;
mod processing;
mod storage;
mod treasury;
mod types;

#[cfg(test)]
mod test_marketplace;
#[cfg(test)]
mod test_processing;

use soroban_sdk::{contract, contractimpl, log, Address, BytesN, Env, String, Vec};

use collection::NewCollection;
use marketplace::NewListing;
use storage::DataKey;

pub use types::{
    BatchStatus, CollectionStatus, CollectorStats, ConfigSnapshot, EWasteDetails, Error,
    GlobalStats, ImpactCredit, ListingStatus, MarketplaceListing, PlatformStats, ProcessingBatch,
    QualityGrade, RecyclerStats, UserProfile, UserRole, UserStatus, WasteCollection, WasteStream,
};

#[contract]
pub struct WasteLedgerContract;

#[contractimpl]
impl WasteLedgerContract {
    // ============================================================================================
    // BOOTSTRAP & ADMINISTRATION
    // ============================================================================================

    /// Initializes the ledger. Can only be called once.
    ///
    /// # Arguments
    /// * `admin` - First holder of the Admin role
    /// * `token` - SEP-41 token used for rewards, earnings and marketplace settlement
    /// * `treasury` - Address that receives withdrawn platform fees
    ///
    /// # Errors
    /// - AlreadyInitialized: If the ledger has been initialized before
    pub fn initialize(env: Env, admin: Address, token: Address, treasury: Address) -> Result<(), Error> {
        if storage::is_initialized(&env) {
            return Err(Error::AlreadyInitialized);
        }
        admin.require_auth();

        // Fails the call if `token` does not implement the token interface
        let decimals = soroban_sdk::token::Client::new(&env, &token).decimals();
        log!(&env, "Initializing with token decimals: {}", decimals);

        storage::set_token(&env, &token);
        storage::set_treasury(&env, &treasury);
        storage::set_paused(&env, false);
        storage::set_role(&env, &admin, UserRole::Admin);

        events::role_granted(&env, &admin, UserRole::Admin, &admin);
        Ok(())
    }

    /// Grants the Admin role to an address that holds no role.
    pub fn grant_admin(env: Env, admin: Address, account: Address) -> Result<(), Error> {
        identity::grant_admin(&env, &admin, &account)
    }

    /// Halts every non-admin mutation. Queries stay available.
    ///
    /// # Errors
    /// - NotAuthorized: If caller is not an admin
    /// - ContractPaused: If the ledger is already paused
    pub fn pause(env: Env, admin: Address) -> Result<(), Error> {
        access::require_admin(&env, &admin)?;
        if storage::is_paused(&env) {
            return Err(Error::ContractPaused);
        }
        storage::set_paused(&env, true);
        events::paused(&env, &admin, true);
        Ok(())
    }

    /// # Errors
    /// - NotAuthorized: If caller is not an admin
    /// - NotPaused: If the ledger is not paused
    pub fn unpause(env: Env, admin: Address) -> Result<(), Error> {
        access::require_admin(&env, &admin)?;
        if !storage::is_paused(&env) {
            return Err(Error::NotPaused);
        }
        storage::set_paused(&env, false);
        events::paused(&env, &admin, false);
        Ok(())
    }

    pub fn is_paused(env: Env) -> bool {
        storage::is_paused(&env)
    }

    // ============================================================================================
    // IDENTITY & ACCESS
    // ============================================================================================

    /// Registers the caller as a collector.
    ///
    /// # Arguments
    /// * `caller` - Address being registered; must sign the call
    /// * `name` - Display name, non-empty
    /// * `location` - Operating area, non-empty
    /// * `contact` - Free-form contact detail, may be empty
    ///
    /// # Errors
    /// - UserBlacklisted / UserSuspended: If the address is flagged
    /// - AlreadyRegistered: If the address already holds a role
    /// - InvalidInput: If name or location is empty
    pub fn register_collector(
        env: Env,
        caller: Address,
        name: String,
        location: String,
        contact: String,
    ) -> Result<UserProfile, Error> {
        identity::register(&env, &caller, UserRole::Collector, name, location, contact)
    }

    /// Registers the caller as a recycler. Same rules as `register_collector`.
    pub fn register_recycler(
        env: Env,
        caller: Address,
        name: String,
        location: String,
        contact: String,
    ) -> Result<UserProfile, Error> {
        identity::register(&env, &caller, UserRole::Recycler, name, location, contact)
    }

    /// Rewrites name, location and contact.
    ///
    /// # Errors
    /// - NotRegistered: If the caller has no profile
    /// - ProfileUpdateTooSoon: If the previous update is less than 24h old
    pub fn update_user_profile(
        env: Env,
        caller: Address,
        name: String,
        location: String,
        contact: String,
    ) -> Result<UserProfile, Error> {
        identity::update_profile(&env, &caller, name, location, contact)
    }

    /// Sets an absolute reputation score (0..=1000).
    pub fn update_user_reputation(env: Env, admin: Address, account: Address, score: u32) -> Result<(), Error> {
        identity::update_reputation(&env, &admin, &account, score)
    }

    pub fn batch_update_reputation(
        env: Env,
        admin: Address,
        accounts: Vec<Address>,
        scores: Vec<u32>,
    ) -> Result<(), Error> {
        identity::batch_update_reputation(&env, &admin, accounts, scores)
    }

    pub fn suspend_user(env: Env, admin: Address, account: Address) -> Result<(), Error> {
        identity::set_suspended(&env, &admin, &account, true)
    }

    pub fn unsuspend_user(env: Env, admin: Address, account: Address) -> Result<(), Error> {
        identity::set_suspended(&env, &admin, &account, false)
    }

    pub fn blacklist_user(env: Env, admin: Address, account: Address) -> Result<(), Error> {
        identity::set_blacklisted(&env, &admin, &account, true)
    }

    pub fn remove_from_blacklist(env: Env, admin: Address, account: Address) -> Result<(), Error> {
        identity::set_blacklisted(&env, &admin, &account, false)
    }

    /// Adds the calling collector to a recycler's roster and returns the
    /// recycler's active collector count.
    pub fn register_collector_at_recycler(env: Env, collector: Address, recycler: Address) -> Result<u32, Error> {
        identity::join_recycler(&env, &collector, &recycler)
    }

    pub fn remove_collector_from_recycler(env: Env, collector: Address, recycler: Address) -> Result<u32, Error> {
        identity::leave_recycler(&env, &collector, &recycler)
    }

    // ============================================================================================
    // COLLECTIONS
    // ============================================================================================

    /// Records a collection and pays the collector's reward in the same call.
    ///
    /// The reward is `floor(weight * rate * medium_multiplier / 10_000)` minus
    /// the platform fee; the fee is added to the platform pool.
    ///
    /// # Arguments
    /// * `collector` - Registered collector; must sign the call
    /// * `waste_stream` - Material category
    /// * `weight` - Kilograms, 1..=max collection weight
    /// * `location` - Pickup location, non-empty
    /// * `image_hash` - Off-chain image reference, non-empty
    /// * `pickup_time` - Scheduled pickup, strictly in the future
    /// * `recycler` - Registered recycler that will confirm the pickup
    ///
    /// # Returns
    /// The new collection id
    ///
    /// # Errors
    /// - ContractPaused: If the ledger is paused
    /// - NotAuthorized: If caller is not a collector
    /// - InvalidWeight / InvalidInput / InvalidPickupTime: On bad input
    /// - NotRegistered: If `recycler` is not a registered recycler
    /// - TransferFailed: If the contract cannot pay the reward
    #[allow(clippy::too_many_arguments)]
    pub fn create_collection(
        env: Env,
        collector: Address,
        waste_stream: WasteStream,
        weight: u32,
        location: String,
        image_hash: String,
        pickup_time: u64,
        recycler: Address,
    ) -> Result<u64, Error> {
        collection::create(
            &env,
            &collector,
            NewCollection {
                waste_stream,
                weight,
                location,
                image_hash,
                pickup_time,
                recycler,
            },
        )
    }

    /// Creates several collections at once, all or none. Inputs are parallel
    /// arrays of equal length.
    ///
    /// # Errors
    /// - ArrayLengthMismatch: If the arrays differ in length
    /// - BatchTooLarge: If the count exceeds the max batch size
    /// - Any error `create_collection` reports, for any element
    #[allow(clippy::too_many_arguments)]
    pub fn batch_create_collection(
        env: Env,
        collector: Address,
        waste_streams: Vec<WasteStream>,
        weights: Vec<u32>,
        locations: Vec<String>,
        image_hashes: Vec<String>,
        pickup_times: Vec<u64>,
        recyclers: Vec<Address>,
    ) -> Result<Vec<u64>, Error> {
        collection::create_batch(
            &env,
            &collector,
            waste_streams,
            weights,
            locations,
            image_hashes,
            pickup_times,
            recyclers,
        )
    }

    /// Corrects a pending collection. Does not change the reward already paid.
    pub fn update_collection(
        env: Env,
        collector: Address,
        collection_id: u64,
        weight: u32,
        location: String,
        image_hash: String,
    ) -> Result<(), Error> {
        collection::update(&env, &collector, collection_id, weight, location, image_hash)
    }

    /// Pending → Verified. Only the recycler chosen at creation.
    pub fn confirm_pickup(env: Env, recycler: Address, collection_id: u64) -> Result<(), Error> {
        collection::confirm_pickup(&env, &recycler, collection_id)
    }

    /// Pending → Rejected, storing `reason`. Rejection is terminal.
    pub fn reject_pickup(env: Env, recycler: Address, collection_id: u64, reason: String) -> Result<(), Error> {
        collection::reject_pickup(&env, &recycler, collection_id, reason)
    }

    /// Re-grades a verified, unprocessed collection.
    pub fn update_collection_quality(
        env: Env,
        recycler: Address,
        collection_id: u64,
        quality: QualityGrade,
    ) -> Result<(), Error> {
        collection::update_quality(&env, &recycler, collection_id, quality)
    }

    pub fn batch_update_collection_quality(
        env: Env,
        recycler: Address,
        collection_ids: Vec<u64>,
        qualities: Vec<QualityGrade>,
    ) -> Result<(), Error> {
        collection::batch_update_quality(&env, &recycler, collection_ids, qualities)
    }

    /// Attaches the component breakdown of an e-waste collection.
    ///
    /// # Arguments
    /// * `components` - Exactly four counts: CPU, battery, PCB, other
    ///
    /// # Errors
    /// - NotOwner: If caller did not create the collection
    /// - NotEWaste: If the collection is not e-waste
    /// - InvalidComponentCount: If `components` does not have four entries
    pub fn add_ewaste_details(
        env: Env,
        collector: Address,
        collection_id: u64,
        components: Vec<u32>,
        serial_number: String,
        manufacturer: String,
        estimated_value: i128,
    ) -> Result<EWasteDetails, Error> {
        collection::add_ewaste_details(
            &env,
            &collector,
            collection_id,
            components,
            serial_number,
            manufacturer,
            estimated_value,
        )
    }

    /// Admin override for a collection that never entered a batch.
    pub fn cancel_collection(env: Env, admin: Address, collection_id: u64, reason: String) -> Result<(), Error> {
        collection::cancel(&env, &admin, collection_id, reason)
    }

    // ============================================================================================
    // PROCESSING
    // ============================================================================================

    /// Groups verified collections of one stream into an open batch.
    ///
    /// # Errors
    /// - NoCollections: If `collection_ids` is empty
    /// - DuplicateCollection: If an id appears twice
    /// - NotAuthorized: If caller is not the recycler of every member
    /// - AlreadyProcessed: If a member is processed or already batched
    /// - InvalidStatus: If a member is not Verified
    /// - MixedWasteTypes: If members span more than one stream
    pub fn create_processing_batch(
        env: Env,
        processor: Address,
        collection_ids: Vec<u64>,
        description: String,
    ) -> Result<u64, Error> {
        processing::create(&env, &processor, collection_ids, description)
    }

    /// Records a provisional output on an open batch.
    pub fn update_processing_batch(
        env: Env,
        processor: Address,
        batch_id: u64,
        output_amount: u64,
        output_quality: QualityGrade,
    ) -> Result<(), Error> {
        processing::update(&env, &processor, batch_id, output_amount, output_quality)
    }

    /// Swaps the full member set of an open batch.
    pub fn replace_batch_collections(
        env: Env,
        processor: Address,
        batch_id: u64,
        collection_ids: Vec<u64>,
    ) -> Result<(), Error> {
        processing::replace_collections(&env, &processor, batch_id, collection_ids)
    }

    /// Completes a batch and mints its impact credit to the processor.
    ///
    /// # Arguments
    /// * `output_amount` - Kilograms of output, 1..=input amount
    /// * `output_quality` - Grade of the output, drives the carbon offset
    ///
    /// # Returns
    /// The id of the minted impact credit
    ///
    /// # Errors
    /// - NotProcessor: If caller did not create the batch
    /// - BatchAlreadyCompleted: If the batch is closed
    /// - InvalidOutputAmount: If output is zero or exceeds input
    pub fn complete_processing(
        env: Env,
        processor: Address,
        batch_id: u64,
        output_amount: u64,
        output_quality: QualityGrade,
    ) -> Result<u64, Error> {
        processing::complete(&env, &processor, batch_id, output_amount, output_quality)
    }

    // ============================================================================================
    // MARKETPLACE
    // ============================================================================================

    /// Lists processed output for sale.
    ///
    /// # Errors
    /// - NotAuthorized: If caller is not a recycler
    /// - InvalidInput: If amount or price is zero
    /// - TooManyActiveListings: If the seller is at the active listing cap
    #[allow(clippy::too_many_arguments)]
    pub fn create_listing(
        env: Env,
        seller: Address,
        waste_stream: WasteStream,
        amount: u64,
        price_per_unit: i128,
        quality: QualityGrade,
        description: String,
        carbon_credits: Option<i128>,
    ) -> Result<u64, Error> {
        marketplace::create(
            &env,
            &seller,
            NewListing {
                waste_stream,
                amount,
                price_per_unit,
                quality,
                description,
                carbon_credits,
            },
        )
    }

    pub fn update_listing(
        env: Env,
        seller: Address,
        listing_id: u64,
        amount: u64,
        price_per_unit: i128,
        description: String,
    ) -> Result<(), Error> {
        marketplace::update(&env, &seller, listing_id, amount, price_per_unit, description)
    }

    pub fn cancel_listing(env: Env, seller: Address, listing_id: u64) -> Result<(), Error> {
        marketplace::cancel(&env, &seller, listing_id)
    }

    /// Buys `amount` units of a listing.
    ///
    /// The buyer must have approved the contract for at least
    /// `amount * price_per_unit`. The seller receives the total minus the
    /// platform fee.
    ///
    /// # Returns
    /// The total price charged
    ///
    /// # Errors
    /// - NotRegistered: If the buyer holds no role
    /// - NotAuthorized: If the buyer is the seller
    /// - ListingNotActive: If the listing is closed
    /// - InsufficientAmount: If `amount` exceeds what remains
    /// - InsufficientBalance / InsufficientAllowance: If the buyer cannot pay
    pub fn purchase_listing(env: Env, buyer: Address, listing_id: u64, amount: u64) -> Result<i128, Error> {
        marketplace::purchase(&env, &buyer, listing_id, amount)
    }

    // ============================================================================================
    // IMPACT CREDITS
    // ============================================================================================

    pub fn transfer_impact_credit(env: Env, owner: Address, credit_id: u64, to: Address) -> Result<(), Error> {
        credits::transfer(&env, &owner, credit_id, &to)
    }

    pub fn burn_impact_credit(env: Env, owner: Address, credit_id: u64) -> Result<(), Error> {
        credits::burn(&env, &owner, credit_id)
    }

    /// Attaches an off-chain verification proof. Advisory only.
    pub fn verify_impact_credit(env: Env, admin: Address, credit_id: u64, proof: String) -> Result<(), Error> {
        credits::verify(&env, &admin, credit_id, proof)
    }

    // ============================================================================================
    // TREASURY
    // ============================================================================================

    /// Withdraws from the collector's earnings ledger and returns what remains.
    ///
    /// # Errors
    /// - InsufficientBalance: If `amount` exceeds the tracked earnings, whatever
    ///   the contract's token balance
    pub fn withdraw_collector_earnings(env: Env, collector: Address, amount: i128) -> Result<i128, Error> {
        treasury::withdraw_earnings(&env, &collector, UserRole::Collector, amount)
    }

    pub fn withdraw_recycler_earnings(env: Env, recycler: Address, amount: i128) -> Result<i128, Error> {
        treasury::withdraw_earnings(&env, &recycler, UserRole::Recycler, amount)
    }

    /// Moves the whole platform fee pool to the treasury and returns the amount.
    pub fn withdraw_platform_fees(env: Env, admin: Address) -> Result<i128, Error> {
        treasury::withdraw_platform_fees(&env, &admin)
    }

    /// Deposits tokens backing rewards and earnings withdrawals.
    pub fn fund_reward_pool(env: Env, from: Address, amount: i128) -> Result<(), Error> {
        treasury::fund_reward_pool(&env, &from, amount)
    }

    /// Moves custodial tokens out. Only while paused.
    pub fn emergency_withdraw(env: Env, admin: Address, to: Address, amount: i128) -> Result<(), Error> {
        treasury::emergency_withdraw(&env, &admin, &to, amount)
    }

    // ============================================================================================
    // CONFIGURATION
    // ============================================================================================

    pub fn set_reward_rate(env: Env, admin: Address, waste_stream: WasteStream, rate: i128) -> Result<(), Error> {
        access::require_admin(&env, &admin)?;
        config::set_reward_rate(&env, waste_stream, rate)?;
        events::config_updated(&env, "reward_rate", (waste_stream, rate));
        Ok(())
    }

    pub fn set_processing_rate(env: Env, admin: Address, waste_stream: WasteStream, rate: i128) -> Result<(), Error> {
        access::require_admin(&env, &admin)?;
        config::set_processing_rate(&env, waste_stream, rate)?;
        events::config_updated(&env, "processing_rate", (waste_stream, rate));
        Ok(())
    }

    pub fn set_quality_multiplier(
        env: Env,
        admin: Address,
        waste_stream: WasteStream,
        quality: QualityGrade,
        bps: u32,
    ) -> Result<(), Error> {
        access::require_admin(&env, &admin)?;
        config::set_quality_multiplier(&env, waste_stream, quality, bps)?;
        events::config_updated(&env, "quality_multiplier", (waste_stream, quality, bps));
        Ok(())
    }

    /// Replaces the four quality multipliers (Low, Medium, High, Premium) of one
    /// stream.
    ///
    /// # Errors
    /// - InvalidQualityGrade: If `multipliers` does not have one entry per grade
    /// - InvalidConfig: If any entry is out of range
    pub fn set_quality_multipliers(
        env: Env,
        admin: Address,
        waste_stream: WasteStream,
        multipliers: Vec<u32>,
    ) -> Result<(), Error> {
        access::require_admin(&env, &admin)?;
        config::set_quality_multipliers(&env, waste_stream, &multipliers)?;
        events::config_updated(&env, "quality_multipliers", (waste_stream, multipliers));
        Ok(())
    }

    pub fn set_carbon_multiplier(env: Env, admin: Address, waste_stream: WasteStream, bps: u32) -> Result<(), Error> {
        access::require_admin(&env, &admin)?;
        config::set_carbon_multiplier(&env, waste_stream, bps)?;
        events::config_updated(&env, "carbon_multiplier", (waste_stream, bps));
        Ok(())
    }

    pub fn set_quality_carbon_multiplier(
        env: Env,
        admin: Address,
        quality: QualityGrade,
        bps: u32,
    ) -> Result<(), Error> {
        access::require_admin(&env, &admin)?;
        config::set_quality_carbon_multiplier(&env, quality, bps)?;
        events::config_updated(&env, "quality_carbon_multiplier", (quality, bps));
        Ok(())
    }

    /// # Errors
    /// - InvalidConfig: If `bps` exceeds 1000 (10%)
    pub fn set_platform_fee(env: Env, admin: Address, bps: u32) -> Result<(), Error> {
        access::require_admin(&env, &admin)?;
        config::set_platform_fee_bps(&env, bps)?;
        events::config_updated(&env, "platform_fee_bps", bps);
        Ok(())
    }

    pub fn set_max_collection_weight(env: Env, admin: Address, weight: u32) -> Result<(), Error> {
        access::require_admin(&env, &admin)?;
        config::set_max_collection_weight(&env, weight)?;
        events::config_updated(&env, "max_collection_weight", weight);
        Ok(())
    }

    pub fn set_max_batch_size(env: Env, admin: Address, size: u32) -> Result<(), Error> {
        access::require_admin(&env, &admin)?;
        config::set_max_batch_size(&env, size)?;
        events::config_updated(&env, "max_batch_size", size);
        Ok(())
    }

    pub fn set_max_active_listings(env: Env, admin: Address, limit: u32) -> Result<(), Error> {
        access::require_admin(&env, &admin)?;
        config::set_max_active_listings(&env, limit)?;
        events::config_updated(&env, "max_active_listings", limit);
        Ok(())
    }

    pub fn set_treasury(env: Env, admin: Address, treasury: Address) -> Result<(), Error> {
        access::require_admin(&env, &admin)?;
        storage::set_treasury(&env, &treasury);
        events::config_updated(&env, "treasury", treasury);
        Ok(())
    }

    // ============================================================================================
    // QUERIES
    // ============================================================================================

    pub fn get_user_profile(env: Env, account: Address) -> Result<UserProfile, Error> {
        storage::get_profile(&env, &account)
    }

    pub fn get_user_role(env: Env, account: Address) -> Option<UserRole> {
        storage::get_role(&env, &account)
    }

    /// Stable identifier of `role`: keccak256 of `COLLECTOR_ROLE`,
    /// `RECYCLER_ROLE` or `ADMIN_ROLE`.
    pub fn role_id(env: Env, role: UserRole) -> BytesN<32> {
        access::role_id(&env, role)
    }

    pub fn get_recycler_collectors(env: Env, recycler: Address) -> Vec<Address> {
        storage::get_roster(&env, &recycler)
    }

    pub fn get_collection_details(env: Env, collection_id: u64) -> Result<WasteCollection, Error> {
        storage::get_collection(&env, collection_id)
    }

    pub fn get_ewaste_details(env: Env, collection_id: u64) -> Option<EWasteDetails> {
        storage::get_ewaste(&env, collection_id)
    }

    pub fn get_collections_by_collector(env: Env, collector: Address) -> Vec<u64> {
        storage::read_index(&env, &DataKey::CollectorCollections(collector))
    }

    pub fn get_collections_by_recycler(env: Env, recycler: Address) -> Vec<u64> {
        storage::read_index(&env, &DataKey::RecyclerCollections(recycler))
    }

    pub fn get_collection_count(env: Env) -> u64 {
        storage::read_counter(&env, &DataKey::CollectionCounter)
    }

    pub fn get_processing_batch(env: Env, batch_id: u64) -> Result<ProcessingBatch, Error> {
        storage::get_batch(&env, batch_id)
    }

    pub fn get_listing(env: Env, listing_id: u64) -> Result<MarketplaceListing, Error> {
        storage::get_listing(&env, listing_id)
    }

    /// Listings in creation order, optionally filtered by stream and activity.
    pub fn get_marketplace_listings(
        env: Env,
        waste_stream: Option<WasteStream>,
        active_only: bool,
    ) -> Vec<MarketplaceListing> {
        marketplace::listings(&env, waste_stream, active_only)
    }

    /// Up to `limit` listings (at most 100) starting at `start_id`, in id order.
    pub fn get_listings_page(
        env: Env,
        waste_stream: Option<WasteStream>,
        start_id: u64,
        limit: u32,
    ) -> Vec<MarketplaceListing> {
        let limit = limit.min(marketplace::MAX_PAGE_SIZE);
        marketplace::listings_page(&env, waste_stream, start_id, limit as u64)
    }

    pub fn get_impact_credit(env: Env, credit_id: u64) -> Result<ImpactCredit, Error> {
        storage::get_credit(&env, credit_id)
    }

    pub fn get_credits_by_owner(env: Env, owner: Address) -> Vec<u64> {
        storage::read_index(&env, &DataKey::OwnerCredits(owner))
    }

    /// Withdrawable earnings of `account`.
    pub fn get_earnings(env: Env, account: Address) -> i128 {
        storage::get_earnings(&env, &account)
    }

    pub fn get_collector_stats(env: Env, collector: Address) -> Result<CollectorStats, Error> {
        let profile = storage::get_profile(&env, &collector)?;
        Ok(CollectorStats {
            collection_count: profile.collection_count,
            collected_by_type: profile.collected_by_type,
            total_earnings: profile.total_earnings,
            pending_earnings: storage::get_earnings(&env, &collector),
            reputation: profile.reputation,
        })
    }

    pub fn get_recycler_stats(env: Env, recycler: Address) -> Result<RecyclerStats, Error> {
        let profile = storage::get_profile(&env, &recycler)?;
        Ok(RecyclerStats {
            batch_count: profile.batch_count,
            processed_by_type: profile.processed_by_type,
            total_earnings: profile.total_earnings,
            pending_earnings: storage::get_earnings(&env, &recycler),
            active_listings: profile.active_listings,
            active_collectors: profile.active_collectors,
            reputation: profile.reputation,
        })
    }

    pub fn get_platform_stats(env: Env) -> PlatformStats {
        PlatformStats {
            total_users: storage::read_counter(&env, &DataKey::UserCount),
            total_collections: storage::read_counter(&env, &DataKey::CollectionCounter),
            total_batches: storage::read_counter(&env, &DataKey::BatchCounter),
            total_listings: storage::read_counter(&env, &DataKey::ListingCounter),
            total_credits: storage::read_counter(&env, &DataKey::CreditCounter),
            active_credits: storage::read_counter(&env, &DataKey::ActiveCredits),
            total_fees_accrued: storage::read_amount(&env, &DataKey::TotalFeesAccrued),
            fee_pool: storage::read_amount(&env, &DataKey::FeePool),
            total_rewards_paid: storage::read_amount(&env, &DataKey::TotalRewardsPaid),
            paused: storage::is_paused(&env),
        }
    }

    pub fn get_global_stats(env: Env) -> GlobalStats {
        GlobalStats {
            collected_by_type: storage::read_tally(&env, &DataKey::CollectedTotals),
            processed_by_type: storage::read_tally(&env, &DataKey::ProcessedTotals),
            total_carbon_offset: storage::read_amount(&env, &DataKey::TotalCarbonOffset),
            burned_carbon_offset: storage::read_amount(&env, &DataKey::BurnedCarbonOffset),
            marketplace_volume: storage::read_amount(&env, &DataKey::MarketplaceVolume),
        }
    }

    /// Offset units for `amount` kg of `waste_stream` output at `quality`,
    /// using the current multipliers.
    pub fn calculate_carbon_offset(
        env: Env,
        waste_stream: WasteStream,
        amount: u64,
        quality: QualityGrade,
    ) -> Result<i128, Error> {
        math::carbon_offset(
            amount,
            config::carbon_multiplier(&env, waste_stream),
            config::quality_carbon_multiplier(&env, quality),
        )
    }

    pub fn get_quality_multiplier(env: Env, waste_stream: WasteStream, quality: QualityGrade) -> u32 {
        config::quality_multiplier(&env, waste_stream, quality)
    }

    pub fn get_config(env: Env) -> Result<ConfigSnapshot, Error> {
        Ok(ConfigSnapshot {
            token: storage::get_token(&env)?,
            treasury: storage::get_treasury(&env)?,
            platform_fee_bps: config::platform_fee_bps(&env),
            max_collection_weight: config::max_collection_weight(&env),
            max_batch_size: config::max_batch_size(&env),
            max_active_listings: config::max_active_listings(&env),
            reward_rates: config::reward_rates(&env),
            processing_rates: config::processing_rates(&env),
            carbon_multipliers: config::carbon_multipliers(&env),
            quality_carbon_multipliers: config::quality_carbon_multipliers(&env),
        })
    }
}
