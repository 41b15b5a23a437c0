/*!
 * Type Definitions for the Waste Ledger Contract
 *
 * This module defines the data structures, enums and the error taxonomy shared by
 * every component of the ledger: identity, collections, processing batches, the
 * marketplace and impact credits.
 */

use soroban_sdk::{contracterror, contracttype, Address, String, Vec};

// ================================================================================================
// CATEGORIES
// ================================================================================================

/// Category of recyclable material.
///
/// The discriminant doubles as the index into every per-stream tally vector
/// (`collected_by_type`, `processed_by_type`).
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum WasteStream {
    Plastic = 0,
    EWaste = 1,
    Metal = 2,
    General = 3,
}

impl WasteStream {
    pub const ALL: [WasteStream; 4] = [
        WasteStream::Plastic,
        WasteStream::EWaste,
        WasteStream::Metal,
        WasteStream::General,
    ];

    pub fn index(self) -> u32 {
        self as u32
    }
}

impl TryFrom<u32> for WasteStream {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(WasteStream::Plastic),
            1 => Ok(WasteStream::EWaste),
            2 => Ok(WasteStream::Metal),
            3 => Ok(WasteStream::General),
            _ => Err(Error::InvalidWasteType),
        }
    }
}

/// Assessed material quality.
///
/// Grades are ordered: every multiplier table is expected (though not forced)
/// to be monotonic from `Low` to `Premium`.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum QualityGrade {
    Low = 0,
    Medium = 1,
    High = 2,
    Premium = 3,
}

impl QualityGrade {
    pub const ALL: [QualityGrade; 4] = [
        QualityGrade::Low,
        QualityGrade::Medium,
        QualityGrade::High,
        QualityGrade::Premium,
    ];
}

impl TryFrom<u32> for QualityGrade {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(QualityGrade::Low),
            1 => Ok(QualityGrade::Medium),
            2 => Ok(QualityGrade::High),
            3 => Ok(QualityGrade::Premium),
            _ => Err(Error::InvalidQualityGrade),
        }
    }
}

/// Fixed role held by an address. Assigned once, never changed.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum UserRole {
    Collector = 0,
    Recycler = 1,
    Admin = 2,
}

/// Account standing as shown to the UI.
///
/// The authoritative suspension and blacklist flags are stored per address (so
/// they also cover unregistered addresses); this field mirrors them on the
/// profile.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum UserStatus {
    Verified = 0,
    Suspended = 1,
    Blacklisted = 2,
}

// ================================================================================================
// IDENTITY
// ================================================================================================

/// Profile of a registered collector or recycler.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UserProfile {
    pub name: String,
    pub location: String,
    pub contact: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub registered_at: u64,
    pub verified_at: u64,
    /// `None` until the first profile update; the cooldown only applies once set
    pub last_profile_update: Option<u64>,
    pub reputation: u32,
    /// Kilograms per stream, indexed by `WasteStream::index`
    pub collected_by_type: Vec<u64>,
    /// Kilograms of output per stream, indexed by `WasteStream::index`
    pub processed_by_type: Vec<u64>,
    pub collection_count: u64,
    pub batch_count: u64,
    /// Everything ever paid or credited to this address
    pub total_earnings: i128,
    pub active_listings: u32,
    pub active_collectors: u32,
}

// ================================================================================================
// COLLECTIONS
// ================================================================================================

/// Lifecycle of a waste collection.
///
/// # State Transition Rules
/// - Pending → Verified (recycler confirms pickup)
/// - Pending → Rejected (recycler rejects pickup, terminal)
/// - Verified → InProgress (collection joins a processing batch)
/// - InProgress → Verified (collection is swapped out of an open batch)
/// - InProgress → Completed (batch completes, terminal)
/// - Pending | Verified → Cancelled (admin override, terminal)
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum CollectionStatus {
    Pending = 0,
    Verified = 1,
    Rejected = 2,
    InProgress = 3,
    Completed = 4,
    Cancelled = 5,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WasteCollection {
    pub id: u64,
    pub collector: Address,
    pub waste_stream: WasteStream,
    /// Kilograms, 1..=max collection weight
    pub weight: u32,
    pub location: String,
    /// Off-chain image reference (content hash / CID)
    pub image_hash: String,
    pub status: CollectionStatus,
    pub created_at: u64,
    pub pickup_time: u64,
    pub recycler: Address,
    pub quality: QualityGrade,
    /// Gross reward before the platform fee, frozen at creation
    pub base_reward: i128,
    pub platform_fee: i128,
    /// Net amount paid to the collector, frozen at creation
    pub reward_amount: i128,
    pub is_processed: bool,
    pub batch_id: Option<u64>,
    pub rejection_reason: Option<String>,
}

/// Component breakdown attached to an e-waste collection.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EWasteDetails {
    pub cpu_count: u32,
    pub battery_count: u32,
    pub pcb_count: u32,
    pub other_count: u32,
    pub serial_number: String,
    pub manufacturer: String,
    pub estimated_value: i128,
}

// ================================================================================================
// PROCESSING
// ================================================================================================

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum BatchStatus {
    InProgress = 0,
    Completed = 1,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProcessingBatch {
    pub id: u64,
    pub processor: Address,
    pub waste_stream: WasteStream,
    pub collection_ids: Vec<u64>,
    /// Sum of member collection weights
    pub input_amount: u64,
    /// Provisional until completion, final afterwards
    pub output_amount: u64,
    pub output_quality: QualityGrade,
    pub carbon_offset: i128,
    pub description: String,
    pub status: BatchStatus,
    pub created_at: u64,
    pub completed_at: Option<u64>,
    pub credit_id: Option<u64>,
}

// ================================================================================================
// MARKETPLACE
// ================================================================================================

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ListingStatus {
    Active = 0,
    Completed = 1,
    Cancelled = 2,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MarketplaceListing {
    pub id: u64,
    pub seller: Address,
    pub waste_stream: WasteStream,
    /// Remaining units for sale
    pub amount: u64,
    pub price_per_unit: i128,
    pub quality: QualityGrade,
    pub description: String,
    pub is_active: bool,
    pub status: ListingStatus,
    pub created_at: u64,
    pub carbon_credits: Option<i128>,
    pub sold_amount: u64,
}

// ================================================================================================
// IMPACT CREDITS
// ================================================================================================

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ImpactCredit {
    pub id: u64,
    pub owner: Address,
    pub waste_stream: WasteStream,
    pub amount: u64,
    pub carbon_offset: i128,
    pub batch_id: u64,
    /// Advisory off-chain proof, attached by an admin
    pub verification_proof: Option<String>,
    pub created_at: u64,
}

// ================================================================================================
// QUERY VIEWS
// ================================================================================================

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CollectorStats {
    pub collection_count: u64,
    pub collected_by_type: Vec<u64>,
    pub total_earnings: i128,
    pub pending_earnings: i128,
    pub reputation: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RecyclerStats {
    pub batch_count: u64,
    pub processed_by_type: Vec<u64>,
    pub total_earnings: i128,
    pub pending_earnings: i128,
    pub active_listings: u32,
    pub active_collectors: u32,
    pub reputation: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PlatformStats {
    pub total_users: u64,
    pub total_collections: u64,
    pub total_batches: u64,
    pub total_listings: u64,
    pub total_credits: u64,
    pub active_credits: u64,
    /// Cumulative fees ever accrued
    pub total_fees_accrued: i128,
    /// Fees accrued and not yet withdrawn
    pub fee_pool: i128,
    pub total_rewards_paid: i128,
    pub paused: bool,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GlobalStats {
    pub collected_by_type: Vec<u64>,
    pub processed_by_type: Vec<u64>,
    pub total_carbon_offset: i128,
    pub burned_carbon_offset: i128,
    pub marketplace_volume: i128,
}

/// Scalar configuration parameters, as read by the dashboard.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConfigSnapshot {
    pub token: Address,
    pub treasury: Address,
    pub platform_fee_bps: u32,
    pub max_collection_weight: u32,
    pub max_batch_size: u32,
    pub max_active_listings: u32,
    pub reward_rates: Vec<i128>,
    pub processing_rates: Vec<i128>,
    pub carbon_multipliers: Vec<u32>,
    pub quality_carbon_multipliers: Vec<u32>,
}

// ================================================================================================
// ERROR DEFINITIONS
// ================================================================================================

/// Every failure the ledger can report.
///
/// # Error Code Ranges
/// - 1-9: bootstrap and contract state
/// - 10-19: authorization
/// - 20-39: input validation
/// - 40-59: lifecycle state
/// - 60-69: financial
/// - 70-79: configuration and arithmetic
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    // ========== Bootstrap (1-9) ==========
    NotInitialized = 1,
    AlreadyInitialized = 2,
    ContractPaused = 3,
    NotPaused = 4,
    Reentrancy = 5,

    // ========== Authorization (10-19) ==========
    /// Caller lacks the role the operation requires
    NotAuthorized = 10,
    AlreadyRegistered = 11,
    NotRegistered = 12,
    UserSuspended = 13,
    UserBlacklisted = 14,
    /// Caller is not the owner of the collection or credit
    NotOwner = 15,
    NotSeller = 16,
    NotProcessor = 17,

    // ========== Validation (20-39) ==========
    InvalidInput = 20,
    InvalidWeight = 21,
    InvalidPickupTime = 22,
    ArrayLengthMismatch = 23,
    BatchTooLarge = 24,
    InvalidComponentCount = 25,
    NoCollections = 26,
    MixedWasteTypes = 27,
    InvalidOutputAmount = 28,
    InvalidWasteType = 29,
    InvalidQualityGrade = 30,
    DuplicateCollection = 31,
    ProfileUpdateTooSoon = 32,

    // ========== Lifecycle State (40-59) ==========
    CollectionNotFound = 40,
    InvalidStatus = 41,
    NotEWaste = 42,
    AlreadyProcessed = 43,
    BatchNotFound = 44,
    BatchAlreadyCompleted = 45,
    ListingNotFound = 46,
    ListingNotActive = 47,
    TooManyActiveListings = 48,
    InsufficientAmount = 49,
    CreditNotFound = 50,

    // ========== Financial (60-69) ==========
    InsufficientBalance = 60,
    InsufficientAllowance = 61,
    TransferFailed = 62,

    // ========== Configuration (70-79) ==========
    InvalidConfig = 70,
    Overflow = 71,
}
