//! Runtime-tunable protocol parameters.
//!
//! Every parameter is read from instance storage at the point of use and falls
//! back to a compiled-in default when an admin has never set it. Setters reject
//! out-of-range values with `Error::InvalidConfig`; nothing is clamped.

use soroban_sdk::{contracttype, Env, Vec};

use crate::types::{Error, QualityGrade, WasteStream};

#[contracttype]
#[derive(Clone, Debug)]
pub enum ConfigKey {
    RewardRate(WasteStream),
    QualityMultiplier(WasteStream, QualityGrade),
    CarbonMultiplier(WasteStream),
    QualityCarbonMultiplier(QualityGrade),
    ProcessingRate(WasteStream),
    PlatformFeeBps,
    MaxCollectionWeight,
    MaxBatchSize,
    MaxActiveListings,
}

pub const BASIS_POINTS: u32 = 10_000;

pub const DEFAULT_PLATFORM_FEE_BPS: u32 = 200; // 2%
pub const MAX_PLATFORM_FEE_BPS: u32 = 1_000; // 10%
pub const DEFAULT_MAX_COLLECTION_WEIGHT: u32 = 1_000; // kg
pub const DEFAULT_MAX_BATCH_SIZE: u32 = 50;
pub const MAX_BATCH_SIZE_LIMIT: u32 = 200;
pub const DEFAULT_MAX_ACTIVE_LISTINGS: u32 = 20;
pub const MAX_QUALITY_MULTIPLIER: u32 = 50_000;
pub const MAX_CARBON_MULTIPLIER: u32 = 100_000;

pub const PROFILE_UPDATE_COOLDOWN: u64 = 86_400; // 24h
pub const DEFAULT_REPUTATION: u32 = 100;
pub const MAX_REPUTATION: u32 = 1_000;

/// Reward in token base units (7 decimals) per kilogram collected.
pub fn default_reward_rate(stream: WasteStream) -> i128 {
    match stream {
        WasteStream::Plastic => 500_000,   // 0.05
        WasteStream::EWaste => 2_000_000,  // 0.2
        WasteStream::Metal => 1_000_000,   // 0.1
        WasteStream::General => 200_000,   // 0.02
    }
}

/// Recycler credit in token base units per kilogram of processed output.
pub fn default_processing_rate(stream: WasteStream) -> i128 {
    match stream {
        WasteStream::Plastic => 200_000,
        WasteStream::EWaste => 800_000,
        WasteStream::Metal => 400_000,
        WasteStream::General => 100_000,
    }
}

pub fn default_quality_multiplier(grade: QualityGrade) -> u32 {
    match grade {
        QualityGrade::Low => 8_000,
        QualityGrade::Medium => 10_000,
        QualityGrade::High => 12_000,
        QualityGrade::Premium => 15_000,
    }
}

pub fn default_carbon_multiplier(stream: WasteStream) -> u32 {
    match stream {
        WasteStream::Plastic => 15_000,
        WasteStream::EWaste => 30_000,
        WasteStream::Metal => 25_000,
        WasteStream::General => 10_000,
    }
}

// ================================================================================================
// READERS
// ================================================================================================

pub fn reward_rate(env: &Env, stream: WasteStream) -> i128 {
    env.storage()
        .instance()
        .get(&ConfigKey::RewardRate(stream))
        .unwrap_or_else(|| default_reward_rate(stream))
}

pub fn processing_rate(env: &Env, stream: WasteStream) -> i128 {
    env.storage()
        .instance()
        .get(&ConfigKey::ProcessingRate(stream))
        .unwrap_or_else(|| default_processing_rate(stream))
}

pub fn quality_multiplier(env: &Env, stream: WasteStream, grade: QualityGrade) -> u32 {
    env.storage()
        .instance()
        .get(&ConfigKey::QualityMultiplier(stream, grade))
        .unwrap_or_else(|| default_quality_multiplier(grade))
}

pub fn carbon_multiplier(env: &Env, stream: WasteStream) -> u32 {
    env.storage()
        .instance()
        .get(&ConfigKey::CarbonMultiplier(stream))
        .unwrap_or_else(|| default_carbon_multiplier(stream))
}

pub fn quality_carbon_multiplier(env: &Env, grade: QualityGrade) -> u32 {
    env.storage()
        .instance()
        .get(&ConfigKey::QualityCarbonMultiplier(grade))
        .unwrap_or_else(|| default_quality_multiplier(grade))
}

pub fn platform_fee_bps(env: &Env) -> u32 {
    env.storage()
        .instance()
        .get(&ConfigKey::PlatformFeeBps)
        .unwrap_or(DEFAULT_PLATFORM_FEE_BPS)
}

pub fn max_collection_weight(env: &Env) -> u32 {
    env.storage()
        .instance()
        .get(&ConfigKey::MaxCollectionWeight)
        .unwrap_or(DEFAULT_MAX_COLLECTION_WEIGHT)
}

pub fn max_batch_size(env: &Env) -> u32 {
    env.storage()
        .instance()
        .get(&ConfigKey::MaxBatchSize)
        .unwrap_or(DEFAULT_MAX_BATCH_SIZE)
}

pub fn max_active_listings(env: &Env) -> u32 {
    env.storage()
        .instance()
        .get(&ConfigKey::MaxActiveListings)
        .unwrap_or(DEFAULT_MAX_ACTIVE_LISTINGS)
}

pub fn reward_rates(env: &Env) -> Vec<i128> {
    let mut rates = Vec::new(env);
    for stream in WasteStream::ALL {
        rates.push_back(reward_rate(env, stream));
    }
    rates
}

pub fn processing_rates(env: &Env) -> Vec<i128> {
    let mut rates = Vec::new(env);
    for stream in WasteStream::ALL {
        rates.push_back(processing_rate(env, stream));
    }
    rates
}

pub fn carbon_multipliers(env: &Env) -> Vec<u32> {
    let mut multipliers = Vec::new(env);
    for stream in WasteStream::ALL {
        multipliers.push_back(carbon_multiplier(env, stream));
    }
    multipliers
}

pub fn quality_carbon_multipliers(env: &Env) -> Vec<u32> {
    let mut multipliers = Vec::new(env);
    for grade in QualityGrade::ALL {
        multipliers.push_back(quality_carbon_multiplier(env, grade));
    }
    multipliers
}

// ================================================================================================
// SETTERS
// ================================================================================================

pub fn set_reward_rate(env: &Env, stream: WasteStream, rate: i128) -> Result<(), Error> {
    if rate <= 0 {
        return Err(Error::InvalidConfig);
    }
    env.storage()
        .instance()
        .set(&ConfigKey::RewardRate(stream), &rate);
    Ok(())
}

pub fn set_processing_rate(env: &Env, stream: WasteStream, rate: i128) -> Result<(), Error> {
    if rate < 0 {
        return Err(Error::InvalidConfig);
    }
    env.storage()
        .instance()
        .set(&ConfigKey::ProcessingRate(stream), &rate);
    Ok(())
}

pub fn set_quality_multiplier(
    env: &Env,
    stream: WasteStream,
    grade: QualityGrade,
    bps: u32,
) -> Result<(), Error> {
    if bps == 0 || bps > MAX_QUALITY_MULTIPLIER {
        return Err(Error::InvalidConfig);
    }
    env.storage()
        .instance()
        .set(&ConfigKey::QualityMultiplier(stream, grade), &bps);
    Ok(())
}

/// Replaces the whole multiplier row of one stream. `multipliers` is indexed by
/// grade (Low, Medium, High, Premium) and must have exactly one entry per grade.
pub fn set_quality_multipliers(
    env: &Env,
    stream: WasteStream,
    multipliers: &Vec<u32>,
) -> Result<(), Error> {
    if multipliers.len() != QualityGrade::ALL.len() as u32 {
        return Err(Error::InvalidQualityGrade);
    }
    // Validate the full row before writing any of it.
    for bps in multipliers.iter() {
        if bps == 0 || bps > MAX_QUALITY_MULTIPLIER {
            return Err(Error::InvalidConfig);
        }
    }
    for (index, bps) in multipliers.iter().enumerate() {
        let grade = QualityGrade::try_from(index as u32)?;
        set_quality_multiplier(env, stream, grade, bps)?;
    }
    Ok(())
}

pub fn set_carbon_multiplier(env: &Env, stream: WasteStream, bps: u32) -> Result<(), Error> {
    if bps == 0 || bps > MAX_CARBON_MULTIPLIER {
        return Err(Error::InvalidConfig);
    }
    env.storage()
        .instance()
        .set(&ConfigKey::CarbonMultiplier(stream), &bps);
    Ok(())
}

pub fn set_quality_carbon_multiplier(env: &Env, grade: QualityGrade, bps: u32) -> Result<(), Error> {
    if bps == 0 || bps > MAX_QUALITY_MULTIPLIER {
        return Err(Error::InvalidConfig);
    }
    env.storage()
        .instance()
        .set(&ConfigKey::QualityCarbonMultiplier(grade), &bps);
    Ok(())
}

pub fn set_platform_fee_bps(env: &Env, bps: u32) -> Result<(), Error> {
    if bps > MAX_PLATFORM_FEE_BPS {
        return Err(Error::InvalidConfig);
    }
    env.storage().instance().set(&ConfigKey::PlatformFeeBps, &bps);
    Ok(())
}

pub fn set_max_collection_weight(env: &Env, weight: u32) -> Result<(), Error> {
    if weight == 0 {
        return Err(Error::InvalidConfig);
    }
    env.storage()
        .instance()
        .set(&ConfigKey::MaxCollectionWeight, &weight);
    Ok(())
}

pub fn set_max_batch_size(env: &Env, size: u32) -> Result<(), Error> {
    if size == 0 || size > MAX_BATCH_SIZE_LIMIT {
        return Err(Error::InvalidConfig);
    }
    env.storage().instance().set(&ConfigKey::MaxBatchSize, &size);
    Ok(())
}

pub fn set_max_active_listings(env: &Env, limit: u32) -> Result<(), Error> {
    if limit == 0 {
        return Err(Error::InvalidConfig);
    }
    env.storage()
        .instance()
        .set(&ConfigKey::MaxActiveListings, &limit);
    Ok(())
}
