//! Identity & access registry: registration, profiles, reputation, suspension,
//! blacklisting and the recycler collector roster.

use soroban_sdk::{Address, Env, String, Vec};

use crate::access;
use crate::config::{DEFAULT_REPUTATION, MAX_REPUTATION, PROFILE_UPDATE_COOLDOWN};
use crate::events;
use crate::storage::{self, DataKey};
use crate::types::{Error, UserProfile, UserRole, UserStatus};

/// Registers the caller as a collector or recycler.
///
/// One role per address: any existing role (including Admin) fails with
/// `AlreadyRegistered`.
pub fn register(
    env: &Env,
    caller: &Address,
    role: UserRole,
    name: String,
    location: String,
    contact: String,
) -> Result<UserProfile, Error> {
    access::require_not_paused(env)?;
    caller.require_auth();
    access::check_standing(env, caller)?;

    if role == UserRole::Admin {
        return Err(Error::NotAuthorized);
    }
    if storage::get_role(env, caller).is_some() {
        return Err(Error::AlreadyRegistered);
    }
    if name.len() == 0 || location.len() == 0 {
        return Err(Error::InvalidInput);
    }

    let now = env.ledger().timestamp();
    let profile = UserProfile {
        name: name.clone(),
        location,
        contact,
        role,
        status: UserStatus::Verified,
        registered_at: now,
        verified_at: now,
        last_profile_update: None,
        reputation: DEFAULT_REPUTATION,
        collected_by_type: storage::zero_tally(env),
        processed_by_type: storage::zero_tally(env),
        collection_count: 0,
        batch_count: 0,
        total_earnings: 0,
        active_listings: 0,
        active_collectors: 0,
    };

    storage::set_role(env, caller, role);
    storage::set_profile(env, caller, &profile);
    storage::next_id(env, &DataKey::UserCount)?;

    events::user_registered(env, caller, role, &name);
    events::role_granted(env, caller, role, caller);
    Ok(profile)
}

/// Grants the Admin role to an address that holds no role yet.
pub fn grant_admin(env: &Env, admin: &Address, account: &Address) -> Result<(), Error> {
    access::require_admin(env, admin)?;
    if storage::get_role(env, account).is_some() {
        return Err(Error::AlreadyRegistered);
    }
    storage::set_role(env, account, UserRole::Admin);
    events::role_granted(env, account, UserRole::Admin, admin);
    Ok(())
}

/// Rewrites the caller's descriptive fields, at most once per cooldown window.
/// The first update after registration is never rate limited.
pub fn update_profile(
    env: &Env,
    caller: &Address,
    name: String,
    location: String,
    contact: String,
) -> Result<UserProfile, Error> {
    access::require_not_paused(env)?;
    caller.require_auth();
    access::check_standing(env, caller)?;

    let mut profile = storage::get_profile(env, caller)?;
    if name.len() == 0 || location.len() == 0 {
        return Err(Error::InvalidInput);
    }

    let now = env.ledger().timestamp();
    if let Some(last) = profile.last_profile_update {
        if now < last.saturating_add(PROFILE_UPDATE_COOLDOWN) {
            return Err(Error::ProfileUpdateTooSoon);
        }
    }

    profile.name = name;
    profile.location = location;
    profile.contact = contact;
    profile.last_profile_update = Some(now);
    storage::set_profile(env, caller, &profile);

    events::profile_updated(env, caller, now);
    Ok(profile)
}

fn set_reputation(env: &Env, account: &Address, score: u32) -> Result<(), Error> {
    if score > MAX_REPUTATION {
        return Err(Error::InvalidInput);
    }
    let mut profile = storage::get_profile(env, account)?;
    let old_score = profile.reputation;
    profile.reputation = score;
    storage::set_profile(env, account, &profile);

    events::reputation_updated(env, account, old_score, score);
    Ok(())
}

pub fn update_reputation(env: &Env, admin: &Address, account: &Address, score: u32) -> Result<(), Error> {
    access::require_admin(env, admin)?;
    set_reputation(env, account, score)
}

/// Applies every score or none of them.
pub fn batch_update_reputation(
    env: &Env,
    admin: &Address,
    accounts: Vec<Address>,
    scores: Vec<u32>,
) -> Result<(), Error> {
    access::require_admin(env, admin)?;

    if accounts.len() != scores.len() {
        return Err(Error::ArrayLengthMismatch);
    }
    if accounts.is_empty() {
        return Err(Error::InvalidInput);
    }
    if accounts.len() > crate::config::max_batch_size(env) {
        return Err(Error::BatchTooLarge);
    }

    for (account, score) in accounts.iter().zip(scores.iter()) {
        set_reputation(env, &account, score)?;
    }
    Ok(())
}

/// Recomputes the mirrored profile status from the stored flags.
fn refresh_status(env: &Env, account: &Address) {
    if let Ok(mut profile) = storage::get_profile(env, account) {
        profile.status = if access::is_blacklisted(env, account) {
            UserStatus::Blacklisted
        } else if access::is_suspended(env, account) {
            UserStatus::Suspended
        } else {
            UserStatus::Verified
        };
        storage::set_profile(env, account, &profile);
    }
}

pub fn set_suspended(env: &Env, admin: &Address, account: &Address, suspended: bool) -> Result<(), Error> {
    access::require_admin(env, admin)?;
    if admin == account {
        return Err(Error::InvalidInput);
    }
    if access::is_suspended(env, account) == suspended {
        return Err(Error::InvalidStatus);
    }

    storage::write_flag(env, &DataKey::Suspended(account.clone()), suspended);
    refresh_status(env, account);

    events::user_suspended(env, account, suspended);
    Ok(())
}

pub fn set_blacklisted(env: &Env, admin: &Address, account: &Address, blacklisted: bool) -> Result<(), Error> {
    access::require_admin(env, admin)?;
    if admin == account {
        return Err(Error::InvalidInput);
    }
    if access::is_blacklisted(env, account) == blacklisted {
        return Err(Error::InvalidStatus);
    }

    storage::write_flag(env, &DataKey::Blacklisted(account.clone()), blacklisted);
    refresh_status(env, account);

    events::user_blacklisted(env, account, blacklisted);
    Ok(())
}

// ================================================================================================
// RECYCLER ROSTER
// ================================================================================================
// Statistics only; the roster never gates pickups or processing.

pub fn join_recycler(env: &Env, collector: &Address, recycler: &Address) -> Result<u32, Error> {
    access::require_not_paused(env)?;
    collector.require_auth();
    access::authorize(env, collector, UserRole::Collector)?;
    if storage::get_role(env, recycler) != Some(UserRole::Recycler) {
        return Err(Error::NotRegistered);
    }

    let mut roster = storage::get_roster(env, recycler);
    if roster.contains(collector) {
        return Err(Error::AlreadyRegistered);
    }
    roster.push_back(collector.clone());
    storage::set_roster(env, recycler, &roster);

    let mut profile = storage::get_profile(env, recycler)?;
    profile.active_collectors = profile.active_collectors.saturating_add(1);
    storage::set_profile(env, recycler, &profile);

    events::roster_changed(env, recycler, collector, true, profile.active_collectors);
    Ok(profile.active_collectors)
}

pub fn leave_recycler(env: &Env, collector: &Address, recycler: &Address) -> Result<u32, Error> {
    access::require_not_paused(env)?;
    collector.require_auth();
    access::authorize(env, collector, UserRole::Collector)?;

    let mut roster = storage::get_roster(env, recycler);
    let position = roster
        .first_index_of(collector.clone())
        .ok_or(Error::NotRegistered)?;
    roster.remove(position);
    storage::set_roster(env, recycler, &roster);

    let mut profile = storage::get_profile(env, recycler)?;
    profile.active_collectors = profile.active_collectors.saturating_sub(1);
    storage::set_profile(env, recycler, &profile);

    events::roster_changed(env, recycler, collector, false, profile.active_collectors);
    Ok(profile.active_collectors)
}
