//! Capability checks shared by every mutating entry point.
//!
//! The order of checks is fixed: pause flag, then the caller's signature, then
//! blacklist and suspension, then role. Business-data validation only runs after
//! all of these pass.

use soroban_sdk::{Address, Bytes, BytesN, Env};

use crate::storage::{self, DataKey};
use crate::types::{Error, UserRole};

pub fn require_initialized(env: &Env) -> Result<(), Error> {
    if !storage::is_initialized(env) {
        return Err(Error::NotInitialized);
    }
    Ok(())
}

pub fn require_not_paused(env: &Env) -> Result<(), Error> {
    require_initialized(env)?;
    if storage::is_paused(env) {
        return Err(Error::ContractPaused);
    }
    Ok(())
}

pub fn is_blacklisted(env: &Env, account: &Address) -> bool {
    storage::read_flag(env, &DataKey::Blacklisted(account.clone()))
}

pub fn is_suspended(env: &Env, account: &Address) -> bool {
    storage::read_flag(env, &DataKey::Suspended(account.clone()))
}

/// Fails when the account is blacklisted or suspended. Applies to unregistered
/// addresses too.
pub fn check_standing(env: &Env, account: &Address) -> Result<(), Error> {
    if is_blacklisted(env, account) {
        return Err(Error::UserBlacklisted);
    }
    if is_suspended(env, account) {
        return Err(Error::UserSuspended);
    }
    Ok(())
}

/// Single capability gate: the caller must be in good standing and hold
/// `required`.
pub fn authorize(env: &Env, caller: &Address, required: UserRole) -> Result<(), Error> {
    check_standing(env, caller)?;
    match storage::get_role(env, caller) {
        Some(role) if role == required => Ok(()),
        _ => Err(Error::NotAuthorized),
    }
}

/// Caller must be in good standing and hold any role.
pub fn require_registered(env: &Env, caller: &Address) -> Result<UserRole, Error> {
    check_standing(env, caller)?;
    storage::get_role(env, caller).ok_or(Error::NotRegistered)
}

/// Admin gate used by every privileged entry point. Not subject to the pause flag.
pub fn require_admin(env: &Env, caller: &Address) -> Result<(), Error> {
    require_initialized(env)?;
    caller.require_auth();
    authorize(env, caller, UserRole::Admin)
}

/// Stable identifier of a role: keccak256 of its canonical name.
pub fn role_id(env: &Env, role: UserRole) -> BytesN<32> {
    let name: &[u8] = match role {
        UserRole::Collector => b"COLLECTOR_ROLE",
        UserRole::Recycler => b"RECYCLER_ROLE",
        UserRole::Admin => b"ADMIN_ROLE",
    };
    env.crypto()
        .keccak256(&Bytes::from_slice(env, name))
        .to_bytes()
}
