//! Impact credit registry: one credit minted per completed processing batch,
//! transferable and burnable by its current owner.

use soroban_sdk::{Address, Env, String};

use crate::access;
use crate::events;
use crate::storage::{self, DataKey};
use crate::types::{Error, ImpactCredit, WasteStream};

/// Mints a credit to `owner`. Only reachable from batch completion.
pub(crate) fn mint(
    env: &Env,
    owner: &Address,
    waste_stream: WasteStream,
    amount: u64,
    carbon_offset: i128,
    batch_id: u64,
) -> Result<u64, Error> {
    let id = storage::next_id(env, &DataKey::CreditCounter)?;
    let credit = ImpactCredit {
        id,
        owner: owner.clone(),
        waste_stream,
        amount,
        carbon_offset,
        batch_id,
        verification_proof: None,
        created_at: env.ledger().timestamp(),
    };
    storage::set_credit(env, &credit);
    storage::push_index(env, &DataKey::OwnerCredits(owner.clone()), id);
    storage::increment_counter(env, &DataKey::ActiveCredits)?;

    events::credit_minted(env, id, owner, amount, carbon_offset);
    Ok(id)
}

fn load_owned(env: &Env, owner: &Address, id: u64) -> Result<ImpactCredit, Error> {
    let credit = storage::get_credit(env, id)?;
    if credit.owner != *owner {
        return Err(Error::NotOwner);
    }
    Ok(credit)
}

/// Reassigns ownership. Amount and offset are untouched.
pub fn transfer(env: &Env, owner: &Address, id: u64, to: &Address) -> Result<(), Error> {
    access::require_not_paused(env)?;
    owner.require_auth();
    access::check_standing(env, owner)?;

    let mut credit = load_owned(env, owner, id)?;
    if owner == to {
        return Err(Error::InvalidInput);
    }
    if access::is_blacklisted(env, to) {
        return Err(Error::UserBlacklisted);
    }

    credit.owner = to.clone();
    storage::set_credit(env, &credit);
    storage::remove_from_index(env, &DataKey::OwnerCredits(owner.clone()), id);
    storage::push_index(env, &DataKey::OwnerCredits(to.clone()), id);

    events::credit_transferred(env, id, owner, to);
    Ok(())
}

/// Retires a credit permanently. Its offset moves to the burned tally.
pub fn burn(env: &Env, owner: &Address, id: u64) -> Result<(), Error> {
    access::require_not_paused(env)?;
    owner.require_auth();
    access::check_standing(env, owner)?;

    let credit = load_owned(env, owner, id)?;

    storage::remove_credit(env, id);
    storage::remove_from_index(env, &DataKey::OwnerCredits(owner.clone()), id);
    storage::decrement_counter(env, &DataKey::ActiveCredits);
    storage::add_amount(env, &DataKey::BurnedCarbonOffset, credit.carbon_offset)?;

    events::credit_burned(env, id, owner, credit.carbon_offset);
    Ok(())
}

/// Attaches an advisory proof reference. Does not gate transfer or burn.
pub fn verify(env: &Env, admin: &Address, id: u64, proof: String) -> Result<(), Error> {
    access::require_admin(env, admin)?;

    let mut credit = storage::get_credit(env, id)?;
    if proof.len() == 0 {
        return Err(Error::InvalidInput);
    }
    credit.verification_proof = Some(proof.clone());
    storage::set_credit(env, &credit);

    events::credit_verified(env, id, admin, &proof);
    Ok(())
}
