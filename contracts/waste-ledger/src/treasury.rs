//! Token custody: reward payouts, the platform-fee pool and the earnings ledger.
//!
//! Internal ledger balances (earnings, fee pool) are tracked separately from the
//! token balance the contract actually holds. A withdrawal is bounded by the
//! ledger balance first; a custodial shortfall then surfaces as
//! `TransferFailed`. State is always written before the outbound transfer.

use soroban_sdk::{log, token, Address, Env};

use crate::access;
use crate::events;
use crate::storage::{self, DataKey};
use crate::types::{Error, UserRole};

pub fn token_client(env: &Env) -> Result<token::Client<'_>, Error> {
    let token_id = storage::get_token(env)?;
    Ok(token::Client::new(env, &token_id))
}

/// Sends `amount` of the settlement token from the contract to `to`.
///
/// Holds the payout lock for the duration of the transfer so that no nested
/// call can start a second payout against the same state.
pub fn pay_out(env: &Env, to: &Address, amount: i128) -> Result<(), Error> {
    if amount <= 0 {
        return Ok(());
    }
    if storage::is_payout_locked(env) {
        return Err(Error::Reentrancy);
    }

    let client = token_client(env)?;
    let contract = env.current_contract_address();
    let available = client.balance(&contract);
    if available < amount {
        log!(env, "Insufficient custody. Required: {}, Available: {}", amount, available);
        return Err(Error::TransferFailed);
    }

    storage::set_payout_lock(env, true);
    let result = client.try_transfer(&contract, to, &amount);
    storage::set_payout_lock(env, false);

    match result {
        Ok(Ok(())) => Ok(()),
        _ => {
            log!(env, "Token transfer failed for amount: {}", amount);
            Err(Error::TransferFailed)
        }
    }
}

/// Adds a fee to the withdrawable pool and the cumulative tally.
pub fn accrue_fee(env: &Env, fee: i128) -> Result<(), Error> {
    if fee <= 0 {
        return Ok(());
    }
    storage::add_amount(env, &DataKey::FeePool, fee)?;
    storage::add_amount(env, &DataKey::TotalFeesAccrued, fee)?;
    Ok(())
}

/// Credits the earnings ledger of `account` and its lifetime earnings counter.
pub fn credit_earnings(env: &Env, account: &Address, amount: i128) -> Result<(), Error> {
    if amount <= 0 {
        return Ok(());
    }
    let balance = storage::get_earnings(env, account)
        .checked_add(amount)
        .ok_or(Error::Overflow)?;
    storage::set_earnings(env, account, balance);

    let mut profile = storage::get_profile(env, account)?;
    profile.total_earnings = profile
        .total_earnings
        .checked_add(amount)
        .ok_or(Error::Overflow)?;
    storage::set_profile(env, account, &profile);

    events::earnings_credited(env, account, amount, balance);
    Ok(())
}

/// Debits the caller's earnings ledger and transfers the amount out.
pub fn withdraw_earnings(
    env: &Env,
    caller: &Address,
    role: UserRole,
    amount: i128,
) -> Result<i128, Error> {
    access::require_not_paused(env)?;
    caller.require_auth();
    access::authorize(env, caller, role)?;

    if amount <= 0 {
        return Err(Error::InvalidInput);
    }
    let balance = storage::get_earnings(env, caller);
    if amount > balance {
        log!(env, "Insufficient earnings. Requested: {}, Balance: {}", amount, balance);
        return Err(Error::InsufficientBalance);
    }

    let remaining = balance - amount;
    storage::set_earnings(env, caller, remaining);
    pay_out(env, caller, amount)?;

    events::earnings_withdrawn(env, caller, amount, remaining);
    Ok(remaining)
}

/// Drains the fee pool to the treasury and returns the amount moved.
pub fn withdraw_platform_fees(env: &Env, admin: &Address) -> Result<i128, Error> {
    access::require_admin(env, admin)?;

    let pool = storage::read_amount(env, &DataKey::FeePool);
    if pool <= 0 {
        return Err(Error::InsufficientBalance);
    }
    let treasury = storage::get_treasury(env)?;

    storage::write_amount(env, &DataKey::FeePool, 0);
    pay_out(env, &treasury, pool)?;

    events::platform_fees_withdrawn(env, &treasury, pool);
    Ok(pool)
}

/// Moves custodial tokens out while the contract is paused.
pub fn emergency_withdraw(env: &Env, admin: &Address, to: &Address, amount: i128) -> Result<(), Error> {
    access::require_admin(env, admin)?;
    if !storage::is_paused(env) {
        return Err(Error::NotPaused);
    }
    if amount <= 0 {
        return Err(Error::InvalidInput);
    }

    pay_out(env, to, amount)?;
    events::emergency_withdrawal(env, admin, to, amount);
    Ok(())
}

/// Deposits tokens that back collection rewards and earnings withdrawals.
pub fn fund_reward_pool(env: &Env, from: &Address, amount: i128) -> Result<(), Error> {
    access::require_not_paused(env)?;
    from.require_auth();
    access::check_standing(env, from)?;

    if amount <= 0 {
        return Err(Error::InvalidInput);
    }

    let client = token_client(env)?;
    let balance = client.balance(from);
    if balance < amount {
        log!(env, "Insufficient balance. Required: {}, Available: {}", amount, balance);
        return Err(Error::InsufficientBalance);
    }

    match client.try_transfer(from, &env.current_contract_address(), &amount) {
        Ok(Ok(())) => {}
        _ => {
            log!(env, "Reward pool deposit failed for amount: {}", amount);
            return Err(Error::TransferFailed);
        }
    }

    events::reward_pool_funded(env, from, amount);
    Ok(())
}

/// Pulls a marketplace purchase from the buyer's allowance: `net` straight to
/// the seller and `fee` into contract custody.
pub fn settle_purchase(
    env: &Env,
    buyer: &Address,
    seller: &Address,
    net: i128,
    fee: i128,
) -> Result<(), Error> {
    let client = token_client(env)?;
    let contract = env.current_contract_address();

    let total = net.checked_add(fee).ok_or(Error::Overflow)?;
    let balance = client.balance(buyer);
    if balance < total {
        log!(env, "Insufficient balance. Required: {}, Available: {}", total, balance);
        return Err(Error::InsufficientBalance);
    }
    let allowance = client.allowance(buyer, &contract);
    if allowance < total {
        log!(env, "Insufficient allowance. Required: {}, Approved: {}", total, allowance);
        return Err(Error::InsufficientAllowance);
    }
    if storage::is_payout_locked(env) {
        return Err(Error::Reentrancy);
    }

    storage::set_payout_lock(env, true);
    let mut result = pull(&client, &contract, buyer, seller, net);
    if result.is_ok() {
        result = pull(&client, &contract, buyer, &contract, fee);
    }
    storage::set_payout_lock(env, false);

    if result.is_err() {
        log!(env, "Purchase settlement failed for amount: {}", total);
    }
    result
}

fn pull(
    client: &token::Client,
    spender: &Address,
    from: &Address,
    to: &Address,
    amount: i128,
) -> Result<(), Error> {
    if amount <= 0 {
        return Ok(());
    }
    match client.try_transfer_from(spender, from, to, &amount) {
        Ok(Ok(())) => Ok(()),
        _ => Err(Error::TransferFailed),
    }
}
