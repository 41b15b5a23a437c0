//! Fixed-point reward, fee and carbon-offset arithmetic.
//!
//! All values are non-negative integers. Multipliers are basis points
//! (10_000 = 1.0x) and every division rounds toward zero, which for the
//! non-negative domain used here is floor. Overflow is reported, never wrapped
//! or saturated.

use crate::config::BASIS_POINTS;
use crate::types::Error;

const BPS: i128 = BASIS_POINTS as i128;

/// Gross reward, platform fee and the net amount paid out.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Payout {
    pub gross: i128,
    pub fee: i128,
    pub net: i128,
}

/// `floor(a * b / denominator)` with checked intermediate multiplication.
pub fn mul_div_floor(a: i128, b: i128, denominator: i128) -> Result<i128, Error> {
    if a < 0 || b < 0 || denominator <= 0 {
        return Err(Error::InvalidInput);
    }
    let product = a.checked_mul(b).ok_or(Error::Overflow)?;
    Ok(product / denominator)
}

/// `floor(amount * bps / 10_000)`
pub fn apply_bps(amount: i128, bps: u32) -> Result<i128, Error> {
    mul_div_floor(amount, bps as i128, BPS)
}

/// Splits `gross` into the platform fee and the remainder.
pub fn split_fee(gross: i128, fee_bps: u32) -> Result<Payout, Error> {
    let fee = apply_bps(gross, fee_bps)?;
    let net = gross.checked_sub(fee).ok_or(Error::Overflow)?;
    Ok(Payout { gross, fee, net })
}

/// Gross collection reward: `floor(weight * rate * quality_bps / 10_000)`.
pub fn gross_reward(weight: u32, rate: i128, quality_bps: u32) -> Result<i128, Error> {
    let base = (weight as i128).checked_mul(rate).ok_or(Error::Overflow)?;
    apply_bps(base, quality_bps)
}

/// Collection reward with the platform fee deducted.
pub fn collection_reward(
    weight: u32,
    rate: i128,
    quality_bps: u32,
    fee_bps: u32,
) -> Result<Payout, Error> {
    split_fee(gross_reward(weight, rate, quality_bps)?, fee_bps)
}

/// `floor(amount * stream_bps * quality_bps / 10_000^2)`
pub fn carbon_offset(amount: u64, stream_bps: u32, quality_bps: u32) -> Result<i128, Error> {
    let scaled = (amount as i128)
        .checked_mul(stream_bps as i128)
        .ok_or(Error::Overflow)?;
    mul_div_floor(scaled, quality_bps as i128, BPS * BPS)
}

/// Bonus owed when the reward at the final quality multiplier beats the gross
/// reward already paid. Returns a zero payout when it does not.
pub fn quality_bonus(
    weight: u32,
    rate: i128,
    paid_gross: i128,
    final_bps: u32,
    fee_bps: u32,
) -> Result<Payout, Error> {
    let upgraded = gross_reward(weight, rate, final_bps)?;
    if upgraded <= paid_gross {
        return Ok(Payout { gross: 0, fee: 0, net: 0 });
    }
    split_fee(upgraded - paid_gross, fee_bps)
}

/// `units * price`, the total of a marketplace purchase.
pub fn total_price(units: u64, price_per_unit: i128) -> Result<i128, Error> {
    (units as i128)
        .checked_mul(price_per_unit)
        .ok_or(Error::Overflow)
}
