//! Decimal to base-unit conversion

use crate::{
    error::{BidError, BidResult},
    state::Bid,
};

/// Convert a user-entered amount into base units and add the rent-exempt reserve.
///
/// Computes `round(amount * 10^decimals) + reserve`. Negative, non-finite and
/// out-of-range amounts are rejected before any instruction is built.
pub fn normalize_amount(amount: f64, decimals: u8, reserve: u64) -> BidResult<Bid> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(BidError::InvalidAmount(amount));
    }

    let scaled = (amount * 10f64.powi(i32::from(decimals))).round();
    // u64::MAX is not representable, so compare against 2^64 exclusively
    if !scaled.is_finite() || scaled >= u64::MAX as f64 {
        return Err(BidError::InvalidAmount(amount));
    }

    let lamports = (scaled as u64)
        .checked_add(reserve)
        .ok_or(BidError::MathOverflow)?;

    Ok(Bid::new(lamports, reserve))
}
