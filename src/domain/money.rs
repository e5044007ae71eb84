//! Collateral unit conversion.
//!
//! Collateral moves on-chain as integer base units (USDC: 6 decimals) while
//! pricing and allocation work in whole currency units.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

use super::error::DomainError;

/// Decimal places of the collateral token.
pub const COLLATERAL_DECIMALS: u32 = 6;

fn scale(decimals: u32) -> Decimal {
    Decimal::from(10u64.pow(decimals))
}

/// Convert whole currency units to base units, truncating dust.
///
/// # Errors
///
/// Returns an error for negative, non-finite or oversized amounts.
pub fn to_base_units(amount: f64, decimals: u32) -> Result<u128, DomainError> {
    let unrepresentable = || DomainError::UnrepresentableAmount {
        amount: amount.to_string(),
    };
    if !amount.is_finite() || amount < 0.0 {
        return Err(unrepresentable());
    }
    let value = Decimal::try_from(amount).map_err(|_| unrepresentable())?;
    (value * scale(decimals))
        .trunc()
        .to_u128()
        .ok_or_else(unrepresentable)
}

/// Convert base units to whole currency units.
#[must_use]
pub fn from_base_units(units: u128, decimals: u32) -> f64 {
    Decimal::from_u128(units)
        .and_then(|d| d.checked_div(scale(decimals)))
        .and_then(|d| d.to_f64())
        .unwrap_or(units as f64 / 10f64.powi(decimals as i32))
}

/// Convert signed base units (as stored by the pool view) to whole units.
#[must_use]
pub fn from_signed_base_units(units: i64, decimals: u32) -> f64 {
    (Decimal::from(units) / scale(decimals)).to_f64().unwrap_or(0.0)
}
