//! Smallest-unit arithmetic for on-chain quantities.
//!
//! Everything that touches the chain is a `U256` in smallest units. User input is
//! parsed with `rust_decimal` straight into wei, slippage is applied with a `U512`
//! intermediate, and floats only appear as the last step for display.

use crate::errors::{BlockchainError, EngineError};
use ethers::types::{Address, U256, U512};
use ethers::utils::format_units;
use rust_decimal::Decimal;
use std::str::FromStr;

/// The native asset (and every V2 LP token) uses 18 decimals.
pub const NATIVE_DECIMALS: u32 = 18;
pub const BPS_DENOMINATOR: u64 = 10_000;
/// `10^77` is the largest power of ten a `U256` holds.
pub const MAX_TOKEN_DECIMALS: u8 = 77;

/// Parses a human decimal amount of the native asset (e.g. `"0.25"`) into wei.
///
/// Rejects empty, non-numeric, zero, negative and sub-wei input.
pub fn parse_native_amount(input: &str) -> Result<U256, EngineError> {
    let invalid = |reason: &str| EngineError::InvalidAmount {
        input: input.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(invalid("amount is empty"));
    }
    let value = Decimal::from_str(trimmed).map_err(|_| invalid("not a decimal number"))?;
    if value.is_sign_negative() || value.is_zero() {
        return Err(invalid("amount must be greater than 0"));
    }
    let scale = value.scale();
    if scale > NATIVE_DECIMALS {
        return Err(invalid("more than 18 fractional digits"));
    }

    let mantissa = u128::try_from(value.mantissa()).map_err(|_| invalid("amount out of range"))?;
    let factor = U256::exp10((NATIVE_DECIMALS - scale) as usize);
    U256::from(mantissa)
        .checked_mul(factor)
        .ok_or_else(|| invalid("amount out of range"))
}

/// Parses a `0x`-prefixed (or bare) 40-digit hex address. Checksum casing is
/// not enforced; the zero address is rejected.
pub fn parse_address(input: &str) -> Result<Address, EngineError> {
    let invalid = |reason: &str| EngineError::InvalidAddress {
        input: input.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = input.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    if digits.len() != 40 {
        return Err(invalid("expected 40 hex digits"));
    }
    let bytes = hex::decode(digits).map_err(|_| invalid("not hexadecimal"))?;
    let address = Address::from_slice(&bytes);
    if address.is_zero() {
        return Err(invalid("zero address"));
    }
    Ok(address)
}

/// `quoted × (10_000 − slippage_bps) / 10_000`, rounded down.
pub fn apply_slippage(quoted: U256, slippage_bps: u16) -> Result<U256, EngineError> {
    if u64::from(slippage_bps) > BPS_DENOMINATOR {
        return Err(EngineError::Config(format!(
            "slippage of {} bps exceeds 100%",
            slippage_bps
        )));
    }
    let keep = U256::from(BPS_DENOMINATOR - u64::from(slippage_bps));
    let scaled = quoted.full_mul(keep) / U512::from(BPS_DENOMINATOR);
    // scaled <= quoted, so this never truncates
    U256::try_from(scaled)
        .map_err(|_| EngineError::Config("slippage result does not fit in 256 bits".to_string()))
}

/// Decimal string for a raw amount, e.g. `1_000_000_000` at 6 decimals → `"1000.000000"`.
pub fn format_amount(raw: U256, decimals: u32) -> Result<String, BlockchainError> {
    format_units(raw, decimals).map_err(|e| {
        BlockchainError::DataEncoding(format!("cannot format amount with {} decimals: {}", decimals, e))
    })
}

pub fn to_display_f64(formatted: &str) -> Result<f64, BlockchainError> {
    formatted
        .parse::<f64>()
        .map_err(|e| BlockchainError::DataEncoding(format!("'{}' is not a number: {}", formatted, e)))
}
