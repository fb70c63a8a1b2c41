//! Conversion between user-entered decimal strings and integer base units.
//!
//! Scaling is done by `alloy_primitives::utils`. This module only adds the
//! stricter input checks a withdrawal needs: no signs, exponents or
//! separators, and no silent truncation of precision the token cannot hold.

use alloy_primitives::utils::{ParseUnits, Unit};
use alloy_primitives::U256;

use crate::error::EthError;

/// Largest decimal count whose scale factor (`10^decimals`) fits in a `U256`.
pub const MAX_DECIMALS: u8 = 77;

fn unit(decimals: u8) -> Result<Unit, EthError> {
    Unit::new(decimals).ok_or_else(|| {
        EthError::InvalidAmount(format!(
            "{decimals} decimals exceeds the maximum of {MAX_DECIMALS}"
        ))
    })
}

/// Parses a decimal string such as `"12.345"` into base units scaled by
/// `10^decimals`.
///
/// Accepted forms are `"1"`, `"1.5"`, `".5"` and `"1."`, with optional
/// surrounding whitespace. Signs, exponents, separators and more fractional
/// digits than `decimals` are rejected (trailing zeros past the precision are
/// allowed).
pub fn parse_units(amount: &str, decimals: u8) -> Result<U256, EthError> {
    let unit = unit(decimals)?;

    let amount = amount.trim();
    let (int_part, frac_part) = amount.split_once('.').unwrap_or((amount, ""));

    if int_part.is_empty() && frac_part.is_empty() {
        return Err(EthError::InvalidAmount(format!("no digits in {amount:?}")));
    }
    if !int_part.bytes().all(|b| b.is_ascii_digit()) || !frac_part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(EthError::InvalidAmount(format!("{amount:?} is not a decimal number")));
    }

    let decimals = decimals as usize;
    let frac_part = if frac_part.len() > decimals {
        let (kept, dropped) = frac_part.split_at(decimals);
        if dropped.bytes().any(|b| b != b'0') {
            return Err(EthError::InvalidAmount(format!(
                "{amount:?} has more than {decimals} decimal places"
            )));
        }
        kept
    } else {
        frac_part
    };

    let int_part = if int_part.is_empty() { "0" } else { int_part };
    let normalized = if frac_part.is_empty() {
        int_part.to_string()
    } else {
        format!("{int_part}.{frac_part}")
    };

    let parsed = ParseUnits::parse_units(&normalized, unit)
        .map_err(|e| EthError::InvalidAmount(format!("{amount:?}: {e}")))?;
    Ok(parsed.get_absolute())
}

/// Formats base units back into a decimal string, trimming trailing
/// fractional zeros (`1_500_000` with 6 decimals becomes `"1.5"`).
///
/// Decimal counts above [`MAX_DECIMALS`] print the raw base-unit integer.
pub fn format_units(value: U256, decimals: u8) -> String {
    let Ok(unit) = unit(decimals) else {
        return value.to_string();
    };

    let formatted = ParseUnits::U256(value).format_units(unit);
    match formatted.split_once('.') {
        Some((int_part, frac_part)) => {
            let frac_part = frac_part.trim_end_matches('0');
            if frac_part.is_empty() {
                int_part.to_string()
            } else {
                format!("{int_part}.{frac_part}")
            }
        }
        None => formatted,
    }
}
