use crate::types::errors::NumericError;
use crate::types::{TransactionCount, Volume};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Parses a volume cell. Empty cells are a zero amount.
pub fn parse_volume(value: &str) -> Result<Volume, NumericError> {
    let value = value.trim();

    if value.is_empty() {
        return Ok(Decimal::ZERO);
    }

    let value = value.replace(',', "");

    match Decimal::from_str(&value) {
        Ok(volume) => Ok(volume),
        //NOTE: Spreadsheet exports occasionally carry large amounts in exponent form (1.5E+7)
        Err(_) if value.contains(['e', 'E']) => Ok(Decimal::from_scientific(&value)?),
        Err(_) => Err(NumericError::InvalidFormat(format!("Value [{value}] is not a number")))
    }
}

/// Parses a transaction count cell. Accepts integral decimals such as `3.0`.
pub fn parse_count(value: &str) -> Result<TransactionCount, NumericError> {
    let value = value.trim();

    if value.is_empty() {
        return Ok(0);
    }

    if let Ok(count) = value.parse::<TransactionCount>() {
        return Ok(count);
    }

    let decimal = parse_volume(value)?;

    if !decimal.fract().is_zero() {
        return Err(NumericError::Fractional(value.to_string()));
    }

    decimal.to_i64()
        .ok_or_else(|| NumericError::InvalidFormat(format!("Count [{value}] is out of range")))
}

/// Percentage change from `previous` to `current`, undefined when `previous` is zero.
pub fn percent_change(previous: Decimal, current: Decimal) -> Option<Decimal> {
    if previous.is_zero() {
        return None;
    }

    current.checked_sub(previous)?
        .checked_div(previous)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
}

/// Sums volumes, clamping at the bounds of `Decimal` instead of overflowing.
pub fn sum_volumes<I>(values: I) -> Volume
where
    I: IntoIterator<Item = Volume>
{
    values.into_iter().fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Sums counts, clamping at the bounds of `i64` instead of wrapping.
pub fn sum_counts<I>(values: I) -> TransactionCount
where
    I: IntoIterator<Item = TransactionCount>
{
    values.into_iter().fold(0, TransactionCount::saturating_add)
}

/// Whether a sum has been clamped at the edge of the representable range.
pub fn is_clamped(volume: Volume) -> bool {
    volume == Decimal::MAX || volume == Decimal::MIN
}

/// Share of `part` in `total` as a percentage, undefined when `total` is zero.
pub fn percent_share(part: Decimal, total: Decimal) -> Option<Decimal> {
    if total.is_zero() {
        return None;
    }

    part.checked_div(total)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
}

/// Renders a spreadsheet float the way a month or id column expects it: integral values lose the `.0`.
pub fn format_float_cell(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
