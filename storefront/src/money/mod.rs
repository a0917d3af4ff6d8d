//! Money calculation utilities using rust_decimal for precision
//!
//! All arithmetic happens on `Decimal`. `f64` only appears at the JSON
//! boundary, and charge amounts leave the service as integer minor units.

use rust_decimal::prelude::*;
use shared::error::{AppError, ErrorCode};

/// Rounding for major-unit amounts (2 decimal places, half away from zero)
const DECIMAL_PLACES: u32 = 2;

/// Minor units per major unit (cents per dollar/euro/pound)
const MINOR_PER_MAJOR: Decimal = Decimal::ONE_HUNDRED;

/// Maximum allowed unit price (1,000,000 in major units)
pub const MAX_PRICE: f64 = 1_000_000.0;
/// Maximum allowed quantity per line
pub const MAX_QUANTITY: i32 = 9999;

/// Error returned when a boundary amount cannot be used in a calculation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MoneyError {
    #[error("{0} must be a finite number")]
    NotFinite(&'static str),
    #[error("{0} must be non-negative")]
    Negative(&'static str),
    #[error("{field} exceeds maximum allowed ({max})")]
    TooLarge { field: &'static str, max: f64 },
}

impl From<MoneyError> for AppError {
    fn from(err: MoneyError) -> Self {
        let field = match &err {
            MoneyError::NotFinite(f) | MoneyError::Negative(f) => *f,
            MoneyError::TooLarge { field, .. } => *field,
        };
        AppError::with_message(ErrorCode::InvalidAmount, err.to_string()).with_detail("field", field)
    }
}

/// Validate that a f64 value is finite (not NaN, not Infinity)
#[inline]
pub fn require_finite(value: f64, field: &'static str) -> Result<(), MoneyError> {
    if !value.is_finite() {
        return Err(MoneyError::NotFinite(field));
    }
    Ok(())
}

/// Parse a boundary amount in major units: finite, non-negative, bounded
pub fn parse_major(value: f64, field: &'static str) -> Result<Decimal, MoneyError> {
    require_finite(value, field)?;
    if value < 0.0 {
        return Err(MoneyError::Negative(field));
    }
    if value > MAX_PRICE * f64::from(MAX_QUANTITY) {
        return Err(MoneyError::TooLarge {
            field,
            max: MAX_PRICE * f64::from(MAX_QUANTITY),
        });
    }
    Ok(to_decimal(value))
}

/// Convert f64 to Decimal for calculation
///
/// Input values should be pre-validated via `require_finite()` at the boundary.
/// If NaN/Infinity somehow reaches here, logs an error and returns ZERO.
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::error!(value = ?value, "Non-finite f64 in monetary calculation, defaulting to zero");
        Decimal::ZERO
    })
}

/// Convert Decimal back to f64 for JSON, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_else(|| {
            tracing::error!(value = %value, "Decimal not representable as f64, defaulting to zero");
            0.0
        })
}

/// Major units to integer minor units: `round(amount * 100)`, ties away from zero
pub fn to_minor_units(amount: Decimal) -> i64 {
    let minor = (amount * MINOR_PER_MAJOR)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    minor.to_i64().unwrap_or_else(|| {
        tracing::error!(amount = %amount, "Amount overflows i64 minor units, saturating");
        if minor.is_sign_negative() {
            i64::MIN
        } else {
            i64::MAX
        }
    })
}

/// Integer minor units back to major units
#[inline]
pub fn from_minor_units(minor: i64) -> Decimal {
    Decimal::from(minor) / MINOR_PER_MAJOR
}
