//! Boundary normalization
//!
//! Wire addresses become [`Destination`]s before they reach the resolver,
//! which matches country codes exactly and never normalizes.

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::ShippingAddress;

/// Normalized shipping destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    /// Uppercase ISO 3166-1 alpha-2 code
    pub country: String,
    /// Trimmed region, `None` when absent or blank
    pub region: Option<String>,
}

impl Destination {
    /// Normalize a wire address; `field` prefixes error details (`shipping`, `address`)
    pub fn from_address(address: &ShippingAddress, field: &str) -> AppResult<Self> {
        Ok(Self {
            country: normalize_country(&address.country, field)?,
            region: normalize_region(address.region.as_deref()),
        })
    }

    pub fn from_parts(country: &str, region: Option<&str>, field: &str) -> AppResult<Self> {
        Ok(Self {
            country: normalize_country(country, field)?,
            region: normalize_region(region),
        })
    }

    #[inline]
    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }
}

/// Trim and uppercase; must be exactly two ASCII letters
pub fn normalize_country(raw: &str, field: &str) -> AppResult<String> {
    let code = raw.trim();
    if code.is_empty() {
        return Err(AppError::required(format!("{field}.country")));
    }
    if code.len() != 2 || !code.bytes().all(|b| b.is_ascii_alphabetic()) {
        return Err(
            AppError::with_message(
                ErrorCode::InvalidCountryCode,
                format!("Invalid country code: {code}"),
            )
            .with_detail("field", format!("{field}.country")),
        );
    }
    Ok(code.to_ascii_uppercase())
}

pub fn normalize_region(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string)
}
