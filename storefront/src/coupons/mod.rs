//! Coupon lookup
//!
//! The storefront resolves coupon codes to discounts through
//! [`CouponLookup`]. [`StaticCoupons`] serves a fixed coupon book loaded
//! from configuration, e.g.
//!
//! ```json
//! [{"code": "WELCOME10", "percentOff": 10}, {"code": "FIVEOFF", "amountOff": 500}]
//! ```

use std::collections::HashMap;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use crate::money::{from_minor_units, to_minor_units};

/// Discount granted by a coupon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Coupon {
    /// Percentage of the item subtotal (0-100)
    PercentOff(u8),
    /// Fixed amount in minor units
    AmountOff(i64),
}

impl Coupon {
    /// Discount in minor units for an item subtotal in minor units
    ///
    /// Not clamped here; checkout clamps against subtotal plus shipping.
    pub fn discount_minor(&self, subtotal_minor: i64) -> i64 {
        match *self {
            Coupon::PercentOff(percent) => to_minor_units(
                from_minor_units(subtotal_minor) * Decimal::from(percent) / Decimal::ONE_HUNDRED,
            ),
            Coupon::AmountOff(amount) => amount,
        }
    }
}

/// Source of coupon definitions
#[async_trait]
pub trait CouponLookup: Send + Sync {
    /// Look up a code; `None` when it does not exist
    async fn find(&self, code: &str) -> Option<Coupon>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CouponConfigError {
    #[error("coupon list is not valid JSON: {0}")]
    Parse(String),
    #[error("coupon {0:?}: code must not be empty")]
    EmptyCode(String),
    #[error("coupon {code}: percentOff must be at most 100, got {percent}")]
    PercentTooLarge { code: String, percent: u8 },
    #[error("coupon {code}: amountOff must be non-negative, got {amount}")]
    NegativeAmount { code: String, amount: i64 },
    #[error("coupon {0} is defined more than once")]
    Duplicate(String),
}

#[derive(Deserialize)]
struct CouponEntry {
    code: String,
    #[serde(flatten)]
    coupon: Coupon,
}

/// In-memory coupon book; codes are case-insensitive
#[derive(Debug, Clone, Default)]
pub struct StaticCoupons {
    coupons: HashMap<String, Coupon>,
}

impl StaticCoupons {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a JSON coupon list
    pub fn from_json(json: &str) -> Result<Self, CouponConfigError> {
        let entries: Vec<CouponEntry> =
            serde_json::from_str(json).map_err(|e| CouponConfigError::Parse(e.to_string()))?;

        let mut book = Self::new();
        for entry in entries {
            book.insert(&entry.code, entry.coupon)?;
        }
        Ok(book)
    }

    /// Add a coupon, validating it
    pub fn insert(&mut self, code: &str, coupon: Coupon) -> Result<(), CouponConfigError> {
        let key = normalize_code(code);
        if key.is_empty() {
            return Err(CouponConfigError::EmptyCode(code.to_string()));
        }
        match coupon {
            Coupon::PercentOff(percent) if percent > 100 => {
                return Err(CouponConfigError::PercentTooLarge { code: key, percent });
            }
            Coupon::AmountOff(amount) if amount < 0 => {
                return Err(CouponConfigError::NegativeAmount { code: key, amount });
            }
            _ => {}
        }
        if self.coupons.insert(key.clone(), coupon).is_some() {
            return Err(CouponConfigError::Duplicate(key));
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.coupons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coupons.is_empty()
    }
}

#[async_trait]
impl CouponLookup for StaticCoupons {
    async fn find(&self, code: &str) -> Option<Coupon> {
        self.coupons.get(&normalize_code(code)).copied()
    }
}

fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}
