//! Shipping wire types
//!
//! Request/response bodies of the shipping boundaries. Amounts named
//! `amount`/`total` are integer minor units (cents); `fee`, `freeThreshold`
//! and friends on the quote are decimal major units.

use serde::{Deserialize, Serialize};

use super::checkout::LineItem;

/// Identifier of the only shipping option the storefront offers
pub const STANDARD_SHIPPING_ID: &str = "standard";
/// Label shown for the standard option
pub const STANDARD_SHIPPING_LABEL: &str = "Standard Shipping";
/// Detail shown when the computed fee is zero
pub const FREE_SHIPPING_DETAIL: &str = "Free Shipping";
/// Detail shown when a fee applies
pub const STANDARD_TRANSIT_DETAIL: &str = "5-10 business days";

/// Shipping destination
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    /// ISO 3166-1 alpha-2 country code
    pub country: String,
    /// Region / subdivision name (e.g. "Canary Islands")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

/// POST /calculate-shipping body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateShippingRequest {
    pub address: ShippingAddress,
    #[serde(default)]
    pub items: Vec<LineItem>,
    /// Cart subtotal in minor units
    pub amount: i64,
}

/// One selectable shipping option
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ShippingOption {
    pub id: String,
    pub label: String,
    pub detail: String,
    /// Fee in minor units
    pub amount: i64,
}

impl ShippingOption {
    /// The standard option for a fee already converted to minor units
    pub fn standard(fee_minor: i64) -> Self {
        let detail = if fee_minor == 0 {
            FREE_SHIPPING_DETAIL
        } else {
            STANDARD_TRANSIT_DETAIL
        };
        Self {
            id: STANDARD_SHIPPING_ID.to_string(),
            label: STANDARD_SHIPPING_LABEL.to_string(),
            detail: detail.to_string(),
            amount: fee_minor,
        }
    }
}

/// POST /calculate-shipping response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateShippingResponse {
    pub shipping_options: Vec<ShippingOption>,
    /// Subtotal plus shipping, minor units
    pub total: i64,
    pub currency: String,
}

/// GET /shipping/quote query string
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingQuoteQuery {
    pub country: String,
    #[serde(default)]
    pub region: Option<String>,
    /// Cart subtotal in major units
    pub subtotal: f64,
}

/// Free-shipping progress for the cart page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShippingQuote {
    pub fee: f64,
    pub currency: String,
    pub free_threshold: f64,
    /// How much more the customer must add to qualify (0 once qualified)
    pub remaining_for_free_shipping: f64,
    pub free_shipping: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_option_detail() {
        let free = ShippingOption::standard(0);
        assert_eq!(free.id, "standard");
        assert_eq!(free.detail, "Free Shipping");

        let paid = ShippingOption::standard(900);
        assert_eq!(paid.detail, "5-10 business days");
        assert_eq!(paid.amount, 900);
    }

    #[test]
    fn test_request_accepts_missing_region_and_items() {
        let json = r#"{"address":{"country":"US"},"amount":5000}"#;
        let req: CalculateShippingRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.address.region, None);
        assert!(req.items.is_empty());
        assert_eq!(req.amount, 5000);
    }

    #[test]
    fn test_response_uses_camel_case() {
        let resp = CalculateShippingResponse {
            shipping_options: vec![ShippingOption::standard(0)],
            total: 15000,
            currency: "USD".into(),
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["shippingOptions"][0]["label"], "Standard Shipping");
        assert_eq!(json["total"], 15000);
    }
}
