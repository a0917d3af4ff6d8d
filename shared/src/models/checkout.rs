//! Checkout wire types

use serde::{Deserialize, Serialize};

use super::shipping::ShippingAddress;

/// Cart line as sent by the storefront
///
/// `price` is per unit, in major currency units.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub price: f64,
    pub quantity: i32,
}

/// POST /create-checkout-session body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSessionRequest {
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub shipping: Option<ShippingAddress>,
    #[serde(default)]
    pub coupon_code: Option<String>,
    /// Existing payment intent to update instead of creating a new one
    #[serde(default)]
    pub payment_intent_id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl CheckoutSessionRequest {
    /// Shipping-only branch: destination known, no intent yet and the
    /// customer has not reached the pay step (no receipt email)
    pub fn is_shipping_quote(&self) -> bool {
        self.shipping.is_some()
            && self.payment_intent_id.is_none()
            && self.email.as_deref().is_none_or(|e| e.trim().is_empty())
    }
}

/// Shipping-only response (fee in major units)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShippingFeeResponse {
    pub shipping_fee: f64,
    pub currency: String,
}

/// Payment branch response; every amount is in minor units
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSessionResponse {
    /// None when the order is fully discounted and no charge is needed
    pub client_secret: Option<String>,
    pub payment_intent_id: Option<String>,
    pub amount: i64,
    pub subtotal: i64,
    pub shipping_fee: i64,
    pub discount: i64,
    pub currency: String,
}

/// Either branch of POST /create-checkout-session
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum CheckoutSessionResponse {
    ShippingOnly(ShippingFeeResponse),
    Payment(PaymentSessionResponse),
}
