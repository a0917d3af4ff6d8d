//! Shipping API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use rust_decimal::Decimal;
use shared::error::AppResult;
use shared::models::{
    CalculateShippingRequest, CalculateShippingResponse, ShippingOption, ShippingQuote,
    ShippingQuoteQuery,
};

use crate::api::convert::Destination;
use crate::core::ServerState;
use crate::money::{MoneyError, from_minor_units, parse_major, to_f64, to_minor_units};

/// POST /calculate-shipping - recompute shipping after an address change
///
/// `amount` is the authoritative subtotal in minor units; `items` is
/// accepted for compatibility but not re-priced here.
pub async fn calculate(
    State(state): State<ServerState>,
    Json(req): Json<CalculateShippingRequest>,
) -> AppResult<Json<CalculateShippingResponse>> {
    if req.amount < 0 {
        return Err(MoneyError::Negative("amount").into());
    }
    let dest = Destination::from_address(&req.address, "address")?;

    let resolved = state
        .shipping
        .resolve(&dest.country, dest.region(), from_minor_units(req.amount));
    let fee_minor = to_minor_units(resolved.fee);

    tracing::debug!(
        country = %dest.country,
        region = ?dest.region,
        amount = req.amount,
        fee_minor,
        currency = %resolved.currency,
        "Shipping recalculated"
    );

    Ok(Json(CalculateShippingResponse {
        shipping_options: vec![ShippingOption::standard(fee_minor)],
        total: req.amount.saturating_add(fee_minor),
        currency: resolved.currency,
    }))
}

/// GET /shipping/quote - fee and distance to free shipping
pub async fn quote(
    State(state): State<ServerState>,
    Query(query): Query<ShippingQuoteQuery>,
) -> AppResult<Json<ShippingQuote>> {
    let subtotal: Decimal = parse_major(query.subtotal, "subtotal")?;
    let dest = Destination::from_parts(&query.country, query.region.as_deref(), "query")?;

    let resolved = state
        .shipping
        .resolve(&dest.country, dest.region(), subtotal);

    Ok(Json(ShippingQuote {
        fee: to_f64(resolved.fee),
        free_threshold: to_f64(resolved.free_threshold),
        remaining_for_free_shipping: to_f64(resolved.remaining_for_free(subtotal)),
        free_shipping: resolved.is_free(),
        currency: resolved.currency,
    }))
}
