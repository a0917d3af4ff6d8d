//! Checkout API Handlers

use axum::{Json, extract::State};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    CheckoutSessionRequest, CheckoutSessionResponse, PaymentSessionResponse, ShippingFeeResponse,
};

use crate::api::convert::Destination;
use crate::checkout::{CheckoutError, CheckoutQuote, CheckoutTotals};
use crate::core::ServerState;
use crate::money::to_f64;
use crate::payment::{PaymentIntentRequest, is_valid_intent_id};

/// POST /create-checkout-session
///
/// Two branches share this endpoint:
/// - address step (shipping, no intent, no email): returns the shipping fee
/// - pay step: prices the cart, applies the coupon and creates or updates
///   the payment intent (cancelling it instead when nothing is left to pay)
pub async fn create_session(
    State(state): State<ServerState>,
    Json(req): Json<CheckoutSessionRequest>,
) -> AppResult<Json<CheckoutSessionResponse>> {
    if req.is_shipping_quote() {
        return shipping_fee(&state, &req).map(Json);
    }
    payment_session(&state, &req).await.map(Json)
}

fn shipping_fee(
    state: &ServerState,
    req: &CheckoutSessionRequest,
) -> AppResult<CheckoutSessionResponse> {
    let address = req
        .shipping
        .as_ref()
        .ok_or_else(|| AppError::new(ErrorCode::ShippingAddressRequired))?;
    let dest = Destination::from_address(address, "shipping")?;
    let quote = CheckoutQuote::build(&state.shipping, &req.items, &dest.country, dest.region())?;

    Ok(CheckoutSessionResponse::ShippingOnly(ShippingFeeResponse {
        shipping_fee: to_f64(quote.shipping.fee),
        currency: quote.shipping.currency,
    }))
}

async fn payment_session(
    state: &ServerState,
    req: &CheckoutSessionRequest,
) -> AppResult<CheckoutSessionResponse> {
    // Nothing reaches the processor for an empty cart
    if req.items.is_empty() {
        return Err(CheckoutError::EmptyCart.into());
    }
    let intent_id = req.payment_intent_id.as_deref();
    if let Some(id) = intent_id
        && !is_valid_intent_id(id)
    {
        return Err(AppError::invalid_request("Malformed payment intent id")
            .with_detail("field", "paymentIntentId"));
    }
    let address = req
        .shipping
        .as_ref()
        .ok_or_else(|| AppError::new(ErrorCode::ShippingAddressRequired))?;
    let dest = Destination::from_address(address, "shipping")?;
    let quote = CheckoutQuote::build(&state.shipping, &req.items, &dest.country, dest.region())?;

    let coupon_code = req
        .coupon_code
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty());
    let discount = match coupon_code {
        Some(code) => {
            let coupon = state.coupons.find(code).await.ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::CouponInvalid,
                    format!("Coupon {code} is not valid"),
                )
                .with_detail("couponCode", code)
            })?;
            coupon.discount_minor(quote.subtotal_minor())
        }
        None => 0,
    };

    let totals = quote.totals(discount);
    let currency = quote.shipping.currency.clone();

    if totals.total == 0 {
        tracing::info!(
            subtotal = totals.subtotal,
            discount = totals.discount,
            intent_id = ?intent_id,
            "Order fully discounted, no payment intent needed"
        );
        // The old client secret must not stay confirmable at the old amount
        if let Some(id) = intent_id {
            state.payments.cancel_intent(id).await?;
        }
        return Ok(session_response(totals, currency, None, None));
    }

    let intent_request = PaymentIntentRequest {
        amount: totals.total,
        currency: currency.clone(),
        receipt_email: req
            .email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(str::to_string),
        metadata: intent_metadata(&totals, &dest, coupon_code),
    };

    let intent = match intent_id {
        Some(intent_id) => {
            state
                .payments
                .update_intent(intent_id, &intent_request)
                .await?
        }
        None => state.payments.create_intent(&intent_request).await?,
    };

    Ok(session_response(
        totals,
        currency,
        Some(intent.client_secret),
        Some(intent.id),
    ))
}

fn intent_metadata(
    totals: &CheckoutTotals,
    dest: &Destination,
    coupon_code: Option<&str>,
) -> Vec<(String, String)> {
    let mut metadata = vec![
        ("subtotal".to_string(), totals.subtotal.to_string()),
        ("shipping_fee".to_string(), totals.shipping_fee.to_string()),
        ("discount".to_string(), totals.discount.to_string()),
        ("shipping_country".to_string(), dest.country.clone()),
    ];
    if let Some(region) = dest.region() {
        metadata.push(("shipping_region".to_string(), region.to_string()));
    }
    if let Some(code) = coupon_code {
        metadata.push(("coupon_code".to_string(), code.to_ascii_uppercase()));
    }
    metadata
}

fn session_response(
    totals: CheckoutTotals,
    currency: String,
    client_secret: Option<String>,
    payment_intent_id: Option<String>,
) -> CheckoutSessionResponse {
    CheckoutSessionResponse::Payment(PaymentSessionResponse {
        client_secret,
        payment_intent_id,
        amount: totals.total,
        subtotal: totals.subtotal,
        shipping_fee: totals.shipping_fee,
        discount: totals.discount,
        currency,
    })
}
