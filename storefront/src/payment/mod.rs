//! Payment processor seam
//!
//! Checkout talks to the processor only through [`PaymentGateway`]:
//! create a payment intent for an amount, or update an existing one when
//! the cart or destination changed. [`StripeGateway`] is the production
//! implementation.

mod stripe;

use async_trait::async_trait;
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

pub use stripe::{DEFAULT_API_BASE, StripeGateway};

/// Prefix of every payment intent id
const INTENT_ID_PREFIX: &str = "pi_";

/// `pi_` followed by at least one ASCII alphanumeric, nothing else
///
/// Intent ids end up in request paths, so anything else is refused.
pub fn is_valid_intent_id(id: &str) -> bool {
    id.strip_prefix(INTENT_ID_PREFIX)
        .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_alphanumeric()))
}

/// Amount to collect, in minor units of `currency`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentIntentRequest {
    pub amount: i64,
    /// ISO currency code (any case)
    pub currency: String,
    pub receipt_email: Option<String>,
    pub metadata: Vec<(String, String)>,
}

/// Processor-side payment intent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: String,
    pub amount: i64,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// Transport failure or 5xx
    #[error("payment processor unavailable: {0}")]
    Unavailable(String),
    /// Processor answered with an error
    #[error("payment processor rejected the request: {0}")]
    Rejected(String),
    /// Processor answered with something we cannot read
    #[error("unexpected payment processor response: {0}")]
    InvalidResponse(String),
}

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        match &err {
            GatewayError::Unavailable(_) => {
                AppError::with_message(ErrorCode::PaymentGatewayUnavailable, err.to_string())
            }
            GatewayError::Rejected(_) => AppError::payment_failed(err.to_string()),
            GatewayError::InvalidResponse(_) => AppError::internal(err.to_string()),
        }
    }
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_intent(&self, request: &PaymentIntentRequest)
    -> Result<PaymentIntent, GatewayError>;

    async fn update_intent(
        &self,
        intent_id: &str,
        request: &PaymentIntentRequest,
    ) -> Result<PaymentIntent, GatewayError>;

    /// Cancel an intent that will never be charged
    async fn cancel_intent(&self, intent_id: &str) -> Result<(), GatewayError>;
}
