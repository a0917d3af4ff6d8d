//! Checkout total computation
//!
//! Turns a cart, a resolved shipping fee and an optional discount into the
//! amount submitted to the payment processor, in integer minor units.

mod totals;

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

pub use totals::{
    CartLine, CheckoutQuote, CheckoutTotals, compute_totals, subtotal, validate_cart,
    validate_line_item,
};

/// Checkout rejections
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("Cart is empty")]
    EmptyCart,
    #[error("Item #{index}: {reason}")]
    InvalidLineItem { index: usize, reason: String },
}

impl From<CheckoutError> for AppError {
    fn from(err: CheckoutError) -> Self {
        match &err {
            CheckoutError::EmptyCart => AppError::new(ErrorCode::EmptyCart),
            CheckoutError::InvalidLineItem { index, .. } => {
                AppError::with_message(ErrorCode::InvalidLineItem, err.to_string())
                    .with_detail("index", *index)
            }
        }
    }
}
