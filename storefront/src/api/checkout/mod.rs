//! Checkout API
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /create-checkout-session | POST | Shipping fee quote or payment intent |

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/create-checkout-session", post(handler::create_session))
}
