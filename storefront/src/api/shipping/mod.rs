//! Shipping API
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /calculate-shipping | POST | Shipping options for an address change |
//! | /shipping/quote | GET | Free-shipping progress for the cart page |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/calculate-shipping", post(handler::calculate))
        .route("/shipping/quote", get(handler::quote))
}
