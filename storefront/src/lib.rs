//! Storefront shipping and checkout service
//!
//! # Architecture
//!
//! - **Shipping** (`shipping`): ordered rule table and memoized fee resolver
//! - **Checkout** (`checkout`): cart validation and charge totals in minor units
//! - **Coupons** (`coupons`): coupon lookup seam and static coupon book
//! - **Payment** (`payment`): payment processor seam, Stripe over REST
//! - **HTTP API** (`api`): axum routes and middleware
//!
//! ```text
//! storefront/src/
//! ├── core/          # config, state, errors, server
//! ├── api/           # routes and handlers
//! ├── shipping/      # rule table and resolver
//! ├── checkout/      # totals
//! ├── coupons/       # coupon lookup
//! ├── payment/       # payment gateway
//! ├── money/         # Decimal helpers
//! └── utils/         # logging
//! ```

pub mod api;
pub mod checkout;
pub mod core;
pub mod coupons;
pub mod money;
pub mod payment;
pub mod shipping;
pub mod utils;

pub use core::{Config, Server, ServerState};
pub use shipping::{ResolvedShipping, ShippingResolver, ShippingTable};

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

pub use utils::logger::init_logger;
