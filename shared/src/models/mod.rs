//! Data models
//!
//! Wire types shared between the storefront server and its clients.

pub mod checkout;
pub mod shipping;

// Re-exports
pub use checkout::*;
pub use shipping::*;
