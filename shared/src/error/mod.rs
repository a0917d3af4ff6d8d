//! Unified error system for the storefront
//!
//! This module provides:
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Rich error type with codes, messages, and details
//! - [`ApiResponse`]: JSON error body
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 3xxx: Shipping errors
//! - 4xxx: Checkout errors
//! - 5xxx: Payment errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ApiResponse};
//!
//! let err = AppError::new(ErrorCode::EmptyCart);
//!
//! let err = AppError::required("shipping.country");
//!
//! let response = ApiResponse::error(&err);
//! assert_eq!(response.code, 7);
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
