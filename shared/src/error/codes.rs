//! Unified error codes for the storefront
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 3xxx: Shipping errors
//! - 4xxx: Checkout errors
//! - 5xxx: Payment errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so the storefront
/// frontend can switch on them without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Invalid request
    InvalidRequest = 5,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 3xxx: Shipping ====================
    /// Checkout needs a shipping destination
    ShippingAddressRequired = 3001,
    /// Country code is not a two-letter ISO code
    InvalidCountryCode = 3002,

    // ==================== 4xxx: Checkout ====================
    /// Cart has no items
    EmptyCart = 4001,
    /// Coupon code unknown
    CouponInvalid = 4002,
    /// Line item price or quantity invalid
    InvalidLineItem = 4003,
    /// Monetary amount invalid (negative, non-finite or too large)
    InvalidAmount = 4004,

    // ==================== 5xxx: Payment ====================
    /// Payment processor rejected the request
    PaymentFailed = 5001,
    /// Payment processor unreachable
    PaymentGatewayUnavailable = 5002,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Network error
    NetworkError = 9003,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Shipping
            ErrorCode::ShippingAddressRequired => "Shipping address is required",
            ErrorCode::InvalidCountryCode => "Country code must be a two-letter ISO code",

            // Checkout
            ErrorCode::EmptyCart => "Cart is empty",
            ErrorCode::CouponInvalid => "Coupon code is not valid",
            ErrorCode::InvalidLineItem => "Line item is invalid",
            ErrorCode::InvalidAmount => "Amount is invalid",

            // Payment
            ErrorCode::PaymentFailed => "Payment processing failed",
            ErrorCode::PaymentGatewayUnavailable => "Payment processor is unavailable",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            5 => Ok(ErrorCode::InvalidRequest),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Shipping
            3001 => Ok(ErrorCode::ShippingAddressRequired),
            3002 => Ok(ErrorCode::InvalidCountryCode),

            // Checkout
            4001 => Ok(ErrorCode::EmptyCart),
            4002 => Ok(ErrorCode::CouponInvalid),
            4003 => Ok(ErrorCode::InvalidLineItem),
            4004 => Ok(ErrorCode::InvalidAmount),

            // Payment
            5001 => Ok(ErrorCode::PaymentFailed),
            5002 => Ok(ErrorCode::PaymentGatewayUnavailable),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9003 => Ok(ErrorCode::NetworkError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
