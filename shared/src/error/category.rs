//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// - 0xxx: General errors
/// - 3xxx: Shipping errors
/// - 4xxx: Checkout errors
/// - 5xxx: Payment errors
/// - 9xxx: System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Shipping errors (3xxx)
    Shipping,
    /// Checkout errors (4xxx)
    Checkout,
    /// Payment errors (5xxx)
    Payment,
    /// System errors (everything else)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            3000..4000 => Self::Shipping,
            4000..5000 => Self::Checkout,
            5000..6000 => Self::Payment,
            _ => Self::System,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Shipping => "shipping",
            Self::Checkout => "checkout",
            Self::Payment => "payment",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_code() {
        assert_eq!(ErrorCategory::from_code(0), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(999), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(3001), ErrorCategory::Shipping);
        assert_eq!(ErrorCategory::from_code(4001), ErrorCategory::Checkout);
        assert_eq!(ErrorCategory::from_code(5001), ErrorCategory::Payment);
        assert_eq!(ErrorCategory::from_code(9001), ErrorCategory::System);
        assert_eq!(ErrorCategory::from_code(1500), ErrorCategory::System);
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::Success.category(), ErrorCategory::General);
        assert_eq!(
            ErrorCode::ShippingAddressRequired.category(),
            ErrorCategory::Shipping
        );
        assert_eq!(ErrorCode::EmptyCart.category(), ErrorCategory::Checkout);
        assert_eq!(ErrorCode::PaymentFailed.category(), ErrorCategory::Payment);
        assert_eq!(ErrorCode::ConfigError.category(), ErrorCategory::System);
    }

    #[test]
    fn test_category_serialize() {
        let json = serde_json::to_string(&ErrorCategory::Checkout).unwrap();
        assert_eq!(json, "\"checkout\"");

        let category: ErrorCategory = serde_json::from_str("\"system\"").unwrap();
        assert_eq!(category, ErrorCategory::System);
    }
}
