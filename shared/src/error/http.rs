//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,

            Self::NotFound => StatusCode::NOT_FOUND,

            // Processor answered but refused the charge
            Self::PaymentFailed => StatusCode::BAD_GATEWAY,

            // Transient, client can retry
            Self::PaymentGatewayUnavailable | Self::NetworkError => {
                StatusCode::SERVICE_UNAVAILABLE
            }

            Self::InternalError | Self::ConfigError | Self::Unknown => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            // 400 Bad Request (default for validation/business errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_status() {
        assert_eq!(ErrorCode::Success.http_status(), StatusCode::OK);
    }

    #[test]
    fn test_bad_request_status() {
        assert_eq!(
            ErrorCode::ValidationFailed.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ErrorCode::EmptyCart.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ErrorCode::CouponInvalid.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::ShippingAddressRequired.http_status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_payment_status() {
        assert_eq!(
            ErrorCode::PaymentFailed.http_status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ErrorCode::PaymentGatewayUnavailable.http_status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_internal_error_status() {
        assert_eq!(
            ErrorCode::InternalError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ErrorCode::ConfigError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
