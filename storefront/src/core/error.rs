use thiserror::Error;

use crate::coupons::CouponConfigError;
use crate::shipping::RuleTableError;

/// Startup configuration defects. All of them are fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be set in {environment} environment")]
    MissingSecret {
        name: &'static str,
        environment: String,
    },

    #[error("invalid value for {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },

    #[error("invalid shipping rule table: {0}")]
    RuleTable(#[from] RuleTableError),

    #[error("invalid coupon configuration: {0}")]
    Coupons(#[from] CouponConfigError),

    #[error("failed to build payment client: {0}")]
    PaymentClient(#[from] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ServerError>;
