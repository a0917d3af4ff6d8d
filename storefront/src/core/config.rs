//! Server configuration
//!
//! # Environment variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | HTTP_PORT | 8080 | HTTP listen port |
//! | ENVIRONMENT | development | development, staging or production |
//! | LOG_LEVEL | info | Default tracing level (overridden by RUST_LOG) |
//! | LOG_DIR | (unset) | Write daily-rolling log files here when the directory exists |
//! | STRIPE_SECRET_KEY | dev placeholder | Required outside development |
//! | STRIPE_API_BASE | https://api.stripe.com | Payment processor base URL |
//! | PAYMENT_TIMEOUT_MS | 10000 | Outbound payment request timeout |
//! | COUPONS | [] | JSON coupon list |
//! | CORS_ALLOW_ORIGIN | (permissive) | Storefront origin allowed by CORS |

use std::time::Duration;

use super::error::ConfigError;
use crate::payment::DEFAULT_API_BASE;

#[derive(Debug, Clone)]
pub struct Config {
    pub http_port: u16,
    pub environment: String,
    pub log_level: String,
    pub log_dir: Option<String>,
    pub stripe_secret_key: String,
    pub stripe_api_base: String,
    pub payment_timeout_ms: u64,
    /// Raw JSON coupon list
    pub coupons: String,
    pub cors_allow_origin: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_port: 8080,
            environment: "development".into(),
            log_level: "info".into(),
            log_dir: None,
            stripe_secret_key: "dev-STRIPE_SECRET_KEY-not-for-production".into(),
            stripe_api_base: DEFAULT_API_BASE.into(),
            payment_timeout_ms: 10_000,
            coupons: "[]".into(),
            cors_allow_origin: None,
        }
    }
}

impl Config {
    /// Require a secret env var: must be set and non-empty outside development.
    fn require_secret(name: &'static str, environment: &str) -> Result<String, ConfigError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(ConfigError::MissingSecret {
                        name,
                        environment: environment.to_string(),
                    });
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(ConfigError::MissingSecret {
                name,
                environment: environment.to_string(),
            });
        }
        Ok(val)
    }

    /// Parse an optional numeric env var, rejecting garbage instead of defaulting
    fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError>
    where
        T::Err: std::fmt::Display,
    {
        match std::env::var(name) {
            Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
                name,
                reason: e.to_string(),
            }),
            Err(_) => Ok(default),
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let environment = std::env::var("ENVIRONMENT").unwrap_or(defaults.environment);

        Ok(Self {
            http_port: Self::parse_var("HTTP_PORT", defaults.http_port)?,
            log_level: std::env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
            log_dir: std::env::var("LOG_DIR").ok().filter(|s| !s.is_empty()),
            stripe_secret_key: Self::require_secret("STRIPE_SECRET_KEY", &environment)?,
            stripe_api_base: std::env::var("STRIPE_API_BASE").unwrap_or(defaults.stripe_api_base),
            payment_timeout_ms: Self::parse_var("PAYMENT_TIMEOUT_MS", defaults.payment_timeout_ms)?,
            coupons: std::env::var("COUPONS")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(defaults.coupons),
            cors_allow_origin: std::env::var("CORS_ALLOW_ORIGIN")
                .ok()
                .filter(|s| !s.is_empty()),
            environment,
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn payment_timeout(&self) -> Duration {
        Duration::from_millis(self.payment_timeout_ms)
    }
}
