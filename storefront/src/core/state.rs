//! Shared request-handler state

use std::sync::Arc;

use super::config::Config;
use super::error::ConfigError;
use crate::coupons::{CouponLookup, StaticCoupons};
use crate::payment::{PaymentGateway, StripeGateway};
use crate::shipping::{ShippingResolver, ShippingTable};

/// Everything handlers need, cheap to clone
#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub shipping: Arc<ShippingResolver>,
    pub coupons: Arc<dyn CouponLookup>,
    pub payments: Arc<dyn PaymentGateway>,
}

impl ServerState {
    /// Assemble state from already-built collaborators
    pub fn new(
        config: Config,
        shipping: Arc<ShippingResolver>,
        coupons: Arc<dyn CouponLookup>,
        payments: Arc<dyn PaymentGateway>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            shipping,
            coupons,
            payments,
        }
    }

    /// Build production state; fails on any configuration defect
    pub fn initialize(config: &Config) -> Result<Self, ConfigError> {
        let table = ShippingTable::standard()?;
        tracing::info!(rules = table.rules().len(), "Shipping rule table loaded");

        let coupons = StaticCoupons::from_json(&config.coupons)?;
        tracing::info!(coupons = coupons.len(), "Coupon book loaded");

        let payments = StripeGateway::new(
            config.stripe_secret_key.clone(),
            config.stripe_api_base.clone(),
            config.payment_timeout(),
        )?;

        Ok(Self::new(
            config.clone(),
            Arc::new(ShippingResolver::new(Arc::new(table))),
            Arc::new(coupons),
            Arc::new(payments),
        ))
    }
}
