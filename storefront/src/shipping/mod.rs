//! Shipping fee resolution
//!
//! A static, validated rule table ([`ShippingTable`]) and a memoizing
//! resolver ([`ShippingResolver`]) that maps a destination and subtotal to
//! a flat fee with a free-shipping threshold.

mod resolver;
pub mod rules;
mod table;

pub use resolver::{MAX_CACHE_ENTRIES, ResolvedShipping, ShippingResolver};
pub use rules::{EU_FALLBACK_COUNTRIES, ShippingRule, default_rules};
pub use table::{RuleTableError, ShippingTable};
