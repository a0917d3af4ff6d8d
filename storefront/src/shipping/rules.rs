//! Shipping rule definitions and the storefront's rate card

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// EU member states that fall back to the EUR wildcard rule when no
/// country rule matches them.
pub const EU_FALLBACK_COUNTRIES: [&str; 27] = [
    "AT", "BE", "BG", "HR", "CY", "CZ", "DK", "EE", "FI", "FR", "DE", "GR", "IE", "IT", "LV",
    "LT", "LU", "MT", "NL", "PL", "PT", "RO", "SK", "SI", "ES", "SE", "HU",
];

/// Currency of the EU fallback wildcard
pub const EU_FALLBACK_CURRENCY: &str = "EUR";
/// Currency of the rest-of-world wildcard
pub const GLOBAL_FALLBACK_CURRENCY: &str = "USD";

/// Whether a country code belongs to the EU fallback set (case-sensitive)
pub fn is_eu_fallback_country(country_code: &str) -> bool {
    EU_FALLBACK_COUNTRIES.contains(&country_code)
}

/// Flat-rate shipping rule
///
/// An empty `country_codes` list makes the rule a wildcard. `regions`,
/// when present, restricts the rule to those subdivisions of its countries.
#[derive(Debug, Clone, PartialEq)]
pub struct ShippingRule {
    pub country_codes: Vec<String>,
    pub regions: Option<Vec<String>>,
    pub currency: String,
    /// Charged while the subtotal is below `free_threshold`
    pub flat_rate: Decimal,
    /// Subtotal at or above which shipping is free (inclusive)
    pub free_threshold: Decimal,
}

impl ShippingRule {
    /// Rule for a set of countries
    pub fn countries(
        codes: &[&str],
        currency: &str,
        flat_rate: Decimal,
        free_threshold: Decimal,
    ) -> Self {
        Self {
            country_codes: codes.iter().map(|c| c.to_string()).collect(),
            regions: None,
            currency: currency.to_string(),
            flat_rate,
            free_threshold,
        }
    }

    /// Wildcard (fallback) rule
    pub fn wildcard(currency: &str, flat_rate: Decimal, free_threshold: Decimal) -> Self {
        Self::countries(&[], currency, flat_rate, free_threshold)
    }

    /// Restrict the rule to the given regions
    pub fn with_regions(mut self, regions: &[&str]) -> Self {
        self.regions = Some(regions.iter().map(|r| r.to_string()).collect());
        self
    }

    #[inline]
    pub fn is_wildcard(&self) -> bool {
        self.country_codes.is_empty()
    }

    #[inline]
    pub fn covers_country(&self, country_code: &str) -> bool {
        self.country_codes.iter().any(|c| c == country_code)
    }

    #[inline]
    pub fn declares_regions(&self) -> bool {
        self.regions.is_some()
    }

    pub fn covers_region(&self, region: &str) -> bool {
        self.regions
            .as_ref()
            .is_some_and(|regions| regions.iter().any(|r| r == region))
    }

    /// Fee for a subtotal in this rule's currency
    pub fn fee_for(&self, subtotal: Decimal) -> Decimal {
        if subtotal >= self.free_threshold {
            Decimal::ZERO
        } else {
            self.flat_rate
        }
    }
}

/// The storefront's rate card, in precedence order
pub fn default_rules() -> Vec<ShippingRule> {
    vec![
        ShippingRule::countries(&["US"], "USD", dec!(9), dec!(100)),
        ShippingRule::countries(&["CA"], "USD", dec!(15), dec!(150)),
        ShippingRule::countries(&["GB"], "GBP", dec!(10), dec!(100)),
        ShippingRule::countries(&["ES"], "EUR", dec!(9.5), dec!(150))
            .with_regions(&["Canary Islands"]),
        ShippingRule::countries(&["ES"], "EUR", dec!(6.5), dec!(100))
            .with_regions(&["Balearic Islands"]),
        ShippingRule::countries(&["ES"], "EUR", dec!(4), dec!(60)),
        ShippingRule::countries(&["FR", "DE", "IT", "PT", "NL", "BE"], "EUR", dec!(6), dec!(100)),
        ShippingRule::countries(&["CH"], "EUR", dec!(20), dec!(200)),
        ShippingRule::wildcard(EU_FALLBACK_CURRENCY, dec!(8), dec!(100)),
        ShippingRule::wildcard(GLOBAL_FALLBACK_CURRENCY, dec!(10), dec!(150)),
    ]
}
