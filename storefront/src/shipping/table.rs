//! Validated, immutable shipping rule table

use rust_decimal::Decimal;
use thiserror::Error;

use super::rules::{
    EU_FALLBACK_CURRENCY, GLOBAL_FALLBACK_CURRENCY, ShippingRule, default_rules,
    is_eu_fallback_country,
};

/// Rule table defects, detected once when the table is built
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuleTableError {
    #[error("rule table has no {currency} wildcard rule ({purpose})")]
    MissingWildcard {
        currency: &'static str,
        purpose: &'static str,
    },
    #[error("rule #{index}: currency {currency:?} is not a three-letter uppercase code")]
    InvalidCurrency { index: usize, currency: String },
    #[error("rule #{index}: country code {code:?} is not a two-letter uppercase ISO code")]
    InvalidCountryCode { index: usize, code: String },
    #[error("rule #{index}: {field} must be non-negative, got {value}")]
    NegativeAmount {
        index: usize,
        field: &'static str,
        value: Decimal,
    },
    #[error("rule #{index}: wildcard rules cannot declare regions")]
    WildcardWithRegions { index: usize },
    #[error("rule #{index}: region list is empty")]
    EmptyRegions { index: usize },
}

/// Ordered shipping rules with both wildcard fallbacks located up front
#[derive(Debug, Clone)]
pub struct ShippingTable {
    rules: Vec<ShippingRule>,
    eu_fallback: usize,
    global_fallback: usize,
}

impl ShippingTable {
    /// Validate and build a table
    pub fn new(rules: Vec<ShippingRule>) -> Result<Self, RuleTableError> {
        for (index, rule) in rules.iter().enumerate() {
            validate_rule(index, rule)?;
        }

        let find_wildcard = |currency: &str| {
            rules
                .iter()
                .position(|r| r.is_wildcard() && r.currency == currency)
        };

        let eu_fallback =
            find_wildcard(EU_FALLBACK_CURRENCY).ok_or(RuleTableError::MissingWildcard {
                currency: EU_FALLBACK_CURRENCY,
                purpose: "EU fallback",
            })?;
        let global_fallback =
            find_wildcard(GLOBAL_FALLBACK_CURRENCY).ok_or(RuleTableError::MissingWildcard {
                currency: GLOBAL_FALLBACK_CURRENCY,
                purpose: "rest-of-world fallback",
            })?;

        Ok(Self {
            rules,
            eu_fallback,
            global_fallback,
        })
    }

    /// The built-in rate card
    pub fn standard() -> Result<Self, RuleTableError> {
        Self::new(default_rules())
    }

    pub fn rules(&self) -> &[ShippingRule] {
        &self.rules
    }

    /// Pick the rule for a destination
    ///
    /// Precedence: country+region, country-only, EU wildcard (EU members),
    /// global wildcard. Matching is case-sensitive.
    pub fn match_rule(&self, country_code: &str, region: Option<&str>) -> &ShippingRule {
        if let Some(region) = region
            && let Some(rule) = self
                .rules
                .iter()
                .find(|r| r.covers_country(country_code) && r.covers_region(region))
        {
            return rule;
        }

        if let Some(rule) = self
            .rules
            .iter()
            .find(|r| r.covers_country(country_code) && !r.declares_regions())
        {
            return rule;
        }

        if is_eu_fallback_country(country_code) {
            &self.rules[self.eu_fallback]
        } else {
            &self.rules[self.global_fallback]
        }
    }
}

fn validate_rule(index: usize, rule: &ShippingRule) -> Result<(), RuleTableError> {
    let is_upper_alpha = |s: &str, len: usize| {
        s.len() == len && s.bytes().all(|b| b.is_ascii_uppercase())
    };

    if !is_upper_alpha(&rule.currency, 3) {
        return Err(RuleTableError::InvalidCurrency {
            index,
            currency: rule.currency.clone(),
        });
    }
    if let Some(code) = rule.country_codes.iter().find(|c| !is_upper_alpha(c, 2)) {
        return Err(RuleTableError::InvalidCountryCode {
            index,
            code: code.clone(),
        });
    }
    if rule.flat_rate < Decimal::ZERO {
        return Err(RuleTableError::NegativeAmount {
            index,
            field: "flat_rate",
            value: rule.flat_rate,
        });
    }
    if rule.free_threshold < Decimal::ZERO {
        return Err(RuleTableError::NegativeAmount {
            index,
            field: "free_threshold",
            value: rule.free_threshold,
        });
    }
    match &rule.regions {
        Some(_) if rule.is_wildcard() => Err(RuleTableError::WildcardWithRegions { index }),
        Some(regions) if regions.is_empty() => Err(RuleTableError::EmptyRegions { index }),
        _ => Ok(()),
    }
}
