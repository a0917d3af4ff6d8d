//! Shipping fee resolution with result memoization

use std::sync::Arc;

use dashmap::DashMap;
use rust_decimal::Decimal;

use super::table::ShippingTable;

/// Upper bound on memoized resolutions. Past it, results are still
/// computed but no longer stored.
pub const MAX_CACHE_ENTRIES: usize = 10_000;

/// Fee and billing currency for one destination/subtotal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedShipping {
    /// Zero, or the matched rule's flat rate
    pub fee: Decimal,
    /// Matched rule's currency
    pub currency: String,
    /// Matched rule's free-shipping threshold
    pub free_threshold: Decimal,
}

impl ResolvedShipping {
    #[inline]
    pub fn is_free(&self) -> bool {
        self.fee.is_zero()
    }

    /// Amount still needed to reach free shipping (zero once reached)
    pub fn remaining_for_free(&self, subtotal: Decimal) -> Decimal {
        (self.free_threshold - subtotal).max(Decimal::ZERO)
    }
}

type CacheKey = (String, Option<String>, Decimal);

/// Resolves shipping fees against an immutable [`ShippingTable`]
///
/// Safe to share across request handlers. Two concurrent misses on the
/// same key both compute and the later insert wins; values are
/// deterministic so either is correct.
pub struct ShippingResolver {
    table: Arc<ShippingTable>,
    cache: Option<DashMap<CacheKey, ResolvedShipping>>,
}

impl ShippingResolver {
    /// Resolver with memoization
    pub fn new(table: Arc<ShippingTable>) -> Self {
        Self {
            table,
            cache: Some(DashMap::new()),
        }
    }

    /// Resolver that evaluates the rule list on every call
    pub fn uncached(table: Arc<ShippingTable>) -> Self {
        Self { table, cache: None }
    }

    pub fn table(&self) -> &ShippingTable {
        &self.table
    }

    /// Number of memoized resolutions
    pub fn cached_entries(&self) -> usize {
        self.cache.as_ref().map_or(0, DashMap::len)
    }

    /// Resolve the fee for `subtotal` (in the destination's currency)
    ///
    /// `country_code` and `region` are matched exactly as given. A negative
    /// subtotal is clamped to zero.
    pub fn resolve(
        &self,
        country_code: &str,
        region: Option<&str>,
        subtotal: Decimal,
    ) -> ResolvedShipping {
        let subtotal = if subtotal < Decimal::ZERO {
            tracing::warn!(country_code, %subtotal, "Negative subtotal clamped to zero");
            Decimal::ZERO
        } else {
            subtotal
        };

        let Some(cache) = &self.cache else {
            return self.evaluate(country_code, region, subtotal);
        };

        let key: CacheKey = (
            country_code.to_string(),
            region.map(str::to_string),
            subtotal,
        );
        if let Some(hit) = cache.get(&key) {
            return hit.clone();
        }

        let resolved = self.evaluate(country_code, region, subtotal);
        if cache.len() < MAX_CACHE_ENTRIES {
            cache.insert(key, resolved.clone());
        }
        resolved
    }

    fn evaluate(
        &self,
        country_code: &str,
        region: Option<&str>,
        subtotal: Decimal,
    ) -> ResolvedShipping {
        let rule = self.table.match_rule(country_code, region);
        let resolved = ResolvedShipping {
            fee: rule.fee_for(subtotal),
            currency: rule.currency.clone(),
            free_threshold: rule.free_threshold,
        };
        tracing::debug!(
            country_code,
            region = ?region,
            %subtotal,
            fee = %resolved.fee,
            currency = %resolved.currency,
            "Resolved shipping"
        );
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn resolver() -> ShippingResolver {
        ShippingResolver::new(Arc::new(ShippingTable::standard().unwrap()))
    }

    fn resolved(fee: Decimal, currency: &str, threshold: Decimal) -> ResolvedShipping {
        ResolvedShipping {
            fee,
            currency: currency.to_string(),
            free_threshold: threshold,
        }
    }

    #[test]
    fn test_reference_destinations() {
        let r = resolver();
        assert_eq!(
            r.resolve("US", None, dec!(150)),
            resolved(dec!(0), "USD", dec!(100))
        );
        assert_eq!(
            r.resolve("US", None, dec!(50)),
            resolved(dec!(9), "USD", dec!(100))
        );
        assert_eq!(
            r.resolve("GB", None, dec!(50)),
            resolved(dec!(10), "GBP", dec!(100))
        );
        assert_eq!(
            r.resolve("CH", None, dec!(150)),
            resolved(dec!(20), "EUR", dec!(200))
        );
    }

    #[test]
    fn test_country_region_beats_country_only() {
        let r = resolver();
        let canary = r.resolve("ES", Some("Canary Islands"), dec!(50));
        assert_eq!(canary.fee, dec!(9.5));
        assert_eq!(canary.currency, "EUR");

        let mainland = r.resolve("ES", None, dec!(50));
        assert_eq!(mainland.fee, dec!(4));
    }

    #[test]
    fn test_fallbacks() {
        let r = resolver();
        assert_eq!(
            r.resolve("JP", None, dec!(50)),
            resolved(dec!(10), "USD", dec!(150))
        );
        assert_eq!(
            r.resolve("LT", None, dec!(50)),
            resolved(dec!(8), "EUR", dec!(100))
        );
    }

    #[test]
    fn test_threshold_boundary() {
        let r = resolver();
        for rule in r.table().rules() {
            let country = rule.country_codes.first().map_or("JP", String::as_str);
            let region = rule.regions.as_ref().and_then(|rs| rs.first()).map(String::as_str);
            let matched = r.table().match_rule(country, region).clone();

            let at = r.resolve(country, region, matched.free_threshold);
            assert_eq!(at.fee, Decimal::ZERO, "{country}/{region:?} at threshold");

            let above = r.resolve(country, region, matched.free_threshold + dec!(0.01));
            assert_eq!(above.fee, Decimal::ZERO);

            let below = r.resolve(country, region, matched.free_threshold - dec!(0.01));
            assert_eq!(below.fee, matched.flat_rate, "{country}/{region:?} below threshold");
            assert_eq!(below.currency, matched.currency);
        }
    }

    #[test]
    fn test_lowercase_country_is_not_normalized() {
        let r = resolver();
        // "us" matches no rule and is not an EU member: global wildcard
        assert_eq!(
            r.resolve("us", None, dec!(50)),
            resolved(dec!(10), "USD", dec!(150))
        );
    }

    #[test]
    fn test_negative_subtotal_clamps_to_zero() {
        let r = resolver();
        assert_eq!(
            r.resolve("US", None, dec!(-20)),
            r.resolve("US", None, Decimal::ZERO)
        );
        assert_eq!(r.resolve("US", None, dec!(-20)).fee, dec!(9));
    }

    #[test]
    fn test_cache_is_transparent() {
        let table = Arc::new(ShippingTable::standard().unwrap());
        let cached = ShippingResolver::new(table.clone());
        let uncached = ShippingResolver::uncached(table);

        let inputs = [
            ("US", None, dec!(99.99)),
            ("ES", Some("Canary Islands"), dec!(150)),
            ("ES", Some("Balearic Islands"), dec!(20)),
            ("DE", None, dec!(100)),
            ("SE", None, dec!(30)),
            ("BR", Some("São Paulo"), dec!(10)),
        ];
        for (country, region, subtotal) in inputs {
            let first = cached.resolve(country, region, subtotal);
            let second = cached.resolve(country, region, subtotal);
            assert_eq!(first, second);
            assert_eq!(first, uncached.resolve(country, region, subtotal));
        }
        assert_eq!(cached.cached_entries(), inputs.len());
        assert_eq!(uncached.cached_entries(), 0);
    }

    #[test]
    fn test_equal_decimals_share_a_cache_entry() {
        let r = resolver();
        r.resolve("US", None, dec!(50));
        r.resolve("US", None, dec!(50.00));
        assert_eq!(r.cached_entries(), 1);
    }

    #[test]
    fn test_cache_stops_growing_at_bound() {
        let r = resolver();
        for cents in 0..(MAX_CACHE_ENTRIES as i64 + 50) {
            r.resolve("US", None, Decimal::new(cents, 2));
        }
        assert_eq!(r.cached_entries(), MAX_CACHE_ENTRIES);
        // Past the bound results are still correct
        assert_eq!(r.resolve("US", None, dec!(1000)).fee, Decimal::ZERO);
    }

    #[test]
    fn test_concurrent_resolution() {
        let r = Arc::new(resolver());
        std::thread::scope(|s| {
            for _ in 0..8 {
                let r = r.clone();
                s.spawn(move || {
                    for _ in 0..200 {
                        assert_eq!(r.resolve("GB", None, dec!(50)).fee, dec!(10));
                        assert_eq!(r.resolve("GB", None, dec!(100)).fee, Decimal::ZERO);
                    }
                });
            }
        });
        assert_eq!(r.cached_entries(), 2);
    }
}
