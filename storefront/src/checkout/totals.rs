//! Cart subtotal, shipping and discount arithmetic

use rust_decimal::Decimal;
use shared::models::LineItem;

use super::CheckoutError;
use crate::money::{MAX_PRICE, MAX_QUANTITY, require_finite, to_decimal, to_minor_units};
use crate::shipping::{ResolvedShipping, ShippingResolver};

/// Validated cart line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartLine {
    pub unit_price: Decimal,
    pub quantity: u32,
}

impl CartLine {
    #[inline]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Validate a single wire line item
pub fn validate_line_item(index: usize, item: &LineItem) -> Result<CartLine, CheckoutError> {
    let invalid = |reason: String| CheckoutError::InvalidLineItem { index, reason };

    require_finite(item.price, "price").map_err(|e| invalid(e.to_string()))?;
    if item.price < 0.0 {
        return Err(invalid(format!(
            "price must be non-negative, got {}",
            item.price
        )));
    }
    if item.price > MAX_PRICE {
        return Err(invalid(format!(
            "price exceeds maximum allowed ({}), got {}",
            MAX_PRICE, item.price
        )));
    }
    if item.quantity <= 0 {
        return Err(invalid(format!(
            "quantity must be positive, got {}",
            item.quantity
        )));
    }
    if item.quantity > MAX_QUANTITY {
        return Err(invalid(format!(
            "quantity exceeds maximum allowed ({}), got {}",
            MAX_QUANTITY, item.quantity
        )));
    }

    Ok(CartLine {
        unit_price: to_decimal(item.price),
        quantity: item.quantity.unsigned_abs(),
    })
}

/// Validate a whole cart; an empty cart is rejected before anything else
pub fn validate_cart(items: &[LineItem]) -> Result<Vec<CartLine>, CheckoutError> {
    if items.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    items
        .iter()
        .enumerate()
        .map(|(index, item)| validate_line_item(index, item))
        .collect()
}

/// `Σ price × quantity` in major units
pub fn subtotal(lines: &[CartLine]) -> Decimal {
    lines.iter().map(CartLine::line_total).sum()
}

/// Final charge breakdown, all in minor units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutTotals {
    pub subtotal: i64,
    pub shipping_fee: i64,
    /// Discount actually applied, after clamping
    pub discount: i64,
    pub total: i64,
}

/// Combine subtotal, shipping and discount
///
/// The discount is clamped to `[0, subtotal + shipping]` so the payable
/// total is never negative.
pub fn compute_totals(subtotal: Decimal, shipping_fee: Decimal, discount_minor: i64) -> CheckoutTotals {
    let subtotal = to_minor_units(subtotal);
    let shipping_fee = to_minor_units(shipping_fee);
    let gross = subtotal.saturating_add(shipping_fee);
    let discount = discount_minor.clamp(0, gross.max(0));

    CheckoutTotals {
        subtotal,
        shipping_fee,
        discount,
        total: gross - discount,
    }
}

/// Priced cart for one destination
#[derive(Debug, Clone)]
pub struct CheckoutQuote {
    pub lines: Vec<CartLine>,
    pub subtotal: Decimal,
    pub shipping: ResolvedShipping,
}

impl CheckoutQuote {
    /// Validate the cart and resolve shipping for its subtotal
    ///
    /// Fails with [`CheckoutError::EmptyCart`] before any resolution when
    /// `items` is empty.
    pub fn build(
        resolver: &ShippingResolver,
        items: &[LineItem],
        country_code: &str,
        region: Option<&str>,
    ) -> Result<Self, CheckoutError> {
        let lines = validate_cart(items)?;
        let subtotal = subtotal(&lines);
        let shipping = resolver.resolve(country_code, region, subtotal);
        Ok(Self {
            lines,
            subtotal,
            shipping,
        })
    }

    pub fn subtotal_minor(&self) -> i64 {
        to_minor_units(self.subtotal)
    }

    pub fn totals(&self, discount_minor: i64) -> CheckoutTotals {
        compute_totals(self.subtotal, self.shipping.fee, discount_minor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shipping::ShippingTable;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn item(price: f64, quantity: i32) -> LineItem {
        LineItem {
            id: None,
            name: None,
            price,
            quantity,
        }
    }

    fn resolver() -> ShippingResolver {
        ShippingResolver::new(Arc::new(ShippingTable::standard().unwrap()))
    }

    #[test]
    fn test_empty_cart_is_rejected() {
        assert_eq!(validate_cart(&[]), Err(CheckoutError::EmptyCart));

        let r = resolver();
        let err = CheckoutQuote::build(&r, &[], "US", None).unwrap_err();
        assert_eq!(err, CheckoutError::EmptyCart);
        // Nothing was resolved
        assert_eq!(r.cached_entries(), 0);
    }

    #[test]
    fn test_subtotal_uses_decimal_arithmetic() {
        let lines = validate_cart(&[item(19.99, 3), item(0.1, 1), item(0.2, 1)]).unwrap();
        assert_eq!(to_minor_units(subtotal(&lines)), 6027);
    }

    #[test]
    fn test_invalid_line_items() {
        let cases = [
            item(f64::NAN, 1),
            item(-5.0, 1),
            item(2_000_000.0, 1),
            item(10.0, 0),
            item(10.0, -2),
            item(10.0, 10_000),
        ];
        for case in cases {
            let err = validate_cart(&[item(1.0, 1), case.clone()]).unwrap_err();
            assert!(
                matches!(err, CheckoutError::InvalidLineItem { index: 1, .. }),
                "{case:?} -> {err:?}"
            );
        }
    }

    #[test]
    fn test_totals_without_discount() {
        let totals = compute_totals(dec!(50), dec!(9), 0);
        assert_eq!(
            totals,
            CheckoutTotals {
                subtotal: 5000,
                shipping_fee: 900,
                discount: 0,
                total: 5900,
            }
        );
    }

    #[test]
    fn test_discount_is_clamped_to_gross() {
        // subtotal + shipping = 1000 minor units, discount 1500
        let totals = compute_totals(dec!(7), dec!(3), 1500);
        assert_eq!(totals.subtotal + totals.shipping_fee, 1000);
        assert_eq!(totals.discount, 1000);
        assert_eq!(totals.total, 0);
    }

    #[test]
    fn test_negative_discount_is_ignored() {
        let totals = compute_totals(dec!(10), dec!(0), -300);
        assert_eq!(totals.discount, 0);
        assert_eq!(totals.total, 1000);
    }

    #[test]
    fn test_quote_free_shipping_at_threshold() {
        let r = resolver();
        // 4 × 25.00 = 100.00 USD, exactly the US threshold
        let quote = CheckoutQuote::build(&r, &[item(25.0, 4)], "US", None).unwrap();
        assert_eq!(quote.subtotal, dec!(100));
        assert!(quote.shipping.is_free());
        assert_eq!(quote.totals(0).total, 10_000);
    }

    #[test]
    fn test_quote_canary_islands() {
        let r = resolver();
        let quote =
            CheckoutQuote::build(&r, &[item(25.0, 2)], "ES", Some("Canary Islands")).unwrap();
        let totals = quote.totals(500);
        assert_eq!(quote.shipping.currency, "EUR");
        assert_eq!(totals.shipping_fee, 950);
        assert_eq!(totals.total, 5000 + 950 - 500);
    }
}
