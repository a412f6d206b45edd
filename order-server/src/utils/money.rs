//! Money calculation utilities using rust_decimal for precision
//!
//! Amounts are stored and serialized as `f64`. Every sum or product goes
//! through `Decimal` and is rounded back to 2 decimal places. Order lines are
//! required to be whole cents, so order totals never lose precision here.

use rust_decimal::prelude::*;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// quantity × unit price
pub fn line_total(quantity: f64, unit_price: f64) -> Decimal {
    to_decimal(quantity) * to_decimal(unit_price)
}

/// quantity × unit price, `None` on overflow
pub fn checked_line_total(quantity: f64, unit_price: f64) -> Option<Decimal> {
    to_decimal(quantity).checked_mul(to_decimal(unit_price))
}

/// Σ quantity × unit price, `None` on overflow
pub fn subtotal<I>(lines: I) -> Option<Decimal>
where
    I: IntoIterator<Item = (f64, f64)>,
{
    lines
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, (quantity, unit_price)| {
            acc.checked_add(checked_line_total(quantity, unit_price)?)
        })
}

/// No digits below the cent
pub fn is_whole_cents(value: Decimal) -> bool {
    value.round_dp(DECIMAL_PLACES) == value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subtotal_of_mixed_lines() {
        let total = subtotal([(3.0, 100.0), (1.0, 50.0)]).unwrap();
        assert_eq!(to_f64(total), 350.0);
    }

    #[test]
    fn avoids_binary_float_drift() {
        // 0.1 + 0.2 in f64 is 0.30000000000000004
        let total = subtotal([(1.0, 0.1), (1.0, 0.2)]).unwrap();
        assert_eq!(to_f64(total), 0.3);
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(to_f64(line_total(1.0, 2.125)), 2.13);
        assert_eq!(to_f64(line_total(0.5, 0.01)), 0.01);
    }

    #[test]
    fn whole_cents_detection() {
        assert!(is_whole_cents(to_decimal(19.99)));
        assert!(is_whole_cents(line_total(1.5, 0.02)));
        assert!(!is_whole_cents(to_decimal(0.004)));
        assert!(!is_whole_cents(line_total(0.5, 0.01)));
    }

    #[test]
    fn overflow_is_reported_not_panicked() {
        assert!(checked_line_total(1e20, 1e20).is_none());
        assert!(subtotal([(1e14, 1e14), (1e14, 1e14)]).is_some());
        assert!(subtotal([(1e14, 7e14), (1e14, 7e14)]).is_none());
    }

    #[test]
    fn non_finite_input_becomes_zero() {
        assert_eq!(to_decimal(f64::NAN), Decimal::ZERO);
    }
}
