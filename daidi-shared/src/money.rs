//! Monetary amounts.
//!
//! Prices are stored as whole Tomans (`NUMERIC(12, 0)` in the database), so
//! every amount is a `Decimal` that gets rounded back to the currency scale
//! after any multiplication.

use rust_decimal::{Decimal, RoundingStrategy};

/// Amount of money in the shop currency.
pub type Money = Decimal;

pub const CURRENCY_CODE: &str = "IRT";

/// Round an amount to `scale` decimal places using banker's rounding.
pub fn round_currency(amount: Money, scale: u32) -> Money {
    amount.round_dp_with_strategy(scale, RoundingStrategy::MidpointNearestEven)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_to_whole_units() {
        assert_eq!(round_currency(dec!(940.00), 0), dec!(940));
        assert_eq!(round_currency(dec!(12.5), 0), dec!(12));
        assert_eq!(round_currency(dec!(13.5), 0), dec!(14));
    }

    #[test]
    fn test_round_keeps_requested_scale() {
        assert_eq!(round_currency(dec!(10.456), 2), dec!(10.46));
    }
}
