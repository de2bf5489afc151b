use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Signed currency amount, always held at two decimal places.
///
/// Serializes as a JSON number so ledger rows keep a numeric amount
/// instead of a formatted currency string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Money(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Money {
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, 2))
    }

    /// `None` when the amount does not fit an `i64` of cents.
    pub fn to_cents(self) -> Option<i64> {
        self.0.checked_mul(Decimal::ONE_HUNDRED)?.round().to_i64()
    }

    /// Rounds half-to-even to two places, so `10.005` becomes `10.00`.
    pub fn from_decimal(decimal: Decimal) -> Self {
        Money(decimal.round_dp(2))
    }

    pub fn zero() -> Self {
        Money(Decimal::ZERO)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}
