use crate::error::LedgerError;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Decimal places of the currency minor unit (cents/paise).
pub const MINOR_UNIT_DP: u32 = 2;

/// Tolerance used for all monetary reconciliation checks.
pub const TOLERANCE: Decimal = dec!(0.01);

/// Currency assumed when the caller does not specify one.
pub const DEFAULT_CURRENCY: &str = "INR";

/// Rounds to the currency minor unit, half-up.
///
/// This is the single rounding policy of the crate; split computation,
/// balance aggregation, and expense validation all go through it.
pub fn round_minor_unit(value: Decimal) -> Decimal {
    let mut rounded =
        value.round_dp_with_strategy(MINOR_UNIT_DP, RoundingStrategy::MidpointAwayFromZero);
    // Pin the scale so shares always print as e.g. "30.00".
    rounded.rescale(MINOR_UNIT_DP);
    rounded
}

/// Returns `true` when `a` and `b` differ by at most `epsilon`.
pub fn approximately_equal(a: Decimal, b: Decimal, epsilon: Decimal) -> bool {
    (a - b).abs() <= epsilon
}

/// A positive monetary amount.
///
/// Wraps `rust_decimal::Decimal` so expense and settlement totals can never
/// be zero or negative once constructed.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self, LedgerError> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(LedgerError::ValidationError(
                "amount must be positive".to_string(),
            ))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = LedgerError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
