use std::fmt;

use common::Money;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

/// Percent change from a previous period to the current one.
///
/// Undefined when the previous period is zero; serialized as `null` and
/// displayed as `-`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PercentChange {
    Value(Decimal),
    Undefined,
}

impl PercentChange {
    /// `(current - previous) / previous * 100`, rounded to 2 decimal places.
    pub fn between(current: Money, previous: Money) -> Self {
        if previous.is_zero() {
            return PercentChange::Undefined;
        }
        current
            .checked_sub(previous)
            .and_then(|delta| delta.amount().checked_mul(Decimal::ONE_HUNDRED))
            .and_then(|delta| delta.checked_div(previous.amount()))
            .map(|pct| PercentChange::Value(pct.round_dp(2)))
            .unwrap_or(PercentChange::Undefined)
    }

    pub fn value(&self) -> Option<Decimal> {
        match self {
            PercentChange::Value(v) => Some(*v),
            PercentChange::Undefined => None,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, PercentChange::Undefined)
    }
}

impl fmt::Display for PercentChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PercentChange::Value(v) => write!(f, "{v:.2}"),
            PercentChange::Undefined => write!(f, "-"),
        }
    }
}

impl Serialize for PercentChange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PercentChange::Value(v) => Serialize::serialize(v, serializer),
            PercentChange::Undefined => serializer.serialize_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn money(d: Decimal) -> Money {
        Money::new(d)
    }

    #[test]
    fn growth_and_decline() {
        assert_eq!(
            PercentChange::between(money(dec!(150)), money(dec!(100))),
            PercentChange::Value(dec!(50))
        );
        assert_eq!(
            PercentChange::between(money(dec!(25)), money(dec!(100))),
            PercentChange::Value(dec!(-75))
        );
        assert_eq!(
            PercentChange::between(money(dec!(0)), money(dec!(40))),
            PercentChange::Value(dec!(-100))
        );
    }

    #[test]
    fn rounds_to_two_places() {
        let change = PercentChange::between(money(dec!(10)), money(dec!(3)));
        assert_eq!(change.value(), Some(dec!(233.33)));
    }

    #[test]
    fn zero_previous_is_undefined() {
        assert!(PercentChange::between(money(dec!(50)), Money::zero()).is_undefined());
        assert!(PercentChange::between(Money::zero(), Money::zero()).is_undefined());
    }

    #[test]
    fn display() {
        assert_eq!(PercentChange::Value(dec!(12.5)).to_string(), "12.50");
        assert_eq!(PercentChange::Undefined.to_string(), "-");
    }

    #[test]
    fn serializes_undefined_as_null() {
        assert_eq!(
            serde_json::to_value(PercentChange::Undefined).unwrap(),
            serde_json::Value::Null
        );
        assert_eq!(
            serde_json::to_value(PercentChange::Value(dec!(12.50))).unwrap(),
            serde_json::json!("12.50")
        );
    }
}
