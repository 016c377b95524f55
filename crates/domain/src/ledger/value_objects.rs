//! Validated values for the ledger.

use common::Money;
use rust_decimal::Decimal;

use crate::error::DomainError;

/// Longest stock item name accepted.
pub const MAX_NAME_LEN: usize = 54;

/// Decimal places stored for prices and quantities.
pub const SCALE: u32 = 2;

/// Exclusive bound on prices and quantities.
///
/// Keeps a price times a quantity below 10^24, well inside `Decimal` range.
fn upper_bound() -> Decimal {
    Decimal::from(10_i64.pow(12))
}

fn check_amount(value: Decimal) -> Result<Decimal, &'static str> {
    let value = value.normalize();
    if value.scale() > SCALE {
        return Err("must have at most 2 decimal places");
    }
    if value.abs() >= upper_bound() {
        return Err("is too large");
    }
    Ok(value)
}

/// Quantity of a sale: strictly positive, at most two decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Quantity(Decimal);

impl Quantity {
    /// Validates a quantity for the `quantity` field.
    pub fn new(value: Decimal) -> Result<Self, DomainError> {
        if value <= Decimal::ZERO {
            return Err(DomainError::InvalidQuantity {
                field: "quantity",
                value,
                reason: "must be greater than zero",
            });
        }
        let value = check_amount(value).map_err(|reason| DomainError::InvalidQuantity {
            field: "quantity",
            value,
            reason,
        })?;
        Ok(Self(value))
    }

    /// Returns the quantity as a decimal.
    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl std::fmt::Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validates an on-hand stock level: zero or more, at most two decimal places.
pub fn validate_stock_level(value: Decimal) -> Result<Decimal, DomainError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(DomainError::InvalidQuantity {
            field: "quantity_on_hand",
            value,
            reason: "must not be negative",
        });
    }
    check_amount(value).map_err(|reason| DomainError::InvalidQuantity {
        field: "quantity_on_hand",
        value,
        reason,
    })
}

/// Validates a price for `field`: zero or more, at most two decimal places.
///
/// The returned price always carries exactly two decimal places.
pub fn validate_price(field: &'static str, price: Money) -> Result<Money, DomainError> {
    if price.is_negative() {
        return Err(DomainError::InvalidPrice {
            field,
            value: price.amount(),
            reason: "must not be negative",
        });
    }
    check_amount(price.amount())
        .map(|mut amount| {
            amount.rescale(SCALE);
            Money::new(amount)
        })
        .map_err(|reason| DomainError::InvalidPrice {
            field,
            value: price.amount(),
            reason,
        })
}

/// Trims and validates a stock item name.
pub fn validate_name(name: &str) -> Result<String, DomainError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DomainError::InvalidName("must not be empty"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(DomainError::InvalidName("must be at most 54 characters"));
    }
    Ok(name.to_string())
}
