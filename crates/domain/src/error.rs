//! Domain error types.

use common::{SaleId, StockItemId};
use rust_decimal::Decimal;
use store::StoreError;
use thiserror::Error;

/// Message attached to the `quantity` field when a sale exceeds stock.
pub const INSUFFICIENT_STOCK_MESSAGE: &str = "insufficient stock quantity.";

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The sale asks for more than the item has on hand. Nothing was written.
    #[error(
        "Insufficient stock quantity for item {item_id}: requested {requested}, available {available}"
    )]
    InsufficientStock {
        item_id: StockItemId,
        requested: Decimal,
        available: Decimal,
    },

    /// A quantity is out of range or too precise.
    #[error("Invalid {field} {value}: {reason}")]
    InvalidQuantity {
        field: &'static str,
        value: Decimal,
        reason: &'static str,
    },

    /// A price is negative or too precise.
    #[error("Invalid {field} {value}: {reason}")]
    InvalidPrice {
        field: &'static str,
        value: Decimal,
        reason: &'static str,
    },

    /// A stock item name is empty or too long.
    #[error("Invalid name: {0}")]
    InvalidName(&'static str),

    /// The referenced stock item does not exist.
    #[error("Stock item not found: {0}")]
    StockItemNotFound(StockItemId),

    /// The referenced sale does not exist.
    #[error("Sale not found: {0}")]
    SaleNotFound(SaleId),

    /// An error occurred in the ledger store.
    #[error("Store error: {0}")]
    Store(StoreError),
}

impl DomainError {
    /// The input field a user-correctable error belongs to, if any.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            DomainError::InsufficientStock { .. } => Some("quantity"),
            DomainError::InvalidQuantity { field, .. } | DomainError::InvalidPrice { field, .. } => {
                Some(*field)
            }
            DomainError::InvalidName(_) => Some("name"),
            _ => None,
        }
    }

    /// Message shown next to the offending field.
    pub fn field_message(&self) -> String {
        match self {
            DomainError::InsufficientStock { .. } => INSUFFICIENT_STOCK_MESSAGE.to_string(),
            DomainError::InvalidQuantity { reason, .. }
            | DomainError::InvalidPrice { reason, .. } => (*reason).to_string(),
            DomainError::InvalidName(reason) => (*reason).to_string(),
            other => other.to_string(),
        }
    }
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InsufficientStock {
                item_id,
                requested,
                available,
            } => DomainError::InsufficientStock {
                item_id,
                requested,
                available,
            },
            StoreError::StockItemNotFound(id) => DomainError::StockItemNotFound(id),
            StoreError::SaleNotFound(id) => DomainError::SaleNotFound(id),
            other => DomainError::Store(other),
        }
    }
}
