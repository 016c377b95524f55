use rust_decimal::Decimal;
use thiserror::Error;

use crate::{SaleId, StockItemId};

/// Errors that can occur when interacting with the ledger store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The referenced stock item does not exist.
    #[error("Stock item not found: {0}")]
    StockItemNotFound(StockItemId),

    /// The referenced sale does not exist.
    #[error("Sale not found: {0}")]
    SaleNotFound(SaleId),

    /// The stock item does not hold enough quantity for the sale.
    /// Nothing was written.
    #[error(
        "Insufficient stock for item {item_id}: requested {requested}, available {available}"
    )]
    InsufficientStock {
        item_id: StockItemId,
        requested: Decimal,
        available: Decimal,
    },

    /// Revenue or profit does not fit a decimal.
    #[error("Sales totals overflowed")]
    TotalsOverflow,

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Result type for ledger store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
