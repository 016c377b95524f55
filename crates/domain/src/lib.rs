//! Ledger component for the stock ledger.
//!
//! This crate owns the write side:
//! - stock item administration (create, edit, delete)
//! - sale recording with stock validation and atomic decrement
//! - validation of names, prices and quantities into field-level errors

pub mod error;
pub mod ledger;

pub use error::DomainError;
pub use ledger::{
    CreateStockItem, LedgerService, Quantity, UpdateStockItem, validate_name, validate_price,
    validate_stock_level,
};
