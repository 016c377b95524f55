//! Shared types for the stock ledger workspace.

pub mod money;
pub mod types;

pub use money::Money;
pub use types::{SaleId, StockItemId};
