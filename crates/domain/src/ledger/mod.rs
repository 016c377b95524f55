//! Stock items and sales.

pub mod commands;
pub mod service;
pub mod value_objects;

pub use commands::{CreateStockItem, UpdateStockItem};
pub use service::LedgerService;
pub use value_objects::{Quantity, validate_name, validate_price, validate_stock_level};
