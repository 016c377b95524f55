pub mod error;
pub mod memory;
pub mod postgres;
pub mod query;
pub mod record;
pub mod store;

pub use common::{Money, SaleId, StockItemId};
pub use error::{Result, StoreError};
pub use memory::InMemoryLedgerStore;
pub use postgres::PostgresLedgerStore;
pub use query::{DEFAULT_PAGE_SIZE, Page, PageRequest, TimeWindow};
pub use record::{
    ItemSnapshot, NewSale, NewStockItem, Sale, SaleLine, StockItem, StockItemChanges, Totals,
};
pub use store::{LedgerStore, LedgerStoreExt};
