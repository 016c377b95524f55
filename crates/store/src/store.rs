use async_trait::async_trait;

use crate::{
    NewSale, NewStockItem, Page, PageRequest, Result, SaleId, SaleLine, StockItem,
    StockItemChanges, StockItemId, StoreError, TimeWindow, Totals,
};

/// Core trait for ledger storage.
///
/// Implementations own two record kinds, stock items and sales, and must
/// keep the sale/decrement pair atomic. All implementations must be
/// thread-safe (Send + Sync).
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Inserts a new stock item.
    async fn insert_stock_item(&self, item: NewStockItem) -> Result<StockItem>;

    /// Applies a partial update to a stock item.
    ///
    /// Fails with `StockItemNotFound` if the item does not exist.
    async fn update_stock_item(
        &self,
        id: StockItemId,
        changes: StockItemChanges,
    ) -> Result<StockItem>;

    /// Retrieves a stock item. Returns None if it doesn't exist.
    async fn get_stock_item(&self, id: StockItemId) -> Result<Option<StockItem>>;

    /// Lists all stock items ordered by name.
    async fn list_stock_items(&self) -> Result<Vec<StockItem>>;

    /// Deletes a stock item.
    ///
    /// Sales referring to it keep existing with their item reference cleared.
    async fn delete_stock_item(&self, id: StockItemId) -> Result<()>;

    /// Records a sale and decrements the item's quantity on hand.
    ///
    /// Both writes happen atomically. The decrement is conditional on the
    /// quantity still being available at write time, so two concurrent
    /// sales can never oversell an item. Fails with `InsufficientStock`
    /// (nothing written) or `StockItemNotFound`.
    async fn record_sale(&self, sale: NewSale) -> Result<SaleLine>;

    /// Retrieves a sale joined with its item. Returns None if it doesn't exist.
    async fn get_sale(&self, id: SaleId) -> Result<Option<SaleLine>>;

    /// Deletes a sale. Stock is not restored.
    async fn delete_sale(&self, id: SaleId) -> Result<()>;

    /// Lists every sale, oldest first.
    async fn list_sales(&self) -> Result<Vec<SaleLine>>;

    /// Returns one page of sales, newest first.
    ///
    /// A page number past the end yields the last page.
    async fn page_sales(&self, page: PageRequest) -> Result<Page<SaleLine>>;

    /// Sums revenue and profit over sales inside `window` (all sales if None).
    ///
    /// Sales whose item has been deleted are left out. Empty sets sum to zero.
    async fn sales_totals(&self, window: Option<TimeWindow>) -> Result<Totals>;
}

/// Extension trait providing convenience methods for ledger stores.
#[async_trait]
pub trait LedgerStoreExt: LedgerStore {
    /// Loads a stock item or fails with `StockItemNotFound`.
    async fn require_stock_item(&self, id: StockItemId) -> Result<StockItem> {
        self.get_stock_item(id)
            .await?
            .ok_or(StoreError::StockItemNotFound(id))
    }

    /// Loads a sale or fails with `SaleNotFound`.
    async fn require_sale(&self, id: SaleId) -> Result<SaleLine> {
        self.get_sale(id).await?.ok_or(StoreError::SaleNotFound(id))
    }

    /// Totals over the whole ledger.
    async fn lifetime_totals(&self) -> Result<Totals> {
        self.sales_totals(None).await
    }
}

// Blanket implementation for all LedgerStore implementations
impl<T: LedgerStore + ?Sized> LedgerStoreExt for T {}
