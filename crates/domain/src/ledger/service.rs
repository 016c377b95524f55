//! Ledger service: the write side of the stock ledger.

use chrono::{DateTime, Utc};
use common::{SaleId, StockItemId};
use rust_decimal::Decimal;
use store::{
    LedgerStore, LedgerStoreExt, NewSale, NewStockItem, SaleLine, StockItem, StockItemChanges,
};

use crate::error::DomainError;

use super::{
    CreateStockItem, Quantity, UpdateStockItem, validate_name, validate_price,
    validate_stock_level,
};

/// Service for stock items and sales.
///
/// Validates input into field-level errors before anything reaches the
/// store, and relies on the store to keep each sale and its stock
/// decrement in a single transaction.
pub struct LedgerService<S: LedgerStore> {
    store: S,
}

impl<S: LedgerStore> LedgerService<S> {
    /// Creates a new ledger service over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Adds a stock item.
    #[tracing::instrument(skip(self))]
    pub async fn create_stock_item(&self, cmd: CreateStockItem) -> Result<StockItem, DomainError> {
        let item = NewStockItem {
            name: validate_name(&cmd.name)?,
            sale_price: validate_price("sale_price", cmd.sale_price)?,
            purchase_price: validate_price("purchase_price", cmd.purchase_price)?,
            quantity_on_hand: validate_stock_level(cmd.quantity_on_hand)?,
        };

        let item = self.store.insert_stock_item(item).await?;
        metrics::counter!("ledger_stock_items_created_total").increment(1);
        tracing::info!(item_id = %item.id, name = %item.name, "stock item created");
        Ok(item)
    }

    /// Edits a stock item.
    #[tracing::instrument(skip(self))]
    pub async fn update_stock_item(&self, cmd: UpdateStockItem) -> Result<StockItem, DomainError> {
        let changes = StockItemChanges {
            name: cmd.name.as_deref().map(validate_name).transpose()?,
            sale_price: cmd
                .sale_price
                .map(|p| validate_price("sale_price", p))
                .transpose()?,
            purchase_price: cmd
                .purchase_price
                .map(|p| validate_price("purchase_price", p))
                .transpose()?,
            quantity_on_hand: cmd.quantity_on_hand.map(validate_stock_level).transpose()?,
        };

        if changes.is_empty() {
            return Ok(self.store.require_stock_item(cmd.item_id).await?);
        }

        Ok(self.store.update_stock_item(cmd.item_id, changes).await?)
    }

    /// Loads a stock item by ID.
    ///
    /// Returns None if the item doesn't exist.
    pub async fn get_stock_item(&self, id: StockItemId) -> Result<Option<StockItem>, DomainError> {
        Ok(self.store.get_stock_item(id).await?)
    }

    /// Lists stock items by name, as offered on the sale form.
    pub async fn list_stock_items(&self) -> Result<Vec<StockItem>, DomainError> {
        Ok(self.store.list_stock_items().await?)
    }

    /// Deletes a stock item. Its sales stay in the ledger without an item.
    #[tracing::instrument(skip(self))]
    pub async fn delete_stock_item(&self, id: StockItemId) -> Result<(), DomainError> {
        self.store.delete_stock_item(id).await?;
        tracing::info!(item_id = %id, "stock item deleted");
        Ok(())
    }

    /// Records a sale of `quantity` units now.
    pub async fn record_sale(
        &self,
        item_id: StockItemId,
        quantity: Decimal,
    ) -> Result<SaleLine, DomainError> {
        self.record_sale_at(item_id, quantity, Utc::now()).await
    }

    /// Records a sale with an explicit timestamp.
    ///
    /// Fails with `InsufficientStock` when the item holds less than
    /// `quantity`; in that case neither the sale nor the decrement is written.
    #[tracing::instrument(skip(self))]
    pub async fn record_sale_at(
        &self,
        item_id: StockItemId,
        quantity: Decimal,
        sold_at: DateTime<Utc>,
    ) -> Result<SaleLine, DomainError> {
        let quantity = Quantity::new(quantity).inspect_err(|_| {
            metrics::counter!("ledger_sales_rejected_total", "reason" => "invalid_quantity")
                .increment(1);
        })?;

        let result = self
            .store
            .record_sale(NewSale {
                item_id,
                quantity: quantity.value(),
                sold_at,
            })
            .await
            .map_err(DomainError::from);

        match &result {
            Ok(line) => {
                metrics::counter!("ledger_sales_recorded_total").increment(1);
                tracing::info!(sale_id = %line.sale.id, %quantity, "sale recorded");
            }
            Err(DomainError::InsufficientStock { available, .. }) => {
                metrics::counter!("ledger_sales_rejected_total", "reason" => "insufficient_stock")
                    .increment(1);
                tracing::info!(%available, %quantity, "sale rejected: insufficient stock");
            }
            Err(DomainError::StockItemNotFound(_)) => {
                metrics::counter!("ledger_sales_rejected_total", "reason" => "item_not_found")
                    .increment(1);
            }
            Err(_) => {}
        }

        result
    }

    /// Loads a sale by ID.
    ///
    /// Returns None if the sale doesn't exist.
    pub async fn get_sale(&self, id: SaleId) -> Result<Option<SaleLine>, DomainError> {
        Ok(self.store.get_sale(id).await?)
    }

    /// Lists every sale, oldest first.
    pub async fn list_sales(&self) -> Result<Vec<SaleLine>, DomainError> {
        Ok(self.store.list_sales().await?)
    }

    /// Deletes a sale. The stock it consumed is not given back.
    #[tracing::instrument(skip(self))]
    pub async fn delete_sale(&self, id: SaleId) -> Result<(), DomainError> {
        self.store.delete_sale(id).await?;
        tracing::info!(sale_id = %id, "sale deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use common::Money;
    use rust_decimal_macros::dec;
    use store::InMemoryLedgerStore;

    use super::*;

    async fn service_with_item(quantity: Decimal) -> (LedgerService<InMemoryLedgerStore>, StockItem) {
        let service = LedgerService::new(InMemoryLedgerStore::new());
        let item = service
            .create_stock_item(CreateStockItem::new(
                "Coffee",
                Money::new(dec!(10.00)),
                Money::new(dec!(6.00)),
                quantity,
            ))
            .await
            .unwrap();
        (service, item)
    }

    #[tokio::test]
    async fn rejects_non_positive_quantity() {
        let (service, item) = service_with_item(dec!(5)).await;

        let err = service.record_sale(item.id, dec!(0)).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidQuantity { .. }));
        assert_eq!(err.field(), Some("quantity"));

        let item = service.get_stock_item(item.id).await.unwrap().unwrap();
        assert_eq!(item.quantity_on_hand, dec!(5));
    }

    #[tokio::test]
    async fn update_with_no_changes_returns_item() {
        let (service, item) = service_with_item(dec!(5)).await;
        let same = service
            .update_stock_item(UpdateStockItem::new(item.id))
            .await
            .unwrap();
        assert_eq!(same, item);
    }

    #[tokio::test]
    async fn update_validates_fields() {
        let (service, item) = service_with_item(dec!(5)).await;
        let err = service
            .update_stock_item(UpdateStockItem::new(item.id).quantity_on_hand(dec!(-1)))
            .await
            .unwrap_err();
        assert_eq!(err.field(), Some("quantity_on_hand"));
    }

    #[tokio::test]
    async fn create_rejects_bad_name() {
        let service = LedgerService::new(InMemoryLedgerStore::new());
        let err = service
            .create_stock_item(CreateStockItem::new(
                "",
                Money::new(dec!(1.00)),
                Money::new(dec!(1.00)),
                dec!(1),
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidName(_)));
    }
}
