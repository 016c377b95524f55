use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::{
    NewSale, NewStockItem, Page, PageRequest, Result, Sale, SaleId, SaleLine, StockItem,
    StockItemChanges, StockItemId, StoreError, TimeWindow, Totals, store::LedgerStore,
};

#[derive(Default)]
struct LedgerState {
    items: HashMap<StockItemId, StockItem>,
    /// Insertion order.
    sales: Vec<Sale>,
}

impl LedgerState {
    fn line(&self, sale: &Sale) -> SaleLine {
        SaleLine {
            sale: sale.clone(),
            item: sale
                .item_id
                .and_then(|id| self.items.get(&id))
                .map(StockItem::snapshot),
        }
    }
}

/// In-memory ledger store for tests and database-less runs.
///
/// Stock items and sales live behind one lock, so the check-and-decrement
/// in `record_sale` is atomic with respect to every other writer.
#[derive(Clone, Default)]
pub struct InMemoryLedgerStore {
    state: Arc<RwLock<LedgerState>>,
}

impl InMemoryLedgerStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of sales stored.
    pub async fn sale_count(&self) -> usize {
        self.state.read().await.sales.len()
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn insert_stock_item(&self, item: NewStockItem) -> Result<StockItem> {
        let now = Utc::now();
        let item = StockItem {
            id: StockItemId::new(),
            name: item.name,
            sale_price: item.sale_price,
            purchase_price: item.purchase_price,
            quantity_on_hand: item.quantity_on_hand,
            created_at: now,
            updated_at: now,
        };

        self.state
            .write()
            .await
            .items
            .insert(item.id, item.clone());
        Ok(item)
    }

    async fn update_stock_item(
        &self,
        id: StockItemId,
        changes: StockItemChanges,
    ) -> Result<StockItem> {
        let mut state = self.state.write().await;
        let item = state
            .items
            .get_mut(&id)
            .ok_or(StoreError::StockItemNotFound(id))?;

        changes.apply(item);
        item.updated_at = Utc::now();
        Ok(item.clone())
    }

    async fn get_stock_item(&self, id: StockItemId) -> Result<Option<StockItem>> {
        Ok(self.state.read().await.items.get(&id).cloned())
    }

    async fn list_stock_items(&self) -> Result<Vec<StockItem>> {
        let state = self.state.read().await;
        let mut items: Vec<_> = state.items.values().cloned().collect();
        items.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(items)
    }

    async fn delete_stock_item(&self, id: StockItemId) -> Result<()> {
        let mut state = self.state.write().await;
        if state.items.remove(&id).is_none() {
            return Err(StoreError::StockItemNotFound(id));
        }

        // ON DELETE SET NULL
        for sale in state.sales.iter_mut().filter(|s| s.item_id == Some(id)) {
            sale.item_id = None;
        }
        Ok(())
    }

    async fn record_sale(&self, sale: NewSale) -> Result<SaleLine> {
        let mut state = self.state.write().await;

        let item = state
            .items
            .get_mut(&sale.item_id)
            .ok_or(StoreError::StockItemNotFound(sale.item_id))?;

        if item.quantity_on_hand < sale.quantity {
            return Err(StoreError::InsufficientStock {
                item_id: sale.item_id,
                requested: sale.quantity,
                available: item.quantity_on_hand,
            });
        }

        let now = Utc::now();
        item.quantity_on_hand -= sale.quantity;
        item.updated_at = now;
        let snapshot = item.snapshot();

        let record = Sale {
            id: SaleId::new(),
            sold_at: sale.sold_at,
            quantity: sale.quantity,
            item_id: Some(sale.item_id),
            created_at: now,
            updated_at: now,
        };
        state.sales.push(record.clone());

        Ok(SaleLine {
            sale: record,
            item: Some(snapshot),
        })
    }

    async fn get_sale(&self, id: SaleId) -> Result<Option<SaleLine>> {
        let state = self.state.read().await;
        Ok(state
            .sales
            .iter()
            .find(|s| s.id == id)
            .map(|s| state.line(s)))
    }

    async fn delete_sale(&self, id: SaleId) -> Result<()> {
        let mut state = self.state.write().await;
        let position = state
            .sales
            .iter()
            .position(|s| s.id == id)
            .ok_or(StoreError::SaleNotFound(id))?;
        state.sales.remove(position);
        Ok(())
    }

    async fn list_sales(&self) -> Result<Vec<SaleLine>> {
        let state = self.state.read().await;
        let mut sales: Vec<_> = state.sales.iter().collect();
        sales.sort_by(|a, b| a.sold_at.cmp(&b.sold_at).then(a.id.cmp(&b.id)));
        Ok(sales.into_iter().map(|s| state.line(s)).collect())
    }

    async fn page_sales(&self, page: PageRequest) -> Result<Page<SaleLine>> {
        let state = self.state.read().await;
        let page = page.clamp(state.sales.len());

        let mut sales: Vec<_> = state.sales.iter().collect();
        sales.sort_by(|a, b| b.sold_at.cmp(&a.sold_at).then(b.id.cmp(&a.id)));

        let items = sales
            .into_iter()
            .skip(page.offset())
            .take(page.size)
            .map(|s| state.line(s))
            .collect();

        Ok(Page::new(items, page, state.sales.len()))
    }

    async fn sales_totals(&self, window: Option<TimeWindow>) -> Result<Totals> {
        let state = self.state.read().await;
        let totals = state
            .sales
            .iter()
            .filter(|s| window.is_none_or(|w| w.contains(s.sold_at)))
            .filter_map(|s| Some((state.items.get(&s.item_id?)?, s.quantity)))
            .try_fold(Totals::zero(), |acc, (item, quantity)| {
                Totals::for_sale(item.sale_price, item.purchase_price, quantity)
                    .and_then(|t| acc.checked_add(t))
            })
            .ok_or(StoreError::TotalsOverflow)?
            .rounded();
        Ok(totals)
    }
}
