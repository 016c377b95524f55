use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::{
    ItemSnapshot, Money, NewSale, NewStockItem, Page, PageRequest, Result, Sale, SaleId,
    SaleLine, StockItem, StockItemChanges, StockItemId, StoreError, TimeWindow, Totals,
    store::LedgerStore,
};

const STOCK_ITEM_COLUMNS: &str =
    "id, name, sale_price, purchase_price, quantity_on_hand, created_at, updated_at";

const SALE_LINE_SELECT: &str = r#"
    SELECT s.id, s.sold_at, s.quantity, s.item_id, s.created_at, s.updated_at,
           i.name AS item_name, i.sale_price AS item_sale_price,
           i.purchase_price AS item_purchase_price
    FROM sales s
    LEFT JOIN stock_items i ON i.id = s.item_id
"#;

/// PostgreSQL-backed ledger store implementation.
#[derive(Clone)]
pub struct PostgresLedgerStore {
    pool: PgPool,
}

impl PostgresLedgerStore {
    /// Creates a new PostgreSQL ledger store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }

    fn row_to_stock_item(row: PgRow) -> Result<StockItem> {
        Ok(StockItem {
            id: StockItemId::from_uuid(row.try_get::<Uuid, _>("id")?),
            name: row.try_get("name")?,
            sale_price: Money::new(row.try_get("sale_price")?),
            purchase_price: Money::new(row.try_get("purchase_price")?),
            quantity_on_hand: row.try_get("quantity_on_hand")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn row_to_sale(row: &PgRow) -> Result<Sale> {
        Ok(Sale {
            id: SaleId::from_uuid(row.try_get::<Uuid, _>("id")?),
            sold_at: row.try_get::<DateTime<Utc>, _>("sold_at")?,
            quantity: row.try_get("quantity")?,
            item_id: row
                .try_get::<Option<Uuid>, _>("item_id")?
                .map(StockItemId::from_uuid),
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn row_to_sale_line(row: PgRow) -> Result<SaleLine> {
        let sale = Self::row_to_sale(&row)?;
        let name: Option<String> = row.try_get("item_name")?;
        let sale_price: Option<Decimal> = row.try_get("item_sale_price")?;
        let purchase_price: Option<Decimal> = row.try_get("item_purchase_price")?;

        let item = match (name, sale_price, purchase_price) {
            (Some(name), Some(sale_price), Some(purchase_price)) => Some(ItemSnapshot {
                name,
                sale_price: Money::new(sale_price),
                purchase_price: Money::new(purchase_price),
            }),
            _ => None,
        };

        Ok(SaleLine { sale, item })
    }
}

#[async_trait]
impl LedgerStore for PostgresLedgerStore {
    async fn insert_stock_item(&self, item: NewStockItem) -> Result<StockItem> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO stock_items (id, name, sale_price, purchase_price, quantity_on_hand)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {STOCK_ITEM_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&item.name)
        .bind(item.sale_price.amount())
        .bind(item.purchase_price.amount())
        .bind(item.quantity_on_hand)
        .fetch_one(&self.pool)
        .await?;

        Self::row_to_stock_item(row)
    }

    async fn update_stock_item(
        &self,
        id: StockItemId,
        changes: StockItemChanges,
    ) -> Result<StockItem> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE stock_items SET
                name = COALESCE($2, name),
                sale_price = COALESCE($3, sale_price),
                purchase_price = COALESCE($4, purchase_price),
                quantity_on_hand = COALESCE($5, quantity_on_hand),
                updated_at = now()
            WHERE id = $1
            RETURNING {STOCK_ITEM_COLUMNS}
            "#
        ))
        .bind(id.as_uuid())
        .bind(changes.name)
        .bind(changes.sale_price.map(|m| m.amount()))
        .bind(changes.purchase_price.map(|m| m.amount()))
        .bind(changes.quantity_on_hand)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Self::row_to_stock_item(row),
            None => Err(StoreError::StockItemNotFound(id)),
        }
    }

    async fn get_stock_item(&self, id: StockItemId) -> Result<Option<StockItem>> {
        let row = sqlx::query(&format!(
            "SELECT {STOCK_ITEM_COLUMNS} FROM stock_items WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_stock_item).transpose()
    }

    async fn list_stock_items(&self) -> Result<Vec<StockItem>> {
        let rows = sqlx::query(&format!(
            "SELECT {STOCK_ITEM_COLUMNS} FROM stock_items ORDER BY name ASC, id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_stock_item).collect()
    }

    async fn delete_stock_item(&self, id: StockItemId) -> Result<()> {
        // sales.item_id is declared ON DELETE SET NULL
        let result = sqlx::query("DELETE FROM stock_items WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::StockItemNotFound(id));
        }
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(item_id = %sale.item_id))]
    async fn record_sale(&self, sale: NewSale) -> Result<SaleLine> {
        let mut tx = self.pool.begin().await?;

        // Conditional decrement: the WHERE clause re-checks availability under
        // the row lock taken by UPDATE, so concurrent sales serialize here.
        let decremented: Option<PgRow> = sqlx::query(
            r#"
            UPDATE stock_items
            SET quantity_on_hand = quantity_on_hand - $2, updated_at = now()
            WHERE id = $1 AND quantity_on_hand >= $2
            RETURNING name, sale_price, purchase_price
            "#,
        )
        .bind(sale.item_id.as_uuid())
        .bind(sale.quantity)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = decremented else {
            let available: Option<Decimal> =
                sqlx::query_scalar("SELECT quantity_on_hand FROM stock_items WHERE id = $1")
                    .bind(sale.item_id.as_uuid())
                    .fetch_optional(&mut *tx)
                    .await?;

            tracing::debug!(?available, requested = %sale.quantity, "sale rejected");
            return Err(match available {
                Some(available) => StoreError::InsufficientStock {
                    item_id: sale.item_id,
                    requested: sale.quantity,
                    available,
                },
                None => StoreError::StockItemNotFound(sale.item_id),
            });
        };

        let item = ItemSnapshot {
            name: row.try_get("name")?,
            sale_price: Money::new(row.try_get("sale_price")?),
            purchase_price: Money::new(row.try_get("purchase_price")?),
        };

        let row = sqlx::query(
            r#"
            INSERT INTO sales (id, sold_at, quantity, item_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, sold_at, quantity, item_id, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(sale.sold_at)
        .bind(sale.quantity)
        .bind(sale.item_id.as_uuid())
        .fetch_one(&mut *tx)
        .await?;
        let record = Self::row_to_sale(&row)?;

        tx.commit().await?;

        Ok(SaleLine {
            sale: record,
            item: Some(item),
        })
    }

    async fn get_sale(&self, id: SaleId) -> Result<Option<SaleLine>> {
        let row = sqlx::query(&format!("{SALE_LINE_SELECT} WHERE s.id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_sale_line).transpose()
    }

    async fn delete_sale(&self, id: SaleId) -> Result<()> {
        let result = sqlx::query("DELETE FROM sales WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::SaleNotFound(id));
        }
        Ok(())
    }

    async fn list_sales(&self) -> Result<Vec<SaleLine>> {
        let rows = sqlx::query(&format!(
            "{SALE_LINE_SELECT} ORDER BY s.sold_at ASC, s.id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_sale_line).collect()
    }

    async fn page_sales(&self, page: PageRequest) -> Result<Page<SaleLine>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;
        let total = total as usize;
        let page = page.clamp(total);

        let rows = sqlx::query(&format!(
            "{SALE_LINE_SELECT} ORDER BY s.sold_at DESC, s.id DESC LIMIT $1 OFFSET $2"
        ))
        .bind(page.size as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await?;

        let items = rows
            .into_iter()
            .map(Self::row_to_sale_line)
            .collect::<Result<Vec<_>>>()?;
        Ok(Page::new(items, page, total))
    }

    async fn sales_totals(&self, window: Option<TimeWindow>) -> Result<Totals> {
        // Inner join: sales whose item was deleted carry no prices and drop out.
        // NUMERIC(28, 2) keeps the sums decodable as Decimal; larger sums fail
        // in the database with a numeric overflow.
        let row = sqlx::query(
            r#"
            SELECT
                ROUND(COALESCE(SUM(i.sale_price * s.quantity), 0), 2)::NUMERIC(28, 2) AS revenue,
                ROUND(COALESCE(SUM((i.sale_price - i.purchase_price) * s.quantity), 0), 2)::NUMERIC(28, 2) AS profit
            FROM sales s
            JOIN stock_items i ON i.id = s.item_id
            WHERE ($1::timestamptz IS NULL OR s.sold_at >= $1)
              AND ($2::timestamptz IS NULL OR s.sold_at < $2)
            "#,
        )
        .bind(window.map(|w| w.start))
        .bind(window.map(|w| w.end))
        .fetch_one(&self.pool)
        .await?;

        Ok(Totals {
            revenue: Money::new(row.try_get("revenue")?),
            profit: Money::new(row.try_get("profit")?),
        })
    }
}
