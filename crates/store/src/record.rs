use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Money, SaleId, StockItemId};

/// A product tracked with its prices and on-hand quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockItem {
    pub id: StockItemId,
    pub name: String,
    pub sale_price: Money,
    pub purchase_price: Money,
    /// May be fractional. Never negative after a committed sale.
    pub quantity_on_hand: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StockItem {
    /// Margin earned on a single unit.
    pub fn unit_profit(&self) -> Money {
        self.sale_price - self.purchase_price
    }

    /// Returns the name and prices as they appear on a sale line.
    pub fn snapshot(&self) -> ItemSnapshot {
        ItemSnapshot {
            name: self.name.clone(),
            sale_price: self.sale_price,
            purchase_price: self.purchase_price,
        }
    }
}

/// Fields for creating a stock item.
#[derive(Debug, Clone, PartialEq)]
pub struct NewStockItem {
    pub name: String,
    pub sale_price: Money,
    pub purchase_price: Money,
    pub quantity_on_hand: Decimal,
}

/// Partial update of a stock item. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StockItemChanges {
    pub name: Option<String>,
    pub sale_price: Option<Money>,
    pub purchase_price: Option<Money>,
    pub quantity_on_hand: Option<Decimal>,
}

impl StockItemChanges {
    /// Returns true if no field would change.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.sale_price.is_none()
            && self.purchase_price.is_none()
            && self.quantity_on_hand.is_none()
    }

    pub(crate) fn apply(self, item: &mut StockItem) {
        if let Some(name) = self.name {
            item.name = name;
        }
        if let Some(price) = self.sale_price {
            item.sale_price = price;
        }
        if let Some(price) = self.purchase_price {
            item.purchase_price = price;
        }
        if let Some(quantity) = self.quantity_on_hand {
            item.quantity_on_hand = quantity;
        }
    }
}

/// A ledger entry recording a quantity sold at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    pub id: SaleId,
    pub sold_at: DateTime<Utc>,
    pub quantity: Decimal,
    /// Cleared when the stock item is deleted; the sale itself survives.
    pub item_id: Option<StockItemId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for recording a sale.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSale {
    pub item_id: StockItemId,
    pub quantity: Decimal,
    pub sold_at: DateTime<Utc>,
}

/// Name and prices of the stock item a sale refers to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSnapshot {
    pub name: String,
    pub sale_price: Money,
    pub purchase_price: Money,
}

/// A sale joined with its stock item, if the item still exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleLine {
    pub sale: Sale,
    pub item: Option<ItemSnapshot>,
}

impl SaleLine {
    /// Sale price times quantity, rounded to cents.
    ///
    /// `None` once the item is gone, or if the product does not fit a `Decimal`.
    pub fn revenue(&self) -> Option<Money> {
        self.totals().map(|t| t.revenue)
    }

    /// Margin times quantity, rounded to cents. `None` as for [`SaleLine::revenue`].
    pub fn profit(&self) -> Option<Money> {
        self.totals().map(|t| t.profit)
    }

    fn totals(&self) -> Option<Totals> {
        let item = self.item.as_ref()?;
        Totals::for_sale(item.sale_price, item.purchase_price, self.sale.quantity)
            .map(|t| t.rounded())
    }
}

/// Revenue and profit summed over a set of sales.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub revenue: Money,
    pub profit: Money,
}

impl Totals {
    pub fn zero() -> Self {
        Self::default()
    }

    /// Totals contributed by one sale of `quantity` units.
    ///
    /// Returns None if either product overflows.
    pub fn for_sale(sale_price: Money, purchase_price: Money, quantity: Decimal) -> Option<Self> {
        let revenue = sale_price.checked_times(quantity)?;
        let cost = purchase_price.checked_times(quantity)?;
        Some(Self {
            revenue,
            profit: revenue.checked_sub(cost)?,
        })
    }

    /// Adds two totals. Returns None on overflow.
    pub fn checked_add(&self, rhs: Totals) -> Option<Self> {
        Some(Self {
            revenue: self.revenue.checked_add(rhs.revenue)?,
            profit: self.profit.checked_add(rhs.profit)?,
        })
    }

    /// Both amounts rounded to two decimal places.
    pub fn rounded(&self) -> Self {
        Self {
            revenue: self.revenue.rounded(),
            profit: self.profit.rounded(),
        }
    }
}
