//! Administrative commands for stock items.

use common::{Money, StockItemId};
use rust_decimal::Decimal;

/// Command to add a stock item.
#[derive(Debug, Clone)]
pub struct CreateStockItem {
    pub name: String,
    pub sale_price: Money,
    pub purchase_price: Money,
    pub quantity_on_hand: Decimal,
}

impl CreateStockItem {
    pub fn new(
        name: impl Into<String>,
        sale_price: Money,
        purchase_price: Money,
        quantity_on_hand: Decimal,
    ) -> Self {
        Self {
            name: name.into(),
            sale_price,
            purchase_price,
            quantity_on_hand,
        }
    }
}

/// Command to edit a stock item. Unset fields are left alone.
#[derive(Debug, Clone)]
pub struct UpdateStockItem {
    pub item_id: StockItemId,
    pub name: Option<String>,
    pub sale_price: Option<Money>,
    pub purchase_price: Option<Money>,
    pub quantity_on_hand: Option<Decimal>,
}

impl UpdateStockItem {
    pub fn new(item_id: StockItemId) -> Self {
        Self {
            item_id,
            name: None,
            sale_price: None,
            purchase_price: None,
            quantity_on_hand: None,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn sale_price(mut self, price: Money) -> Self {
        self.sale_price = Some(price);
        self
    }

    pub fn purchase_price(mut self, price: Money) -> Self {
        self.purchase_price = Some(price);
        self
    }

    pub fn quantity_on_hand(mut self, quantity: Decimal) -> Self {
        self.quantity_on_hand = Some(quantity);
        self
    }
}
