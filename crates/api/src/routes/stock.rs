//! Stock item administration endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use common::{Money, StockItemId};
use domain::{CreateStockItem, UpdateStockItem};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use store::{LedgerStore, StockItem};

use super::{AppState, parse_id};
use crate::error::{ApiError, FieldErrors, REQUIRED_FIELD_MESSAGE};

// -- Request types --

#[derive(Debug, Deserialize)]
pub struct CreateStockItemRequest {
    pub name: Option<String>,
    pub sale_price: Option<Decimal>,
    pub purchase_price: Option<Decimal>,
    pub quantity_on_hand: Option<Decimal>,
}

/// Partial edit; absent fields keep their value.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateStockItemRequest {
    pub name: Option<String>,
    pub sale_price: Option<Decimal>,
    pub purchase_price: Option<Decimal>,
    pub quantity_on_hand: Option<Decimal>,
}

// -- Response types --

#[derive(Debug, Serialize)]
pub struct StockItemResponse {
    pub id: StockItemId,
    pub name: String,
    pub sale_price: Money,
    pub purchase_price: Money,
    pub unit_profit: Money,
    pub quantity_on_hand: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<StockItem> for StockItemResponse {
    fn from(item: StockItem) -> Self {
        Self {
            unit_profit: item.unit_profit(),
            id: item.id,
            name: item.name,
            sale_price: item.sale_price,
            purchase_price: item.purchase_price,
            quantity_on_hand: item.quantity_on_hand,
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

// -- Handlers --

/// POST /stock: add a stock item.
#[tracing::instrument(skip(state))]
pub async fn create<S: LedgerStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<CreateStockItemRequest>,
) -> Result<(StatusCode, Json<StockItemResponse>), ApiError> {
    let mut missing = FieldErrors::new();
    for (field, present) in [
        ("name", req.name.is_some()),
        ("sale_price", req.sale_price.is_some()),
        ("purchase_price", req.purchase_price.is_some()),
        ("quantity_on_hand", req.quantity_on_hand.is_some()),
    ] {
        if !present {
            missing.insert(field.to_string(), vec![REQUIRED_FIELD_MESSAGE.to_string()]);
        }
    }
    let (Some(name), Some(sale_price), Some(purchase_price), Some(quantity_on_hand)) = (
        req.name,
        req.sale_price,
        req.purchase_price,
        req.quantity_on_hand,
    ) else {
        return Err(ApiError::Validation(missing));
    };

    let item = state
        .ledger
        .create_stock_item(CreateStockItem::new(
            name,
            Money::new(sale_price),
            Money::new(purchase_price),
            quantity_on_hand,
        ))
        .await?;

    Ok((StatusCode::CREATED, Json(item.into())))
}

/// GET /stock: every item by name, as offered on the sale form.
#[tracing::instrument(skip(state))]
pub async fn list<S: LedgerStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<StockItemResponse>>, ApiError> {
    let items = state.ledger.list_stock_items().await?;
    Ok(Json(items.into_iter().map(StockItemResponse::from).collect()))
}

/// GET /stock/{id}: one stock item.
#[tracing::instrument(skip(state))]
pub async fn get<S: LedgerStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<StockItemResponse>, ApiError> {
    let item_id: StockItemId = parse_id("stock item", &id)?;
    let item = state
        .ledger
        .get_stock_item(item_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Stock item {id} not found")))?;

    Ok(Json(item.into()))
}

/// PUT /stock/{id}: edit name, prices or quantity on hand.
#[tracing::instrument(skip(state))]
pub async fn update<S: LedgerStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateStockItemRequest>,
) -> Result<Json<StockItemResponse>, ApiError> {
    let item_id: StockItemId = parse_id("stock item", &id)?;

    let mut cmd = UpdateStockItem::new(item_id);
    if let Some(name) = req.name {
        cmd = cmd.name(name);
    }
    if let Some(price) = req.sale_price {
        cmd = cmd.sale_price(Money::new(price));
    }
    if let Some(price) = req.purchase_price {
        cmd = cmd.purchase_price(Money::new(price));
    }
    if let Some(quantity) = req.quantity_on_hand {
        cmd = cmd.quantity_on_hand(quantity);
    }

    let item = state.ledger.update_stock_item(cmd).await?;
    Ok(Json(item.into()))
}

/// DELETE /stock/{id}: remove an item. Its sales remain without an item.
#[tracing::instrument(skip(state))]
pub async fn delete<S: LedgerStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let item_id: StockItemId = parse_id("stock item", &id)?;
    state.ledger.delete_stock_item(item_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
