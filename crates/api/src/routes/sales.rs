//! Sale recording and ledger endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use common::{Money, SaleId, StockItemId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use store::{LedgerStore, SaleLine, Totals};

use super::{AppState, parse_id};
use crate::error::{ApiError, FieldErrors, REQUIRED_FIELD_MESSAGE};

// -- Request types --

/// Sale form. Both fields are required; they are optional here so a missing
/// one is reported as a field error rather than a body rejection.
#[derive(Debug, Deserialize)]
pub struct CreateSaleRequest {
    pub item_id: Option<String>,
    pub quantity: Option<Decimal>,
}

// -- Response types --

#[derive(Debug, Serialize)]
pub struct SaleResponse {
    pub id: SaleId,
    pub sold_at: DateTime<Utc>,
    pub quantity: Decimal,
    pub item_id: Option<StockItemId>,
    pub item_name: Option<String>,
    pub revenue: Option<Money>,
    pub profit: Option<Money>,
}

impl From<SaleLine> for SaleResponse {
    fn from(line: SaleLine) -> Self {
        let revenue = line.revenue();
        let profit = line.profit();
        Self {
            id: line.sale.id,
            sold_at: line.sale.sold_at,
            quantity: line.sale.quantity,
            item_id: line.sale.item_id,
            item_name: line.item.map(|item| item.name),
            revenue,
            profit,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SalesListResponse {
    pub sales: Vec<SaleResponse>,
    pub totals: Totals,
}

// -- Handlers --

/// POST /sales: record a sale and decrement stock.
#[tracing::instrument(skip(state))]
pub async fn create<S: LedgerStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<CreateSaleRequest>,
) -> Result<(StatusCode, Json<SaleResponse>), ApiError> {
    let mut missing = FieldErrors::new();
    if req.item_id.is_none() {
        missing.insert("item_id".to_string(), vec![REQUIRED_FIELD_MESSAGE.to_string()]);
    }
    if req.quantity.is_none() {
        missing.insert("quantity".to_string(), vec![REQUIRED_FIELD_MESSAGE.to_string()]);
    }
    let (Some(item_id), Some(quantity)) = (req.item_id, req.quantity) else {
        return Err(ApiError::Validation(missing));
    };

    let item_id: StockItemId = parse_id("stock item", &item_id)?;
    let line = state.ledger.record_sale(item_id, quantity).await?;

    Ok((StatusCode::CREATED, Json(line.into())))
}

/// GET /sales: every sale, oldest first, with lifetime totals.
#[tracing::instrument(skip(state))]
pub async fn list<S: LedgerStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<SalesListResponse>, ApiError> {
    let summary = state.reporting.sales_summary().await?;

    Ok(Json(SalesListResponse {
        sales: summary.sales.into_iter().map(SaleResponse::from).collect(),
        totals: summary.totals,
    }))
}

/// GET /sales/{id}: one sale.
#[tracing::instrument(skip(state))]
pub async fn get<S: LedgerStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<SaleResponse>, ApiError> {
    let sale_id: SaleId = parse_id("sale", &id)?;
    let line = state
        .ledger
        .get_sale(sale_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Sale {id} not found")))?;

    Ok(Json(line.into()))
}

/// DELETE /sales/{id}: remove a sale. Stock is not restored.
#[tracing::instrument(skip(state))]
pub async fn delete<S: LedgerStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let sale_id: SaleId = parse_id("sale", &id)?;
    state.ledger.delete_sale(sale_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
