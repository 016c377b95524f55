//! Dashboard endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use chrono::Utc;
use reporting::MetricsSnapshot;
use serde::{Deserialize, Serialize};
use store::{DEFAULT_PAGE_SIZE, LedgerStore, Page, PageRequest};

use super::AppState;
use super::sales::SaleResponse;
use crate::error::ApiError;

// -- Request types --

/// `page` is kept raw; anything that is not a positive integer means page 1.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub page: Option<String>,
}

impl DashboardQuery {
    pub fn page_number(&self) -> usize {
        self.page
            .as_deref()
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(1)
            .max(1)
    }
}

// -- Response types --

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub metrics: MetricsSnapshot,
    pub sales: Page<SaleResponse>,
}

// -- Handlers --

/// GET /dashboard?page=N: metrics as of now plus one page of sales, newest first.
#[tracing::instrument(skip(state))]
pub async fn get<S: LedgerStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<DashboardResponse>, ApiError> {
    let page = PageRequest::new(query.page_number(), DEFAULT_PAGE_SIZE);
    let dashboard = state.reporting.dashboard(Utc::now(), page).await?;

    Ok(Json(DashboardResponse {
        metrics: dashboard.metrics,
        sales: dashboard.sales.map(SaleResponse::from),
    }))
}
