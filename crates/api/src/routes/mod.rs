//! HTTP route handlers.

pub mod dashboard;
pub mod health;
pub mod metrics;
pub mod sales;
pub mod stock;

use std::str::FromStr;

use domain::LedgerService;
use reporting::DashboardService;
use store::LedgerStore;

use crate::error::ApiError;

/// Shared application state accessible from all ledger handlers.
pub struct AppState<S: LedgerStore> {
    pub ledger: LedgerService<S>,
    pub reporting: DashboardService<S>,
}

impl<S: LedgerStore + Clone> AppState<S> {
    /// Builds both services over clones of one store.
    pub fn new(store: S) -> Self {
        Self {
            ledger: LedgerService::new(store.clone()),
            reporting: DashboardService::new(store),
        }
    }
}

/// Parses a path id, answering 400 when it is not a UUID.
fn parse_id<T>(kind: &str, raw: &str) -> Result<T, ApiError>
where
    T: FromStr<Err = uuid::Error>,
{
    raw.parse()
        .map_err(|e| ApiError::BadRequest(format!("Invalid {kind} id: {e}")))
}
