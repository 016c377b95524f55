//! Reporting error types.

use thiserror::Error;

/// Errors that can occur while computing reports.
#[derive(Debug, Error)]
pub enum ReportingError {
    /// An error occurred in the ledger store.
    #[error("Store error: {0}")]
    Store(#[from] store::StoreError),
}

/// Result type for reporting operations.
pub type Result<T> = std::result::Result<T, ReportingError>;
