//! Reporting component for the stock ledger.
//!
//! Read-only aggregation over the sale ledger:
//! - [`Period`] names a calendar slice relative to an "as of" instant
//! - [`PercentChange`] compares two periods, with an explicit undefined case
//! - [`DashboardService`] assembles a [`MetricsSnapshot`] and the ledger page

pub mod change;
pub mod dashboard;
pub mod error;
pub mod period;
pub mod snapshot;

pub use change::PercentChange;
pub use dashboard::{Dashboard, DashboardService, SalesSummary};
pub use error::{ReportingError, Result};
pub use period::{Period, WeekOffset};
pub use snapshot::{MetricsSnapshot, MonthTotals, PeriodComparison, WeekdayRevenue};
