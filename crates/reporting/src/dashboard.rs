//! Dashboard assembly over a ledger store.

use std::time::Instant;

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use store::{LedgerStore, LedgerStoreExt, Page, PageRequest, SaleLine, Totals};

use crate::error::Result;
use crate::period::{Period, WeekOffset};
use crate::snapshot::{MetricsSnapshot, MonthTotals, PeriodComparison, WeekdayRevenue};

/// The dashboard: metrics plus one page of the sale ledger, newest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub metrics: MetricsSnapshot,
    pub sales: Page<SaleLine>,
}

/// Every sale, oldest first, with lifetime totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesSummary {
    pub sales: Vec<SaleLine>,
    pub totals: Totals,
}

/// Read-side service computing dashboard figures.
///
/// Every figure is one `sales_totals` query over the window a [`Period`]
/// resolves to, so the store does the summing.
pub struct DashboardService<S: LedgerStore> {
    store: S,
}

impl<S: LedgerStore> DashboardService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Revenue and profit for `period`, resolved against `as_of`.
    pub async fn totals_for(&self, period: Period, as_of: DateTime<Utc>) -> Result<Totals> {
        Ok(self.store.sales_totals(period.window(as_of)).await?)
    }

    /// Computes every dashboard figure for `as_of`.
    #[tracing::instrument(skip(self))]
    pub async fn compute_metrics(&self, as_of: DateTime<Utc>) -> Result<MetricsSnapshot> {
        let started = Instant::now();

        let total = self.totals_for(Period::AllTime, as_of).await?;

        let week = PeriodComparison::new(
            self.totals_for(Period::Week(WeekOffset::Current), as_of)
                .await?,
            self.totals_for(Period::Week(WeekOffset::Previous), as_of)
                .await?,
        );

        let month = PeriodComparison::new(
            self.totals_for(Period::current_month(as_of), as_of).await?,
            self.totals_for(Period::previous_month(as_of), as_of).await?,
        );

        let mut weekdays = Vec::with_capacity(7);
        for period in Period::weekdays() {
            let Period::Weekday(weekday) = period else {
                continue;
            };
            let revenue = self.totals_for(period, as_of).await?.revenue;
            weekdays.push(WeekdayRevenue { weekday, revenue });
        }

        let mut months = Vec::with_capacity(12);
        for period in Period::months_of(as_of.year()) {
            let Period::Month { month, .. } = period else {
                continue;
            };
            let totals = self.totals_for(period, as_of).await?;
            months.push(MonthTotals { month, totals });
        }

        metrics::histogram!("reporting_dashboard_seconds").record(started.elapsed().as_secs_f64());
        tracing::debug!(revenue = %total.revenue, profit = %total.profit, "dashboard metrics computed");

        Ok(MetricsSnapshot {
            as_of,
            total,
            week,
            month,
            weekdays,
            months,
        })
    }

    /// Metrics for `as_of` together with one page of sales.
    pub async fn dashboard(&self, as_of: DateTime<Utc>, page: PageRequest) -> Result<Dashboard> {
        let metrics = self.compute_metrics(as_of).await?;
        let sales = self.store.page_sales(page).await?;
        Ok(Dashboard { metrics, sales })
    }

    /// The full sale ledger with lifetime totals.
    pub async fn sales_summary(&self) -> Result<SalesSummary> {
        let sales = self.store.list_sales().await?;
        let totals = self.store.lifetime_totals().await?;
        Ok(SalesSummary { sales, totals })
    }
}
