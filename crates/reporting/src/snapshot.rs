//! Dashboard figures computed for one "as of" instant.

use chrono::{DateTime, Utc, Weekday};
use common::Money;
use serde::Serialize;
use store::Totals;

use crate::change::PercentChange;

/// Totals for a period next to the period before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeriodComparison {
    pub current: Totals,
    pub previous: Totals,
    pub revenue_change: PercentChange,
    pub profit_change: PercentChange,
}

impl PeriodComparison {
    pub fn new(current: Totals, previous: Totals) -> Self {
        Self {
            current,
            previous,
            revenue_change: PercentChange::between(current.revenue, previous.revenue),
            profit_change: PercentChange::between(current.profit, previous.profit),
        }
    }
}

/// Revenue for one day of the current ISO week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeekdayRevenue {
    pub weekday: Weekday,
    pub revenue: Money,
}

/// Revenue and profit for one month of the current year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthTotals {
    /// 1 for January through 12 for December.
    pub month: u32,
    #[serde(flatten)]
    pub totals: Totals,
}

/// Everything the dashboard shows above the sale ledger.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub as_of: DateTime<Utc>,
    /// Lifetime revenue and profit.
    pub total: Totals,
    pub week: PeriodComparison,
    pub month: PeriodComparison,
    /// Monday through Sunday, in order.
    pub weekdays: Vec<WeekdayRevenue>,
    /// January through December of the "as of" year, in order.
    pub months: Vec<MonthTotals>,
}

impl MetricsSnapshot {
    /// Revenue for `day` of the current week.
    pub fn weekday_revenue(&self, day: Weekday) -> Money {
        self.weekdays
            .iter()
            .find(|w| w.weekday == day)
            .map(|w| w.revenue)
            .unwrap_or_default()
    }

    /// Totals for `month` (1..=12) of the current year.
    pub fn month_totals(&self, month: u32) -> Totals {
        self.months
            .iter()
            .find(|m| m.month == month)
            .map(|m| m.totals)
            .unwrap_or_default()
    }
}
