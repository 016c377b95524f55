//! Integration tests for dashboard aggregation over the in-memory store.

use chrono::{DateTime, Duration, TimeZone, Utc, Weekday};
use common::{Money, StockItemId};
use reporting::{DashboardService, PercentChange, ReportingError};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use store::{
    InMemoryLedgerStore, LedgerStore, NewSale, NewStockItem, PageRequest, StoreError, Totals,
};

fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

fn money(d: Decimal) -> Money {
    Money::new(d)
}

/// Stock item selling at 10.00, bought at 6.00.
async fn add_item(store: &InMemoryLedgerStore, quantity: Decimal) -> StockItemId {
    store
        .insert_stock_item(NewStockItem {
            name: "Coffee".to_string(),
            sale_price: money(dec!(10.00)),
            purchase_price: money(dec!(6.00)),
            quantity_on_hand: quantity,
        })
        .await
        .unwrap()
        .id
}

async fn sell(store: &InMemoryLedgerStore, item_id: StockItemId, quantity: Decimal, at: DateTime<Utc>) {
    store
        .record_sale(NewSale {
            item_id,
            quantity,
            sold_at: at,
        })
        .await
        .unwrap();
}

// Thursday of ISO week 43, 2026.
fn as_of() -> DateTime<Utc> {
    at(2026, 10, 22, 15)
}

#[tokio::test]
async fn empty_ledger_is_all_zero() {
    let service = DashboardService::new(InMemoryLedgerStore::new());
    let metrics = service.compute_metrics(as_of()).await.unwrap();

    assert_eq!(metrics.total, Totals::zero());
    assert_eq!(metrics.week.current, Totals::zero());
    assert!(metrics.week.revenue_change.is_undefined());
    assert!(metrics.month.profit_change.is_undefined());
    assert_eq!(metrics.weekdays.len(), 7);
    assert_eq!(metrics.months.len(), 12);
    assert!(metrics.weekdays.iter().all(|w| w.revenue.is_zero()));
    assert!(metrics.months.iter().all(|m| m.totals == Totals::zero()));
}

#[tokio::test]
async fn single_sale_totals() {
    let store = InMemoryLedgerStore::new();
    let item = add_item(&store, dec!(10)).await;
    sell(&store, item, dec!(3), as_of() - Duration::hours(1)).await;

    let service = DashboardService::new(store);
    let metrics = service.compute_metrics(as_of()).await.unwrap();

    assert_eq!(metrics.total.revenue, money(dec!(30)));
    assert_eq!(metrics.total.profit, money(dec!(12)));
    assert_eq!(metrics.week.current, metrics.total);
    assert_eq!(metrics.weekday_revenue(Weekday::Thu), money(dec!(30)));
    assert_eq!(metrics.month_totals(10), metrics.total);
}

#[tokio::test]
async fn weekday_buckets_sum_to_current_week() {
    let store = InMemoryLedgerStore::new();
    let item = add_item(&store, dec!(100)).await;

    // One sale per day Monday..Sunday with quantity 1..7.
    let monday = at(2026, 10, 19, 8);
    for day in 0..7 {
        sell(&store, item, Decimal::from(day + 1), monday + Duration::days(day)).await;
    }
    // Previous Sunday just before midnight, outside the current week.
    sell(&store, item, dec!(1), at(2026, 10, 18, 23)).await;

    let service = DashboardService::new(store);
    let metrics = service.compute_metrics(as_of()).await.unwrap();

    let expected = [
        (Weekday::Mon, dec!(10)),
        (Weekday::Tue, dec!(20)),
        (Weekday::Wed, dec!(30)),
        (Weekday::Thu, dec!(40)),
        (Weekday::Fri, dec!(50)),
        (Weekday::Sat, dec!(60)),
        (Weekday::Sun, dec!(70)),
    ];
    for (day, revenue) in expected {
        assert_eq!(metrics.weekday_revenue(day), money(revenue), "{day}");
    }

    let week_sum: Money = metrics.weekdays.iter().map(|w| w.revenue).sum();
    assert_eq!(week_sum, metrics.week.current.revenue);
    assert_eq!(metrics.week.current.revenue, money(dec!(280)));
    assert_eq!(metrics.week.previous.revenue, money(dec!(10)));
    assert_eq!(
        metrics.week.revenue_change,
        PercentChange::Value(dec!(2700))
    );
}

#[tokio::test]
async fn week_over_week_change() {
    let store = InMemoryLedgerStore::new();
    let item = add_item(&store, dec!(100)).await;
    sell(&store, item, dec!(4), at(2026, 10, 14, 12)).await;
    sell(&store, item, dec!(5), at(2026, 10, 20, 12)).await;

    let service = DashboardService::new(store);
    let metrics = service.compute_metrics(as_of()).await.unwrap();

    assert_eq!(metrics.week.previous.revenue, money(dec!(40)));
    assert_eq!(metrics.week.current.revenue, money(dec!(50)));
    assert_eq!(metrics.week.revenue_change, PercentChange::Value(dec!(25)));
    assert_eq!(metrics.week.profit_change, PercentChange::Value(dec!(25)));
}

#[tokio::test]
async fn zero_previous_week_is_undefined() {
    let store = InMemoryLedgerStore::new();
    let item = add_item(&store, dec!(100)).await;
    sell(&store, item, dec!(5), at(2026, 10, 20, 12)).await;

    let service = DashboardService::new(store);
    let metrics = service.compute_metrics(as_of()).await.unwrap();

    assert_eq!(metrics.week.current.revenue, money(dec!(50)));
    assert_eq!(metrics.week.revenue_change, PercentChange::Undefined);
}

#[tokio::test]
async fn orphaned_sales_are_excluded() {
    let store = InMemoryLedgerStore::new();
    let kept = add_item(&store, dec!(10)).await;
    let dropped = add_item(&store, dec!(10)).await;
    sell(&store, kept, dec!(1), as_of()).await;
    sell(&store, dropped, dec!(2), as_of()).await;
    store.delete_stock_item(dropped).await.unwrap();

    let service = DashboardService::new(store);
    let metrics = service.compute_metrics(as_of()).await.unwrap();
    assert_eq!(metrics.total.revenue, money(dec!(10)));
    assert_eq!(metrics.week.current.revenue, money(dec!(10)));

    let summary = service.sales_summary().await.unwrap();
    assert_eq!(summary.sales.len(), 2);
    assert_eq!(summary.totals.revenue, money(dec!(10)));
}

#[tokio::test]
async fn month_buckets_cover_current_year_only() {
    let store = InMemoryLedgerStore::new();
    let item = add_item(&store, dec!(100)).await;
    sell(&store, item, dec!(1), at(2025, 3, 10, 0)).await;
    sell(&store, item, dec!(2), at(2026, 3, 31, 23)).await;
    sell(&store, item, dec!(3), at(2026, 9, 1, 0)).await;
    sell(&store, item, dec!(4), at(2026, 10, 2, 0)).await;

    let service = DashboardService::new(store);
    let metrics = service.compute_metrics(as_of()).await.unwrap();

    assert_eq!(metrics.month_totals(3).revenue, money(dec!(20)));
    assert_eq!(metrics.month_totals(9).revenue, money(dec!(30)));
    assert_eq!(metrics.month_totals(10).profit, money(dec!(16)));
    assert_eq!(metrics.month_totals(1), Totals::zero());

    assert_eq!(metrics.month.current.revenue, money(dec!(40)));
    assert_eq!(metrics.month.previous.revenue, money(dec!(30)));
    assert_eq!(metrics.month.revenue_change.value(), Some(dec!(33.33)));
    assert_eq!(metrics.total.revenue, money(dec!(100)));
}

#[tokio::test]
async fn january_compares_with_previous_december() {
    let store = InMemoryLedgerStore::new();
    let item = add_item(&store, dec!(100)).await;
    sell(&store, item, dec!(2), at(2026, 12, 15, 0)).await;
    sell(&store, item, dec!(1), at(2027, 1, 10, 0)).await;

    let service = DashboardService::new(store);
    let metrics = service.compute_metrics(at(2027, 1, 20, 0)).await.unwrap();

    assert_eq!(metrics.month.previous.revenue, money(dec!(20)));
    assert_eq!(metrics.month.current.revenue, money(dec!(10)));
    assert_eq!(metrics.month.revenue_change, PercentChange::Value(dec!(-50)));
    // December belongs to last year's buckets.
    assert_eq!(metrics.month_totals(12), Totals::zero());
    assert_eq!(metrics.month_totals(1).revenue, money(dec!(10)));
}

#[tokio::test]
async fn dashboard_pages_newest_first() {
    let store = InMemoryLedgerStore::new();
    let item = add_item(&store, dec!(100)).await;
    let start = at(2026, 10, 1, 0);
    for hour in 0..12 {
        sell(&store, item, dec!(1), start + Duration::hours(hour)).await;
    }

    let service = DashboardService::new(store);
    let dashboard = service
        .dashboard(as_of(), PageRequest::first())
        .await
        .unwrap();
    assert_eq!(dashboard.sales.items.len(), 10);
    assert_eq!(dashboard.sales.total_pages, 2);
    assert_eq!(dashboard.sales.items[0].sale.sold_at, start + Duration::hours(11));

    let last = service
        .dashboard(as_of(), PageRequest::new(99, 10))
        .await
        .unwrap();
    assert_eq!(last.sales.number, 2);
    assert_eq!(last.sales.items.len(), 2);
    assert_eq!(last.sales.items[1].sale.sold_at, start);
    assert_eq!(last.metrics.total.revenue, money(dec!(120)));
}

#[tokio::test]
async fn dashboard_serializes() {
    let store = InMemoryLedgerStore::new();
    let item = add_item(&store, dec!(10)).await;
    sell(&store, item, dec!(3), as_of()).await;

    let service = DashboardService::new(store);
    let dashboard = service
        .dashboard(as_of(), PageRequest::first())
        .await
        .unwrap();
    let json = serde_json::to_value(&dashboard).unwrap();

    assert_eq!(json["metrics"]["total"]["revenue"], "30.00");
    assert!(json["metrics"]["week"]["revenue_change"].is_null());
    assert_eq!(json["metrics"]["weekdays"][3]["weekday"], "Thu");
    assert_eq!(json["sales"]["items"].as_array().unwrap().len(), 1);
    assert_eq!(json["sales"]["number"], 1);
}

#[tokio::test]
async fn totals_serialize_with_two_places() {
    let store = InMemoryLedgerStore::new();
    let service = DashboardService::new(store.clone());
    let json = serde_json::to_value(service.compute_metrics(as_of()).await.unwrap()).unwrap();
    assert_eq!(json["total"]["revenue"], "0.00");
    assert_eq!(json["week"]["current"]["profit"], "0.00");

    let item = store
        .insert_stock_item(NewStockItem {
            name: "Tea".to_string(),
            sale_price: money(dec!(3.99)),
            purchase_price: money(dec!(2.00)),
            quantity_on_hand: dec!(10),
        })
        .await
        .unwrap()
        .id;
    sell(&store, item, dec!(1.5), as_of()).await;

    let json = serde_json::to_value(service.compute_metrics(as_of()).await.unwrap()).unwrap();
    assert_eq!(json["total"]["revenue"], "5.99");
    assert_eq!(json["total"]["profit"], "2.99");
}

#[tokio::test]
async fn oversized_totals_fail_without_panicking() {
    let store = InMemoryLedgerStore::new();
    let huge = money(dec!(9999999999999999.99));
    let item = store
        .insert_stock_item(NewStockItem {
            name: "Gold".to_string(),
            sale_price: huge,
            purchase_price: huge,
            quantity_on_hand: dec!(9999999999999999.99),
        })
        .await
        .unwrap()
        .id;
    sell(&store, item, dec!(9999999999999.00), as_of()).await;

    let service = DashboardService::new(store);
    let err = service.compute_metrics(as_of()).await.unwrap_err();
    assert!(matches!(err, ReportingError::Store(StoreError::TotalsOverflow)));

    let lines = service.store().list_sales().await.unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].revenue(), None);
}

