//! HTTP API server with observability for the stock ledger.
//!
//! Provides REST endpoints for stock administration, sale recording and the
//! dashboard, behind a bearer token, with structured logging (tracing) and
//! Prometheus metrics.

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::middleware;
use axum::routing::get;
use metrics_exporter_prometheus::PrometheusHandle;
use store::LedgerStore;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use auth::AuthToken;
use routes::AppState;

/// Creates the Axum application router with all routes and shared state.
///
/// `/health` and `/metrics` are open; everything else requires `auth_token`.
pub fn create_app<S: LedgerStore + Clone + 'static>(
    state: Arc<AppState<S>>,
    auth_token: AuthToken,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::render))
        .with_state(metrics_handle);

    let ledger_router = Router::new()
        .route(
            "/sales",
            get(routes::sales::list::<S>).post(routes::sales::create::<S>),
        )
        .route(
            "/sales/{id}",
            get(routes::sales::get::<S>).delete(routes::sales::delete::<S>),
        )
        .route("/dashboard", get(routes::dashboard::get::<S>))
        .route(
            "/stock",
            get(routes::stock::list::<S>).post(routes::stock::create::<S>),
        )
        .route(
            "/stock/{id}",
            get(routes::stock::get::<S>)
                .put(routes::stock::update::<S>)
                .delete(routes::stock::delete::<S>),
        )
        .route_layer(middleware::from_fn_with_state(
            auth_token,
            auth::require_bearer,
        ))
        .with_state(state);

    Router::new()
        .route("/health", get(routes::health::check))
        .merge(ledger_router)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the application state over `store`.
pub fn create_default_state<S: LedgerStore + Clone + 'static>(store: S) -> Arc<AppState<S>> {
    Arc::new(AppState::new(store))
}
