//! API server entry point.

use api::auth::AuthToken;
use api::config::Config;
use axum::Router;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use sqlx::postgres::PgPoolOptions;
use store::{InMemoryLedgerStore, PostgresLedgerStore, StoreError};
use thiserror::Error;
use tokio::signal;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Failures that stop the server before or while serving.
#[derive(Debug, Error)]
enum StartupError {
    #[error("failed to install Prometheus recorder: {0}")]
    Metrics(#[from] BuildError),
    #[error("failed to connect to database: {0}")]
    Database(#[from] sqlx::Error),
    #[error("failed to prepare ledger store: {0}")]
    Store(#[from] StoreError),
    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, starting graceful shutdown");
        }
    }
}

async fn serve(config: &Config, app: Router) -> Result<(), StartupError> {
    let addr = config.addr();
    tracing::info!(%addr, "starting API server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server shut down gracefully");
    Ok(())
}

async fn run(config: Config) -> Result<(), StartupError> {
    let metrics_handle = PrometheusBuilder::new().install_recorder()?;

    let auth = AuthToken::new(config.auth_token.clone());
    if config.auth_token.is_none() {
        tracing::warn!("AUTH_TOKEN is not set; every ledger route will answer 401");
    }

    match &config.database_url {
        Some(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(config.database_max_connections)
                .connect(url)
                .await?;
            let store = PostgresLedgerStore::new(pool);
            store.run_migrations().await?;
            tracing::info!(
                max_connections = config.database_max_connections,
                "using PostgreSQL ledger store"
            );

            let state = api::create_default_state(store);
            serve(&config, api::create_app(state, auth, metrics_handle)).await
        }
        None => {
            tracing::warn!("DATABASE_URL is not set; using the in-memory ledger store");

            let state = api::create_default_state(InMemoryLedgerStore::new());
            serve(&config, api::create_app(state, auth, metrics_handle)).await
        }
    }
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run(config).await {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "server failed");
            std::process::ExitCode::FAILURE
        }
    }
}
