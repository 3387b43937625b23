//! Customer Registry - API Server Binary
//!
//! # Usage
//!
//! ```bash
//! # PostgreSQL storage
//! API_DATABASE_URL=postgres://localhost/customers cargo run --bin customer-api
//!
//! # In-memory storage, JSON logs
//! API_STORAGE=memory API_LOG_JSON=true cargo run --bin customer-api
//! ```
//!
//! # Environment Variables
//!
//! * `API_HOST` - Server host (default: 0.0.0.0)
//! * `API_PORT` - Server port (default: 8080)
//! * `API_STORAGE` - `postgres` or `memory` (default: postgres)
//! * `API_DATABASE_URL` - PostgreSQL connection string, required for postgres
//! * `API_DB_MAX_CONNECTIONS` - Pool size (default: 10)
//! * `API_VIACEP_BASE_URL` - Lookup service (default: https://viacep.com.br/)
//! * `API_LOOKUP_TIMEOUT_SECS` - Lookup request timeout (default: 10)
//! * `API_LOG_LEVEL` - trace, debug, info, warn, error (default: info)
//! * `API_LOG_JSON` - Emit JSON log lines (default: false)

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use core_kernel::{CircuitBreakerConfig, HealthCheckable};
use domain_customer::{
    AddressPort, AddressResolver, CustomerPort, CustomerService,
    InMemoryStore, ViaCepAdapter, ViaCepConfig,
};
use infra_db::{create_pool, run_migrations, DatabaseConfig, PostgresCustomerAdapter};
use interface_api::config::{ApiConfig, StorageBackend};
use interface_api::{create_router, AppState};

/// Storage ports plus the adapter that backs them, for health checks
struct Storage {
    customers: Arc<dyn CustomerPort>,
    addresses: Arc<dyn AddressPort>,
    health: Arc<dyn HealthCheckable>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env().context("invalid configuration")?;

    init_tracing(&config);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        storage = ?config.storage,
        "Starting customer API server"
    );

    let storage = build_storage(&config).await?;
    let lookup = build_lookup(&config)?;

    let resolver = Arc::new(AddressResolver::new(storage.addresses, lookup.clone()));
    let service = CustomerService::new(storage.customers, resolver);
    let lookup_health: Arc<dyn HealthCheckable> = lookup;
    let health_checks = vec![storage.health, lookup_health];

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .context("invalid API_HOST/API_PORT")?;
    let app = create_router(AppState::new(service, health_checks, config));

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Installs the tracing subscriber; `RUST_LOG` takes precedence over `API_LOG_LEVEL`
fn init_tracing(config: &ApiConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    if config.log_json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init();
    }
}

async fn build_storage(config: &ApiConfig) -> anyhow::Result<Storage> {
    match config.storage {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on shutdown");
            let store = Arc::new(InMemoryStore::new());
            Ok(Storage {
                customers: store.clone(),
                addresses: store.clone(),
                health: store,
            })
        }
        StorageBackend::Postgres => {
            let url = config
                .database_url
                .clone()
                .context("API_DATABASE_URL is required for postgres storage")?;
            let pool = create_pool(
                DatabaseConfig::new(url).max_connections(config.db_max_connections),
            )
            .await?;
            run_migrations(&pool).await?;

            let adapter = Arc::new(PostgresCustomerAdapter::new(pool));
            Ok(Storage {
                customers: adapter.clone(),
                addresses: adapter.clone(),
                health: adapter,
            })
        }
    }
}

fn build_lookup(config: &ApiConfig) -> anyhow::Result<Arc<ViaCepAdapter>> {
    let base_url = config
        .viacep_base_url
        .parse::<url::Url>()
        .context("invalid API_VIACEP_BASE_URL")?;
    let adapter = ViaCepAdapter::new(ViaCepConfig {
        base_url,
        timeout_secs: config.lookup_timeout_secs,
        circuit_breaker: Some(CircuitBreakerConfig::default()),
    })?;
    Ok(Arc::new(adapter))
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
