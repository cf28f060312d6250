//! # NoteVault API Server
//!
//! Multi-tenant notes service: login, tenant-scoped note CRUD with plan
//! quotas, and tenant administration.
//!
//! ## Usage
//!
//! ```bash
//! JWT_SECRET=$(openssl rand -hex 32) DATABASE_URL=postgres://... cargo run -p notevault-api
//!
//! # Without a database, using demo data
//! JWT_SECRET=$(openssl rand -hex 32) NOTEVAULT_STORE=memory cargo run -p notevault-api
//! ```

use anyhow::Context;
use notevault_api::{
    app::{build_router, AppState},
    config::{Config, StoreBackend},
};
use notevault_shared::{
    db::{
        migrations::{ensure_database_exists, run_migrations},
        pool::{close_pool, create_pool, DatabaseConfig},
    },
    provision::seed_demo_data,
    store::{memory::MemoryStore, postgres::PgStore, NoteStore},
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "notevault_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "NoteVault API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env().context("Failed to load configuration")?;

    let mut pool = None;
    let store: Arc<dyn NoteStore> = match config.store.backend {
        StoreBackend::Postgres => {
            let url = config
                .store
                .database_url
                .clone()
                .context("DATABASE_URL environment variable is required")?;

            ensure_database_exists(&url)
                .await
                .context("Failed to create database")?;

            let pg = create_pool(DatabaseConfig {
                url,
                max_connections: config.store.max_connections,
                ..Default::default()
            })
            .await
            .context("Failed to connect to database")?;

            run_migrations(&pg).await.context("Failed to run migrations")?;

            pool = Some(pg.clone());
            Arc::new(PgStore::new(pg))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; all data is lost on exit");
            Arc::new(MemoryStore::new())
        }
    };

    if config.store.seed_demo_data {
        let created = seed_demo_data(store.as_ref())
            .await
            .context("Failed to provision demo data")?;
        tracing::info!(created, "Demo data provisioned");
    }

    let bind_address = config.bind_address();
    let app = build_router(AppState::new(store, config));

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;

    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(pool) = pool {
        close_pool(pool).await;
    }

    tracing::info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received, draining connections...");
}
