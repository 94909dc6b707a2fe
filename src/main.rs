//! Userbase server entry point
//!
//! Connects to the database first and only starts serving GraphQL once
//! the connection is established.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use userbase::app::{AppState, build_app};
use userbase::config::Config;
use userbase::db::Database;
use userbase::graphql::build_schema;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "userbase=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let config = Arc::new(Config::from_env()?);
    tracing::info!("Configuration loaded");

    // No retry: a failed connection means the server never listens.
    let db = match Database::connect(&config.database_url, config.database_max_connections).await
    {
        Ok(db) => db,
        Err(e) => {
            tracing::error!(error = %format!("{:#}", e), "Database connection failed");
            return Err(e);
        }
    };
    tracing::info!("Database connected");

    let sync = db.sync_schema().await;
    if !sync.errors.is_empty() {
        anyhow::bail!("Schema sync failed: {}", sync.errors.join("; "));
    }
    tracing::info!(
        tables_created = ?sync.tables_created,
        columns_added = sync.columns_added.len(),
        "Schema synced"
    );

    let schema = build_schema(db.clone());
    tracing::info!("GraphQL schema built");

    let state = AppState {
        config: config.clone(),
        schema,
    };
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!("Server is running on http://localhost:{}", config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
