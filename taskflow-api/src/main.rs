//! # TaskFlow API Server
//!
//! HTTP API for managing users and the tasks assigned to them.
//!
//! ## Architecture
//!
//! The API server is built with Axum and provides:
//! - User listing and creation (`/users/`)
//! - Task listing and creation (`/tasks/`)
//! - A choice of storage backend (SQLite or a JSON document)
//!
//! ## Usage
//!
//! ```bash
//! STORAGE_BACKEND=sql DATABASE_URL=sqlite://task_manager.db cargo run -p taskflow-api
//! ```

use taskflow_api::{
    app::{build_router, build_store, AppState},
    config::Config,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskflow_api=debug,taskflow_shared=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "TaskFlow API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;
    let store = build_store(&config.storage).await?;
    tracing::info!(backend = %store.backend(), "Storage backend ready");

    let address = config.bind_address();
    let app = build_router(AppState::new(store, config));

    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!("Server listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutdown signal received, exiting...");
}
