//! # TaskFlow Dashboard
//!
//! Kanban board, task form and team directory backed by the TaskFlow API.
//!
//! ## Usage
//!
//! ```bash
//! API_BASE_URL=http://127.0.0.1:8000 cargo run -p taskflow-dashboard
//! ```

use taskflow_dashboard::{
    app::{build_router, AppState},
    client::ApiClient,
    config::Config,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskflow_dashboard=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "TaskFlow Dashboard v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;
    let client = ApiClient::new(&config.api_base_url)?;
    tracing::info!(api = client.base_url(), "Using TaskFlow API");

    let address = config.bind_address();
    let app = build_router(AppState::new(client));

    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!("Dashboard listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Shutdown signal received, exiting...");
            }
        })
        .await?;

    Ok(())
}
