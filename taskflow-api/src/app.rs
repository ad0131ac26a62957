/// Application state and router builder
///
/// This module defines the shared application state, selects the storage
/// backend and builds the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use taskflow_api::{app::{build_router, build_store, AppState}, config::Config};
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let store = build_store(&config.storage).await?;
/// let app = build_router(AppState::new(store, config));
///
/// let listener = tokio::net::TcpListener::bind("127.0.0.1:8000").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::config::{Config, StorageConfig};
use axum::{routing::get, Router};
use std::sync::Arc;
use taskflow_shared::store::{
    json::JsonStore, sql::SqlStore, Backend, Store, StoreResult,
};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Storage backend selected at startup
    pub store: Arc<dyn Store>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(store: Arc<dyn Store>, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}

/// Opens the configured storage backend
///
/// The relational backend connects its pool and applies the schema. The
/// file backend is lazy and touches the document on first request.
pub async fn build_store(config: &StorageConfig) -> StoreResult<Arc<dyn Store>> {
    match config.backend {
        Backend::Sql => {
            let store = SqlStore::connect(config.database.pool_config()).await?;
            Ok(Arc::new(store))
        }
        Backend::Json => Ok(Arc::new(JsonStore::new(config.json_path.clone()))),
    }
}

/// Builds the complete Axum router
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET  /            # Welcome message
/// ├── /users/
/// │   ├── GET  /        # List users
/// │   └── POST /        # Create user
/// └── /tasks/
///     ├── GET  /        # List tasks
///     └── POST /        # Create task
/// ```
///
/// Collection routes answer with and without the trailing slash. Unknown
/// paths fall through to a JSON 404.
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let users = get(routes::users::list_users).post(routes::users::create_user);
    let tasks = get(routes::tasks::list_tasks).post(routes::tasks::create_task);

    Router::new()
        .route("/", get(routes::root::root))
        .route("/users", users.clone())
        .route("/users/", users)
        .route("/tasks", tasks.clone())
        .route("/tasks/", tasks)
        .fallback(routes::root::not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
