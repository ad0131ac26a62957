/// Common test utilities for integration tests
///
/// This module provides shared infrastructure for integration tests:
/// - A router wired to a fresh store for either backend
/// - Request helpers returning status and parsed JSON body

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use std::{collections::HashMap, sync::Arc};
use taskflow_api::{
    app::{build_router, build_store, AppState},
    config::Config,
};
use taskflow_shared::store::{Backend, Store};
use tempfile::TempDir;
use tower::ServiceExt as _;

/// Test context containing all necessary resources
pub struct TestContext {
    pub app: Router,
    pub store: Arc<dyn Store>,
    pub config: Config,
    _dir: TempDir,
}

impl TestContext {
    /// Creates a router over an empty store of the given backend
    ///
    /// The relational backend uses an in-memory database, the file backend a
    /// document inside a temporary directory.
    pub async fn new(backend: Backend) -> anyhow::Result<Self> {
        let dir = tempfile::tempdir()?;
        let json_path = dir.path().join("db.json");

        let mut vars = HashMap::new();
        vars.insert("STORAGE_BACKEND", backend.as_str().to_string());
        vars.insert("DATABASE_URL", "sqlite::memory:".to_string());
        vars.insert("JSON_DB_PATH", json_path.to_string_lossy().into_owned());

        let config = Config::from_lookup(|key| vars.get(key).cloned())?;
        let store = build_store(&config.storage).await?;
        let app = build_router(AppState::new(store.clone(), config.clone()));

        Ok(TestContext {
            app,
            store,
            config,
            _dir: dir,
        })
    }

    /// One context per backend
    pub async fn all() -> anyhow::Result<Vec<Self>> {
        Ok(vec![
            Self::new(Backend::Sql).await?,
            Self::new(Backend::Json).await?,
        ])
    }

    /// Sends a GET request
    pub async fn get(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// Sends a POST request with a JSON body
    pub async fn post(&self, uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        self.post_raw(uri, body.to_string()).await
    }

    /// Sends a POST request with an arbitrary JSON-typed body
    pub async fn post_raw(&self, uri: &str, body: impl Into<String>) -> (StatusCode, serde_json::Value) {
        self.post_typed(uri, "application/json", body).await
    }

    pub async fn post_typed(
        &self,
        uri: &str,
        content_type: &str,
        body: impl Into<String>,
    ) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", content_type)
            .body(Body::from(body.into()))
            .unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        let json = if body.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&body).unwrap_or_else(|_| {
                panic!("non-JSON body ({}): {}", status, String::from_utf8_lossy(&body))
            })
        };

        (status, json)
    }
}
