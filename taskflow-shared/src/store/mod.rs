/// Storage capability for TaskFlow
///
/// Route handlers depend only on the [`Store`] trait. Two interchangeable
/// backends implement it and one is selected at startup:
///
/// - `sql`: [`sql::SqlStore`], a SQLite database accessed through sqlx
/// - `json`: [`json::JsonStore`], a single JSON document rewritten wholesale
///
/// Both backends share the same observable behavior: identities increase
/// monotonically per entity type, filters are exact-match and conjunctive,
/// results come back in ascending id order, a missing task description
/// defaults to the task name, and deleting a user deletes its tasks.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use taskflow_shared::models::user::{CreateUser, UserFilter, UserRole};
/// use taskflow_shared::store::{json::JsonStore, Store};
///
/// # async fn example() -> Result<(), taskflow_shared::store::StoreError> {
/// let store: Arc<dyn Store> = Arc::new(JsonStore::new("db.json"));
///
/// let ada = store
///     .create_user(CreateUser { name: "Ada".to_string(), role: UserRole::Admin })
///     .await?;
/// let admins = store
///     .list_users(&UserFilter { role: Some(UserRole::Admin), name: None })
///     .await?;
/// assert!(admins.contains(&ada));
/// # Ok(())
/// # }
/// ```

pub mod json;
pub mod sql;

use async_trait::async_trait;
use std::{fmt, str::FromStr};

use crate::models::{
    task::{CreateTask, Task, TaskFilter},
    user::{CreateUser, User, UserFilter},
};

/// Store error types
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database query or connection failed
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration failed
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Document file could not be read or written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Document is not valid JSON or has the wrong shape
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A stored record violates the record schema
    #[error("Invalid {entity} record: {reason}")]
    InvalidRecord {
        entity: &'static str,
        reason: String,
    },
}

/// Store result type alias
pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence mechanism behind the storage capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    /// Relational store (SQLite via sqlx)
    #[default]
    Sql,

    /// Single JSON document
    Json,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Sql => "sql",
            Backend::Json => "json",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sql" | "sqlite" | "db" => Ok(Backend::Sql),
            "json" | "file" => Ok(Backend::Json),
            other => Err(format!("unknown storage backend '{}' (expected 'sql' or 'json')", other)),
        }
    }
}

/// Storage capability shared by both backends
///
/// Every call is a self-contained unit of work: it acquires whatever
/// resources it needs and releases them before returning.
#[async_trait]
pub trait Store: Send + Sync {
    /// Which backend this is
    fn backend(&self) -> Backend;

    /// Lists users matching every populated filter field, ordered by id
    async fn list_users(&self, filter: &UserFilter) -> StoreResult<Vec<User>>;

    /// Persists a new user and returns it with its assigned identity
    ///
    /// The payload is expected to be validated already.
    async fn create_user(&self, data: CreateUser) -> StoreResult<User>;

    /// Lists tasks matching every populated filter field, ordered by id
    async fn list_tasks(&self, filter: &TaskFilter) -> StoreResult<Vec<Task>>;

    /// Persists a new task and returns it with its assigned identity
    ///
    /// The payload is expected to be validated already. The assignee is not
    /// checked against existing users.
    async fn create_task(&self, data: CreateTask) -> StoreResult<Task>;

    /// Deletes a user and every task assigned to it
    ///
    /// Returns false if no user had that id.
    async fn delete_user(&self, id: i64) -> StoreResult<bool>;
}
