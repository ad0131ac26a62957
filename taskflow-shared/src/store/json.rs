/// File backend
///
/// The whole dataset is one JSON document:
///
/// ```json
/// {
///   "users": [{"id": 1, "name": "Ada", "role": "admin"}],
///   "tasks": [{"id": 1, "name": "Fix bug", "description": "Fix bug",
///              "status": "todo", "priority": "high", "assigned_user_id": 1}]
/// }
/// ```
///
/// Every operation loads the document, runs the normalization pass,
/// persists it again if the pass repaired anything, and then reads or
/// appends. Writes replace the file wholesale. There is no locking: two
/// concurrent writers can lose each other's update.
///
/// The highest identity handed out per entity is kept under `last_ids`, so
/// deleting the newest records never lets a later create reuse their ids:
///
/// ```json
/// {"users": [], "tasks": [], "last_ids": {"users": 2, "tasks": 1}}
/// ```

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use validator::Validate;

use super::{Backend, Store, StoreError, StoreResult};
use crate::{
    models::{
        task::{CreateTask, Task, TaskFilter},
        user::{CreateUser, User, UserFilter},
    },
    normalize::{max_id, normalize_tasks, normalize_users, NormalizeReport, Record},
};

/// Default location of the document
pub const DEFAULT_JSON_PATH: &str = "db.json";

/// Top-level key holding the highest identity assigned per entity
pub const LAST_IDS_KEY: &str = "last_ids";

/// The persisted document
///
/// Unknown top-level keys are preserved across a load/save cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub users: Vec<Record>,

    #[serde(default)]
    pub tasks: Vec<Record>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Document {
    /// Runs the normalization pass over both sequences
    pub fn normalize(&mut self) -> NormalizeReport {
        normalize_users(&mut self.users).merge(normalize_tasks(&mut self.tasks))
    }

    /// Validated user records, in document order
    pub fn users(&self) -> StoreResult<Vec<User>> {
        self.users.iter().map(|record| parse_record("user", record)).collect()
    }

    /// Validated task records, in document order
    pub fn tasks(&self) -> StoreResult<Vec<Task>> {
        self.tasks.iter().map(|record| parse_record("task", record)).collect()
    }

    /// Reserves the identity for a new user
    pub fn allocate_user_id(&mut self) -> StoreResult<i64> {
        allocate_id(&self.users, &mut self.extra, "users", "user")
    }

    /// Reserves the identity for a new task
    pub fn allocate_task_id(&mut self) -> StoreResult<i64> {
        allocate_id(&self.tasks, &mut self.extra, "tasks", "task")
    }
}

/// Next identity above both the stored records and the recorded high-water
/// mark. The mark is advanced to the returned id.
fn allocate_id(
    records: &[Record],
    extra: &mut Map<String, Value>,
    key: &str,
    entity: &'static str,
) -> StoreResult<i64> {
    let recorded = extra
        .get(LAST_IDS_KEY)
        .and_then(|last| last.get(key))
        .and_then(Value::as_i64)
        .unwrap_or(0);
    let highest = max_id(records).unwrap_or(0).max(recorded).max(0);

    let id = highest.checked_add(1).ok_or_else(|| StoreError::InvalidRecord {
        entity,
        reason: format!("no identity left after {}", highest),
    })?;

    let last_ids = extra
        .entry(LAST_IDS_KEY)
        .or_insert_with(|| Value::Object(Map::new()));
    if !last_ids.is_object() {
        *last_ids = Value::Object(Map::new());
    }
    if let Value::Object(last_ids) = last_ids {
        last_ids.insert(key.to_string(), Value::from(id));
    }

    Ok(id)
}

/// Store backed by a single JSON file
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the document
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the document as stored
    ///
    /// A missing or empty file yields an empty document.
    pub async fn load(&self) -> StoreResult<Document> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Document not found, starting empty");
                return Ok(Document::default());
            }
            Err(e) => return Err(e.into()),
        };

        if contents.trim().is_empty() {
            return Ok(Document::default());
        }

        Ok(serde_json::from_str(&contents)?)
    }

    /// Overwrites the file with the document
    pub async fn save(&self, document: &Document) -> StoreResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let contents = serde_json::to_string_pretty(document)?;
        tokio::fs::write(&self.path, contents).await?;

        debug!(
            path = %self.path.display(),
            users = document.users.len(),
            tasks = document.tasks.len(),
            "Saved document"
        );
        Ok(())
    }

    /// Loads the document and repairs legacy records
    ///
    /// If the normalization pass changed anything the repaired document is
    /// written back before returning.
    pub async fn load_normalized(&self) -> StoreResult<Document> {
        let mut document = self.load().await?;
        let report = document.normalize();

        if report.changed() {
            info!(
                path = %self.path.display(),
                ids_assigned = report.ids_assigned,
                fields_renamed = report.fields_renamed,
                descriptions_filled = report.descriptions_filled,
                "Normalized legacy records"
            );
            self.save(&document).await?;
        }

        Ok(document)
    }
}

#[async_trait]
impl Store for JsonStore {
    fn backend(&self) -> Backend {
        Backend::Json
    }

    async fn list_users(&self, filter: &UserFilter) -> StoreResult<Vec<User>> {
        let mut users: Vec<User> = self
            .load_normalized()
            .await?
            .users()?
            .into_iter()
            .filter(|user| filter.matches(user))
            .collect();
        users.sort_by_key(|user| user.id);
        Ok(users)
    }

    async fn create_user(&self, data: CreateUser) -> StoreResult<User> {
        let mut document = self.load_normalized().await?;

        let user = data.into_user(document.allocate_user_id()?);
        document.users.push(to_record(&user)?);
        self.save(&document).await?;

        info!(user_id = user.id, role = %user.role, "Created user");
        Ok(user)
    }

    async fn list_tasks(&self, filter: &TaskFilter) -> StoreResult<Vec<Task>> {
        let mut tasks: Vec<Task> = self
            .load_normalized()
            .await?
            .tasks()?
            .into_iter()
            .filter(|task| filter.matches(task))
            .collect();
        tasks.sort_by_key(|task| task.id);
        Ok(tasks)
    }

    async fn create_task(&self, data: CreateTask) -> StoreResult<Task> {
        let mut document = self.load_normalized().await?;

        let task = data.into_task(document.allocate_task_id()?);
        document.tasks.push(to_record(&task)?);
        self.save(&document).await?;

        info!(task_id = task.id, status = %task.status, "Created task");
        Ok(task)
    }

    async fn delete_user(&self, id: i64) -> StoreResult<bool> {
        let mut document = self.load_normalized().await?;

        let users_before = document.users.len();
        document.users.retain(|user| record_id(user, "id") != Some(id));
        if document.users.len() == users_before {
            return Ok(false);
        }

        let tasks_before = document.tasks.len();
        document
            .tasks
            .retain(|task| record_id(task, "assigned_user_id") != Some(id));
        self.save(&document).await?;

        info!(
            user_id = id,
            tasks_deleted = tasks_before - document.tasks.len(),
            "Deleted user"
        );
        Ok(true)
    }
}

fn record_id(record: &Record, key: &str) -> Option<i64> {
    record.get(key).and_then(Value::as_i64)
}

fn parse_record<T>(entity: &'static str, record: &Record) -> StoreResult<T>
where
    T: DeserializeOwned + Validate,
{
    let parsed: T = serde_json::from_value(Value::Object(record.clone())).map_err(|e| {
        StoreError::InvalidRecord {
            entity,
            reason: e.to_string(),
        }
    })?;

    parsed.validate().map_err(|e| StoreError::InvalidRecord {
        entity,
        reason: e.to_string(),
    })?;

    Ok(parsed)
}

fn to_record<T: Serialize>(value: &T) -> StoreResult<Record> {
    match serde_json::to_value(value)? {
        Value::Object(record) => Ok(record),
        other => Err(StoreError::InvalidRecord {
            entity: "record",
            reason: format!("expected a JSON object, got {}", other),
        }),
    }
}
