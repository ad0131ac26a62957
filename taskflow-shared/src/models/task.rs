/// Task model and validation schemas
///
/// Tasks carry a status and a priority from closed sets and may reference the
/// user they are assigned to. The reference is not checked against existing
/// users.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     name VARCHAR(100) NOT NULL,
///     description TEXT,
///     status VARCHAR(16) NOT NULL,
///     priority VARCHAR(16) NOT NULL,
///     assigned_user_id INTEGER
/// );
/// ```
///
/// # Example
///
/// ```
/// use taskflow_shared::models::task::{CreateTask, TaskPriority, TaskStatus};
///
/// let task = CreateTask {
///     name: "Fix bug".to_string(),
///     description: None,
///     status: TaskStatus::Todo,
///     priority: TaskPriority::High,
///     assigned_user_id: None,
/// }
/// .into_task(1);
///
/// assert_eq!(task.description.as_deref(), Some("Fix bug"));
/// ```

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use validator::Validate;

use super::ParseEnumError;

/// Workflow status of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started
    Todo,

    /// Being worked on
    InProgress,

    /// Finished
    Done,
}

impl TaskStatus {
    /// All statuses, in board column order
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done];

    /// Converts status to its wire and storage literal
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "todo" => Ok(TaskStatus::Todo),
            "in_progress" => Ok(TaskStatus::InProgress),
            "done" => Ok(TaskStatus::Done),
            other => Err(ParseEnumError::new("status", other)),
        }
    }
}

/// Priority of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl TaskPriority {
    /// All priorities, lowest first
    pub const ALL: [TaskPriority; 3] = [TaskPriority::Low, TaskPriority::Medium, TaskPriority::High];

    /// Converts priority to its wire and storage literal
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskPriority {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(TaskPriority::Low),
            "medium" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            other => Err(ParseEnumError::new("priority", other)),
        }
    }
}

/// Task record as stored and returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, sqlx::FromRow)]
pub struct Task {
    /// Identity assigned by the store
    #[validate(range(min = 1, message = "id must be at least 1"))]
    pub id: i64,

    /// Short task name
    #[validate(length(min = 2, max = 100, message = "name must be 2-100 characters"))]
    pub name: String,

    /// Free-form description
    #[serde(default)]
    #[validate(length(max = 300, message = "description must be at most 300 characters"))]
    pub description: Option<String>,

    /// Workflow status
    pub status: TaskStatus,

    /// Priority
    pub priority: TaskPriority,

    /// User the task is assigned to, if any
    #[serde(default)]
    #[validate(range(min = 1, message = "assigned_user_id must be at least 1"))]
    pub assigned_user_id: Option<i64>,
}

/// Payload for creating a new task
///
/// Unknown fields in the incoming JSON are ignored. A missing description
/// defaults to the task name when the record is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CreateTask {
    /// Short task name (2-100 characters)
    #[validate(length(min = 2, max = 100, message = "name must be 2-100 characters"))]
    pub name: String,

    /// Optional description (at most 300 characters)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 300, message = "description must be at most 300 characters"))]
    pub description: Option<String>,

    /// Initial workflow status
    pub status: TaskStatus,

    /// Priority
    pub priority: TaskPriority,

    /// Assignee (not checked against existing users)
    #[serde(default)]
    #[validate(range(min = 1, message = "assigned_user_id must be at least 1"))]
    pub assigned_user_id: Option<i64>,
}

impl CreateTask {
    /// Description to persist: the supplied one, or the task name
    pub fn resolved_description(&self) -> String {
        self.description.clone().unwrap_or_else(|| self.name.clone())
    }

    /// Attaches an identity, producing the full record
    pub fn into_task(self, id: i64) -> Task {
        let description = Some(self.resolved_description());
        Task {
            id,
            name: self.name,
            description,
            status: self.status,
            priority: self.priority,
            assigned_user_id: self.assigned_user_id,
        }
    }
}

/// Exact-match filters for listing tasks
///
/// Populated fields are combined with AND.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub assigned_user_id: Option<i64>,
}

impl TaskFilter {
    /// Returns true if the task satisfies every populated predicate
    pub fn matches(&self, task: &Task) -> bool {
        self.status.map_or(true, |status| task.status == status)
            && self.priority.map_or(true, |priority| task.priority == priority)
            && self
                .assigned_user_id
                .map_or(true, |user_id| task.assigned_user_id == Some(user_id))
    }
}
