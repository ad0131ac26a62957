/// Task endpoints
///
/// # Endpoints
///
/// - `GET /tasks/` - List tasks, optionally filtered by `status`, `priority`
///   and `assigned_user_id`
/// - `POST /tasks/` - Create a task

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::ValidatedJson,
    routes::users::non_empty,
};
use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use taskflow_shared::models::task::{CreateTask, Task, TaskFilter, TaskPriority, TaskStatus};

/// Query string for listing tasks
#[derive(Debug, Default, Deserialize)]
pub struct ListTasksQuery {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub assigned_user_id: Option<String>,
}

impl ListTasksQuery {
    /// Parses the raw values into a conjunctive filter
    pub fn into_filter(self) -> ApiResult<TaskFilter> {
        let status = non_empty(self.status).map(|s| s.parse::<TaskStatus>()).transpose()?;
        let priority = non_empty(self.priority).map(|p| p.parse::<TaskPriority>()).transpose()?;
        let assigned_user_id = non_empty(self.assigned_user_id)
            .map(|raw| parse_user_id(&raw))
            .transpose()?;

        Ok(TaskFilter {
            status,
            priority,
            assigned_user_id,
        })
    }
}

fn parse_user_id(raw: &str) -> ApiResult<i64> {
    let id = raw.parse::<i64>().map_err(|_| {
        ApiError::BadRequest(format!("invalid assigned_user_id value: '{}'", raw))
    })?;

    if id < 1 {
        return Err(ApiError::BadRequest(
            "assigned_user_id must be at least 1".to_string(),
        ));
    }

    Ok(id)
}

/// List tasks
///
/// All supplied filters must match.
///
/// # Endpoint
///
/// ```text
/// GET /tasks/?status=todo&priority=high&assigned_user_id=1
/// ```
///
/// # Response
///
/// ```json
/// [{
///   "id": 1,
///   "name": "Fix bug",
///   "description": "Fix bug",
///   "status": "todo",
///   "priority": "high",
///   "assigned_user_id": 1
/// }]
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: unknown status or priority, or a bad assignee id
/// - `500 Internal Server Error`: storage failure
pub async fn list_tasks(
    State(state): State<AppState>,
    Query(query): Query<ListTasksQuery>,
) -> ApiResult<Json<Vec<Task>>> {
    let filter = query.into_filter()?;
    let tasks = state.store.list_tasks(&filter).await?;
    Ok(Json(tasks))
}

/// Create a task
///
/// The assignee is not checked against existing users. A missing
/// description defaults to the task name.
///
/// # Endpoint
///
/// ```text
/// POST /tasks/
/// Content-Type: application/json
///
/// {"name": "Fix bug", "status": "todo", "priority": "high"}
/// ```
///
/// # Errors
///
/// - `422 Unprocessable Entity`: payload violates a constraint
/// - `500 Internal Server Error`: storage failure
pub async fn create_task(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateTask>,
) -> ApiResult<Json<Task>> {
    let task = state.store.create_task(payload).await?;
    Ok(Json(task))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(status: Option<&str>, priority: Option<&str>, user: Option<&str>) -> ListTasksQuery {
        ListTasksQuery {
            status: status.map(str::to_string),
            priority: priority.map(str::to_string),
            assigned_user_id: user.map(str::to_string),
        }
    }

    #[test]
    fn test_query_into_filter() {
        let filter = query(Some("in_progress"), Some("low"), Some("3"))
            .into_filter()
            .unwrap();

        assert_eq!(
            filter,
            TaskFilter {
                status: Some(TaskStatus::InProgress),
                priority: Some(TaskPriority::Low),
                assigned_user_id: Some(3),
            }
        );
    }

    #[test]
    fn test_invalid_filters_are_bad_requests() {
        for bad in [
            query(Some("blocked"), None, None),
            query(None, Some("urgent"), None),
            query(None, None, Some("abc")),
            query(None, None, Some("0")),
        ] {
            assert!(matches!(bad.into_filter(), Err(ApiError::BadRequest(_))));
        }
    }
}
