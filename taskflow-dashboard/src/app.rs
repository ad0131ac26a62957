/// Dashboard routes
///
/// ```text
/// /
/// ├── GET  /         # Board, task form and team directory
/// ├── POST /tasks    # Task form submission
/// └── POST /users    # Add-member form submission
/// ```
///
/// API failures never fail the request: they become inline notices and the
/// page renders with whatever data could be fetched. Successful submissions
/// redirect back to the board.

use crate::{
    client::{ApiClient, ClientError, TaskQuery},
    render::{render_page, BoardFilters, Notice, Page},
};
use axum::{
    extract::{rejection::FormRejection, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;
use std::str::FromStr;
use taskflow_shared::models::{
    task::{CreateTask, TaskPriority, TaskStatus},
    user::CreateUser,
};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{info, warn, Level};

/// Shared dashboard state
#[derive(Debug, Clone)]
pub struct AppState {
    pub client: ApiClient,
}

impl AppState {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

/// Builds the dashboard router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/tasks", post(submit_task))
        .route("/users", post(submit_user))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

/// Query string of the board page
///
/// Unrecognized filter values are treated as "All".
#[derive(Debug, Default, Deserialize)]
pub struct BoardQuery {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub assignee: Option<String>,
    pub created: Option<String>,
}

impl BoardQuery {
    pub fn filters(&self) -> BoardFilters {
        BoardFilters {
            status: self.status.as_deref().and_then(|s| s.parse().ok()),
            priority: self.priority.as_deref().and_then(|p| p.parse().ok()),
            assignee: self
                .assignee
                .as_deref()
                .and_then(|a| a.parse::<i64>().ok())
                .filter(|id| *id >= 1),
        }
    }

    fn flash(&self) -> Option<Notice> {
        match self.created.as_deref()? {
            "task" => Some(Notice::Success("Task created!".to_string())),
            "user" => Some(Notice::Success("Team member added!".to_string())),
            _ => None,
        }
    }
}

/// Task creation form
///
/// Every field arrives as raw text so a bad value becomes a notice on the
/// page rather than a rejected request.
#[derive(Debug, Default, Deserialize)]
pub struct TaskForm {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub status: String,

    #[serde(default)]
    pub priority: String,

    /// User id, or empty for unassigned
    #[serde(default)]
    pub assignee: String,
}

impl TaskForm {
    /// Builds the API payload, or the warning to show instead
    pub fn into_payload(self) -> Result<CreateTask, Notice> {
        if self.name.trim().is_empty() {
            return Err(Notice::Warning("Task name is required.".to_string()));
        }

        let status: TaskStatus = parse_choice("status", &self.status)?;
        let priority: TaskPriority = parse_choice("priority", &self.priority)?;

        let assigned_user_id = match self.assignee.trim() {
            "" => None,
            raw => Some(
                raw.parse::<i64>()
                    .map_err(|_| Notice::Warning(format!("Unknown assignee '{}'.", raw)))?,
            ),
        };

        Ok(CreateTask {
            name: self.name,
            description: Some(self.description).filter(|d| !d.is_empty()),
            status,
            priority,
            assigned_user_id,
        })
    }
}

/// Add-member form
#[derive(Debug, Default, Deserialize)]
pub struct UserForm {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub role: String,
}

impl UserForm {
    /// Builds the API payload, or the warning to show instead
    ///
    /// Name length is left to the API so its message is shown verbatim.
    pub fn into_payload(self) -> Result<CreateUser, Notice> {
        Ok(CreateUser {
            name: self.name,
            role: parse_choice("role", &self.role)?,
        })
    }
}

fn parse_choice<T: FromStr>(field: &str, raw: &str) -> Result<T, Notice> {
    match raw.trim() {
        "" => Err(Notice::Warning(format!("Choose a {}.", field))),
        value => value
            .parse()
            .map_err(|_| Notice::Warning(format!("Unknown {} '{}'.", field, value))),
    }
}

fn unreadable_form(rejection: FormRejection) -> Notice {
    warn!(error = %rejection, "Unreadable form submission");
    Notice::Warning("The form could not be read. Please try again.".to_string())
}

/// Inline message for a failed API call
pub fn error_notice(err: &ClientError) -> Notice {
    match err {
        ClientError::Transport(e) => Notice::Error(format!("Connection Error: {}", e)),
        ClientError::Status { status, message } => {
            Notice::Error(format!("API Error ({}): {}", status.as_u16(), message))
        }
    }
}

async fn index(State(state): State<AppState>, Query(query): Query<BoardQuery>) -> Html<String> {
    let notices = query.flash().into_iter().collect();
    Html(render_page(&load_page(&state.client, query.filters(), notices).await))
}

async fn submit_task(
    State(state): State<AppState>,
    form: Result<Form<TaskForm>, FormRejection>,
) -> Response {
    let payload = match form.map_err(unreadable_form).and_then(|Form(form)| form.into_payload()) {
        Ok(payload) => payload,
        Err(notice) => return render_with(&state, notice).await,
    };

    match state.client.create_task(&payload).await {
        Ok(task) => {
            info!(task_id = task.id, "Task created from dashboard");
            Redirect::to("/?created=task").into_response()
        }
        Err(e) => {
            warn!(error = %e, "Task creation failed");
            render_with(&state, error_notice(&e)).await
        }
    }
}

async fn submit_user(
    State(state): State<AppState>,
    form: Result<Form<UserForm>, FormRejection>,
) -> Response {
    let payload = match form.map_err(unreadable_form).and_then(|Form(form)| form.into_payload()) {
        Ok(payload) => payload,
        Err(notice) => return render_with(&state, notice).await,
    };

    match state.client.create_user(&payload).await {
        Ok(user) => {
            info!(user_id = user.id, "Team member added from dashboard");
            Redirect::to("/?created=user").into_response()
        }
        Err(e) => {
            warn!(error = %e, "Adding team member failed");
            render_with(&state, error_notice(&e)).await
        }
    }
}

async fn render_with(state: &AppState, notice: Notice) -> Response {
    let page = load_page(&state.client, BoardFilters::default(), vec![notice]).await;
    Html(render_page(&page)).into_response()
}

/// Fetches users and tasks; each failure becomes a notice and empty data
pub async fn load_page(client: &ApiClient, filters: BoardFilters, mut notices: Vec<Notice>) -> Page {
    let users = client.list_users().await.unwrap_or_else(|e| {
        warn!(error = %e, "Loading users failed");
        notices.push(error_notice(&e));
        Vec::new()
    });

    let query = TaskQuery {
        status: filters.status,
        priority: filters.priority,
        assigned_user_id: filters.assignee,
    };
    let tasks = client.list_tasks(&query).await.unwrap_or_else(|e| {
        warn!(error = %e, "Loading tasks failed");
        notices.push(error_notice(&e));
        Vec::new()
    });

    Page {
        tasks,
        users,
        filters,
        notices,
    }
}
