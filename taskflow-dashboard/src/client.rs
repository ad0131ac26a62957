/// HTTP client for the TaskFlow API
///
/// Every request carries a fixed timeout and is attempted exactly once.
/// Non-success responses are turned into [`ClientError::Status`] carrying the
/// API's own error message.

use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;
use taskflow_shared::models::{
    task::{CreateTask, Task, TaskPriority, TaskStatus},
    user::{CreateUser, User},
};

/// Timeout applied to every API call
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Client error types
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The API could not be reached or answered with an unreadable body
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("{status}: {message}")]
    Status { status: StatusCode, message: String },
}

/// Filters forwarded to `GET /tasks/`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_user_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,

    #[serde(default)]
    details: Vec<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    field: String,
    message: String,
}

/// Thin typed wrapper over the API's endpoints
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    /// Creates a client for the API at `base_url`
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// API location, without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn list_users(&self) -> Result<Vec<User>, ClientError> {
        let response = self.http.get(self.url("/users/")).send().await?;
        decode(response).await
    }

    pub async fn list_tasks(&self, query: &TaskQuery) -> Result<Vec<Task>, ClientError> {
        let response = self
            .http
            .get(self.url("/tasks/"))
            .query(query)
            .send()
            .await?;
        decode(response).await
    }

    pub async fn create_user(&self, payload: &CreateUser) -> Result<User, ClientError> {
        let response = self
            .http
            .post(self.url("/users/"))
            .json(payload)
            .send()
            .await?;
        decode(response).await
    }

    pub async fn create_task(&self, payload: &CreateTask) -> Result<Task, ClientError> {
        let response = self
            .http
            .post(self.url("/tasks/"))
            .json(payload)
            .send()
            .await?;
        decode(response).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ClientError::Status {
        status,
        message: error_message(&body),
    })
}

/// Flattens an API error body into one line
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(error) if error.details.is_empty() => error.message,
        Ok(error) => error
            .details
            .iter()
            .map(|detail| format!("{}: {}", detail.field, detail.message))
            .collect::<Vec<_>>()
            .join("; "),
        Err(_) if body.is_empty() => "no response body".to_string(),
        Err(_) => body.to_string(),
    }
}
