/// User endpoints
///
/// # Endpoints
///
/// - `GET /users/` - List users, optionally filtered by `role` and `name`
/// - `POST /users/` - Create a user

use crate::{
    app::AppState,
    error::ApiResult,
    extract::ValidatedJson,
};
use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use taskflow_shared::models::user::{CreateUser, User, UserFilter, UserRole};

/// Query string for listing users
///
/// Values arrive as raw strings so an unknown role can be reported as a
/// client error naming the value. Empty values count as absent.
#[derive(Debug, Default, Deserialize)]
pub struct ListUsersQuery {
    pub role: Option<String>,
    pub name: Option<String>,
}

impl ListUsersQuery {
    /// Parses the raw values into an exact-match filter
    pub fn into_filter(self) -> ApiResult<UserFilter> {
        let role = non_empty(self.role).map(|role| role.parse::<UserRole>()).transpose()?;

        Ok(UserFilter {
            role,
            name: non_empty(self.name),
        })
    }
}

pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// List users
///
/// # Endpoint
///
/// ```text
/// GET /users/?role=admin&name=Ada
/// ```
///
/// # Response
///
/// ```json
/// [{"id": 1, "name": "Ada", "role": "admin"}]
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: unknown role
/// - `500 Internal Server Error`: storage failure
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> ApiResult<Json<Vec<User>>> {
    let filter = query.into_filter()?;
    let users = state.store.list_users(&filter).await?;
    Ok(Json(users))
}

/// Create a user
///
/// # Endpoint
///
/// ```text
/// POST /users/
/// Content-Type: application/json
///
/// {"name": "Ada", "role": "admin"}
/// ```
///
/// # Response
///
/// ```json
/// {"id": 1, "name": "Ada", "role": "admin"}
/// ```
///
/// # Errors
///
/// - `422 Unprocessable Entity`: payload violates a constraint
/// - `500 Internal Server Error`: storage failure
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateUser>,
) -> ApiResult<Json<User>> {
    let user = state.store.create_user(payload).await?;
    Ok(Json(user))
}
