/// Data records for TaskFlow
///
/// This module contains the user and task records, their creation payloads
/// and the listing filters. Creation payloads derive `validator::Validate`;
/// enum membership is enforced by serde when payloads are deserialized.
///
/// # Models
///
/// - `user`: team members and their roles
/// - `task`: tasks with status, priority and an optional assignee
///
/// # Example
///
/// ```
/// use taskflow_shared::models::task::TaskStatus;
///
/// let status: TaskStatus = "in_progress".parse().unwrap();
/// assert_eq!(status, TaskStatus::InProgress);
/// ```

pub mod task;
pub mod user;

/// Error returned when a string is not a member of a closed enumeration
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {field} value: '{value}'")]
pub struct ParseEnumError {
    /// Field the literal was supplied for
    pub field: &'static str,

    /// The rejected literal
    pub value: String,
}

impl ParseEnumError {
    pub fn new(field: &'static str, value: &str) -> Self {
        Self {
            field,
            value: value.to_string(),
        }
    }
}
