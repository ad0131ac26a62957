/// Conversion of normalized records into typed rows
///
/// Each converter returns `Ok(None)` when a mandatory field is absent or
/// empty, so the caller can skip the record. A present value that cannot be
/// parsed (an unknown enum literal, a non-integer identity) is an error.

use serde_json::Value;
use std::str::FromStr;
use taskflow_shared::{
    models::{
        task::{Task, TaskPriority, TaskStatus},
        user::{User, UserRole},
    },
    normalize::Record,
};

use crate::MigrationError;

/// Builds a user row from a record with `name` and `role`
pub fn user_from_record(record: &Record) -> Result<Option<User>, MigrationError> {
    let (Some(name), Some(role)) = (text(record, "name"), text(record, "role")) else {
        return Ok(None);
    };

    Ok(Some(User {
        id: identity("user", record)?,
        name: name.to_string(),
        role: literal::<UserRole>("user", "role", role)?,
    }))
}

/// Builds a task row from a record with `name`, `status` and `priority`
pub fn task_from_record(record: &Record) -> Result<Option<Task>, MigrationError> {
    let (Some(name), Some(status), Some(priority)) = (
        text(record, "name"),
        text(record, "status"),
        text(record, "priority"),
    ) else {
        return Ok(None);
    };

    let description = match record.get("description") {
        None | Some(Value::Null) => None,
        Some(Value::String(description)) => Some(description.clone()),
        Some(other) => return Err(invalid("task", "description", other)),
    };

    let assigned_user_id = match record.get("assigned_user_id") {
        None | Some(Value::Null) => None,
        Some(value) => Some(value.as_i64().ok_or_else(|| invalid("task", "assigned_user_id", value))?),
    };

    Ok(Some(Task {
        id: identity("task", record)?,
        name: name.to_string(),
        description,
        status: literal::<TaskStatus>("task", "status", status)?,
        priority: literal::<TaskPriority>("task", "priority", priority)?,
        assigned_user_id,
    }))
}

fn text<'a>(record: &'a Record, field: &str) -> Option<&'a str> {
    record
        .get(field)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
}

fn identity(entity: &'static str, record: &Record) -> Result<i64, MigrationError> {
    let value = record.get("id").unwrap_or(&Value::Null);
    value.as_i64().ok_or_else(|| invalid(entity, "id", value))
}

fn literal<T: FromStr>(entity: &'static str, field: &'static str, raw: &str) -> Result<T, MigrationError> {
    raw.parse::<T>().map_err(|_| MigrationError::InvalidRecord {
        entity,
        field,
        value: format!("'{}'", raw),
    })
}

fn invalid(entity: &'static str, field: &'static str, value: &Value) -> MigrationError {
    MigrationError::InvalidRecord {
        entity,
        field,
        value: value.to_string(),
    }
}
