/// Normalization pass for JSON documents
///
/// Legacy documents contain records written by older versions of the
/// dashboard: users keyed by `username`, tasks keyed by `title` and
/// `assigned_to`, records without identities, tasks without descriptions.
/// The pass repairs these in place, operating on raw JSON objects so nothing
/// is lost before the records are validated.
///
/// # Rules
///
/// Users:
/// - `username` is copied to `name` when `name` is absent
/// - records without an integer `id` get `max(id) + 1`, in document order,
///   and stay without one once the id space is exhausted
///
/// Tasks:
/// - `title` is copied to `name` when `name` is absent
/// - `assigned_to` is copied to `assigned_user_id` when that is absent
/// - a null or absent `description` becomes the task name
/// - identities are back-filled as for users
///
/// The pass is idempotent: running it over its own output reports no changes.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use taskflow_shared::normalize::{normalize_tasks, Record};
///
/// let mut tasks: Vec<Record> = vec![json!({"title": "Old", "assigned_to": 3})
///     .as_object()
///     .cloned()
///     .unwrap()];
///
/// let report = normalize_tasks(&mut tasks);
/// assert!(report.changed());
/// assert_eq!(tasks[0]["name"], "Old");
/// assert_eq!(tasks[0]["description"], "Old");
/// assert_eq!(tasks[0]["assigned_user_id"], 3);
/// assert_eq!(tasks[0]["id"], 1);
/// ```

use serde_json::{Map, Value};

/// A raw JSON record, keyed by field name
pub type Record = Map<String, Value>;

/// Summary of what a normalization pass changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    /// Records that received a freshly assigned identity
    pub ids_assigned: usize,

    /// Legacy field names copied to their current names
    pub fields_renamed: usize,

    /// Null descriptions back-filled from the task name
    pub descriptions_filled: usize,
}

impl NormalizeReport {
    /// Returns true if the pass modified at least one record
    pub fn changed(&self) -> bool {
        self.ids_assigned + self.fields_renamed + self.descriptions_filled > 0
    }

    /// Combines two reports
    pub fn merge(self, other: NormalizeReport) -> NormalizeReport {
        NormalizeReport {
            ids_assigned: self.ids_assigned + other.ids_assigned,
            fields_renamed: self.fields_renamed + other.fields_renamed,
            descriptions_filled: self.descriptions_filled + other.descriptions_filled,
        }
    }
}

/// Normalizes user records in place
pub fn normalize_users(users: &mut [Record]) -> NormalizeReport {
    let mut report = NormalizeReport::default();

    for user in users.iter_mut() {
        if rename_legacy(user, "username", "name") {
            report.fields_renamed += 1;
        }
    }

    report.ids_assigned = backfill_ids(users);
    report
}

/// Normalizes task records in place
pub fn normalize_tasks(tasks: &mut [Record]) -> NormalizeReport {
    let mut report = NormalizeReport::default();

    for task in tasks.iter_mut() {
        if rename_legacy(task, "title", "name") {
            report.fields_renamed += 1;
        }
        if rename_legacy(task, "assigned_to", "assigned_user_id") {
            report.fields_renamed += 1;
        }
        if backfill_description(task) {
            report.descriptions_filled += 1;
        }
    }

    report.ids_assigned = backfill_ids(tasks);
    report
}

/// Highest integer identity in the records, if any
pub fn max_id(records: &[Record]) -> Option<i64> {
    records
        .iter()
        .filter_map(|record| record.get("id").and_then(Value::as_i64))
        .max()
}

/// Identity following every id in the records
///
/// Returns `None` when the highest id is `i64::MAX`.
pub fn next_id(records: &[Record]) -> Option<i64> {
    max_id(records).unwrap_or(0).max(0).checked_add(1)
}

fn rename_legacy(record: &mut Record, legacy: &str, current: &str) -> bool {
    if record.contains_key(current) {
        return false;
    }

    match record.get(legacy).cloned() {
        Some(value) => {
            record.insert(current.to_string(), value);
            true
        }
        None => false,
    }
}

fn backfill_description(task: &mut Record) -> bool {
    let missing = task.get("description").map_or(true, Value::is_null);
    if !missing {
        return false;
    }

    match task.get("name") {
        Some(Value::String(name)) if !name.is_empty() => {
            let name = name.clone();
            task.insert("description".to_string(), Value::String(name));
            true
        }
        _ => false,
    }
}

fn backfill_ids(records: &mut [Record]) -> usize {
    let mut next = next_id(records);
    let mut assigned = 0;

    for record in records.iter_mut() {
        let missing = record.get("id").map_or(true, Value::is_null);
        if !missing {
            continue;
        }
        let Some(id) = next else {
            break;
        };
        record.insert("id".to_string(), Value::from(id));
        next = id.checked_add(1);
        assigned += 1;
    }

    assigned
}
