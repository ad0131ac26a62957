//! # TaskFlow Migration Library
//!
//! One-shot import of a legacy JSON document into the relational store.
//!
//! ## Modules
//!
//! - `records`: Conversion of normalized raw records into typed rows
//!
//! ## Behavior
//!
//! The document is normalized in memory (the source file is not rewritten)
//! and every record is copied with its identity preserved. Records whose
//! identity already exists are skipped, never updated, so running the
//! import twice inserts nothing the second time. Records lacking a mandatory
//! field are skipped silently. All inserts share one session that is
//! committed once at the end.
//!
//! ## Example
//!
//! ```no_run
//! use taskflow_migrate::migrate;
//! use taskflow_shared::{db::pool::DatabaseConfig, store::sql::SqlStore};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let store = SqlStore::connect(DatabaseConfig::default()).await?;
//! let report = migrate(&store, "db.json".as_ref()).await?;
//! println!("{}", report);
//! # Ok(())
//! # }
//! ```

pub mod records;

use std::{fmt, path::Path};
use taskflow_shared::store::{
    json::JsonStore,
    sql::{self, SqlStore},
    StoreError,
};
use tracing::{debug, info};

use records::{task_from_record, user_from_record};

/// Migration error types
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    /// Reading the source document or opening the store failed
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// A query against the relational store failed
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A record carries a value that cannot be imported
    #[error("Invalid {entity} record: field '{field}' has value {value}")]
    InvalidRecord {
        entity: &'static str,
        field: &'static str,
        value: String,
    },
}

/// Counts reported by a migration run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub users_inserted: usize,
    pub tasks_inserted: usize,

    /// Users skipped as duplicates or for missing mandatory fields
    pub users_skipped: usize,

    /// Tasks skipped as duplicates or for missing mandatory fields
    pub tasks_skipped: usize,
}

impl MigrationReport {
    /// Rows written by the run
    pub fn inserted(&self) -> usize {
        self.users_inserted + self.tasks_inserted
    }
}

impl fmt::Display for MigrationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Migrated {} users and {} tasks ({} users and {} tasks skipped)",
            self.users_inserted, self.tasks_inserted, self.users_skipped, self.tasks_skipped
        )
    }
}

/// Imports the legacy document at `source` into the relational store
///
/// A missing source file is not an error: nothing is imported and an empty
/// report is returned.
///
/// # Errors
///
/// Fails on storage errors and on records whose identity or enumerated
/// fields cannot be parsed. Nothing is committed when the run fails.
pub async fn migrate(store: &SqlStore, source: &Path) -> Result<MigrationReport, MigrationError> {
    if !tokio::fs::try_exists(source).await.map_err(StoreError::from)? {
        info!(source = %source.display(), "No legacy document found, skipping");
        return Ok(MigrationReport::default());
    }

    let mut document = JsonStore::new(source).load().await?;
    let normalized = document.normalize();
    debug!(
        ids_assigned = normalized.ids_assigned,
        fields_renamed = normalized.fields_renamed,
        descriptions_filled = normalized.descriptions_filled,
        "Normalized legacy document"
    );

    store.initialize().await?;
    let mut session = store.acquire_session().await?;
    let mut report = MigrationReport::default();

    for record in &document.users {
        let Some(user) = user_from_record(record)? else {
            report.users_skipped += 1;
            continue;
        };

        if sql::user_exists(&mut session, user.id).await? {
            debug!(user_id = user.id, "User already present, skipping");
            report.users_skipped += 1;
            continue;
        }

        sql::insert_user_with_id(&mut session, &user).await?;
        report.users_inserted += 1;
    }

    for record in &document.tasks {
        let Some(task) = task_from_record(record)? else {
            report.tasks_skipped += 1;
            continue;
        };

        if sql::task_exists(&mut session, task.id).await? {
            debug!(task_id = task.id, "Task already present, skipping");
            report.tasks_skipped += 1;
            continue;
        }

        sql::insert_task_with_id(&mut session, &task).await?;
        report.tasks_inserted += 1;
    }

    session.commit().await?;

    info!(
        users_inserted = report.users_inserted,
        tasks_inserted = report.tasks_inserted,
        users_skipped = report.users_skipped,
        tasks_skipped = report.tasks_skipped,
        "Migration committed"
    );
    Ok(report)
}
