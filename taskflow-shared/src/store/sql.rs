/// Relational backend
///
/// Users and tasks live in two SQLite tables managed through a sqlx pool.
/// Work is done inside scoped sessions (transactions): a session returns its
/// connection to the pool on every exit path, and anything not explicitly
/// committed is rolled back when the session is dropped.
///
/// # Example
///
/// ```no_run
/// use taskflow_shared::db::pool::DatabaseConfig;
/// use taskflow_shared::models::user::{CreateUser, UserRole};
/// use taskflow_shared::store::sql::{self, SqlStore};
///
/// # async fn example() -> Result<(), taskflow_shared::store::StoreError> {
/// let store = SqlStore::connect(DatabaseConfig::default()).await?;
///
/// let mut session = store.acquire_session().await?;
/// let user = sql::insert_user(
///     &mut session,
///     &CreateUser { name: "Ada".to_string(), role: UserRole::Admin },
/// )
/// .await?;
/// session.commit().await?;
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use sqlx::{
    sqlite::{SqliteConnection, SqlitePool},
    QueryBuilder, Sqlite, Transaction,
};
use tracing::{debug, info};

use super::{Backend, Store, StoreResult};
use crate::{
    db::{
        migrations::{ensure_database_exists, get_migration_status, run_migrations},
        pool::{close_pool, create_pool, get_pool_stats, DatabaseConfig},
    },
    models::{
        task::{CreateTask, Task, TaskFilter},
        user::{CreateUser, User, UserFilter},
    },
};

/// A scoped unit of work against the relational store
pub type Session = Transaction<'static, Sqlite>;

const USER_COLUMNS: &str = "id, name, role";
const TASK_COLUMNS: &str = "id, name, description, status, priority, assigned_user_id";

/// Store backed by a SQLite database
#[derive(Debug, Clone)]
pub struct SqlStore {
    pool: SqlitePool,
}

impl SqlStore {
    /// Wraps an existing pool; call [`SqlStore::initialize`] before use
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Creates the pool and initializes the schema
    pub async fn connect(config: DatabaseConfig) -> StoreResult<Self> {
        ensure_database_exists(&config.url).await?;
        let pool = create_pool(config).await?;
        let store = Self::new(pool);
        store.initialize().await?;
        Ok(store)
    }

    /// Creates the schema if it is absent
    ///
    /// Safe to call any number of times.
    pub async fn initialize(&self) -> StoreResult<()> {
        run_migrations(&self.pool).await?;

        let status = get_migration_status(&self.pool).await?;
        let stats = get_pool_stats(&self.pool);
        info!(
            applied_migrations = status.applied_migrations,
            latest_version = ?status.latest_version,
            connections = stats.total_connections,
            "Relational store initialized"
        );
        Ok(())
    }

    /// Opens a scoped session
    ///
    /// Nothing is committed implicitly: call `commit()` on the session to
    /// persist writes. Dropping it rolls back and releases the connection.
    pub async fn acquire_session(&self) -> StoreResult<Session> {
        Ok(self.pool.begin().await?)
    }

    /// Underlying connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Closes every pooled connection
    pub async fn close(self) {
        close_pool(self.pool).await;
    }
}

#[async_trait]
impl Store for SqlStore {
    fn backend(&self) -> Backend {
        Backend::Sql
    }

    async fn list_users(&self, filter: &UserFilter) -> StoreResult<Vec<User>> {
        let mut session = self.acquire_session().await?;
        let users = select_users(&mut session, filter).await?;
        debug!(count = users.len(), "Listed users");
        Ok(users)
    }

    async fn create_user(&self, data: CreateUser) -> StoreResult<User> {
        let mut session = self.acquire_session().await?;
        let user = insert_user(&mut session, &data).await?;
        session.commit().await?;

        info!(user_id = user.id, role = %user.role, "Created user");
        Ok(user)
    }

    async fn list_tasks(&self, filter: &TaskFilter) -> StoreResult<Vec<Task>> {
        let mut session = self.acquire_session().await?;
        let tasks = select_tasks(&mut session, filter).await?;
        debug!(count = tasks.len(), "Listed tasks");
        Ok(tasks)
    }

    async fn create_task(&self, data: CreateTask) -> StoreResult<Task> {
        let mut session = self.acquire_session().await?;
        let task = insert_task(&mut session, &data).await?;
        session.commit().await?;

        info!(task_id = task.id, status = %task.status, "Created task");
        Ok(task)
    }

    async fn delete_user(&self, id: i64) -> StoreResult<bool> {
        let mut session = self.acquire_session().await?;

        let tasks = sqlx::query("DELETE FROM tasks WHERE assigned_user_id = ?")
            .bind(id)
            .execute(&mut *session)
            .await?;
        let users = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&mut *session)
            .await?;

        if users.rows_affected() == 0 {
            // Unknown user: leave its orphaned tasks alone.
            session.rollback().await?;
            return Ok(false);
        }

        session.commit().await?;
        info!(
            user_id = id,
            tasks_deleted = tasks.rows_affected(),
            "Deleted user"
        );
        Ok(true)
    }
}

/// Selects users matching every populated filter field
pub async fn select_users(
    conn: &mut SqliteConnection,
    filter: &UserFilter,
) -> Result<Vec<User>, sqlx::Error> {
    let mut query = QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM users WHERE 1 = 1", USER_COLUMNS));

    if let Some(role) = filter.role {
        query.push(" AND role = ").push_bind(role);
    }
    if let Some(name) = &filter.name {
        query.push(" AND name = ").push_bind(name.as_str());
    }
    query.push(" ORDER BY id");

    query.build_query_as::<User>().fetch_all(conn).await
}

/// Selects tasks matching every populated filter field
pub async fn select_tasks(
    conn: &mut SqliteConnection,
    filter: &TaskFilter,
) -> Result<Vec<Task>, sqlx::Error> {
    let mut query = QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM tasks WHERE 1 = 1", TASK_COLUMNS));

    if let Some(status) = filter.status {
        query.push(" AND status = ").push_bind(status);
    }
    if let Some(priority) = filter.priority {
        query.push(" AND priority = ").push_bind(priority);
    }
    if let Some(user_id) = filter.assigned_user_id {
        query.push(" AND assigned_user_id = ").push_bind(user_id);
    }
    query.push(" ORDER BY id");

    query.build_query_as::<Task>().fetch_all(conn).await
}

/// Inserts a user, letting the table assign the identity
pub async fn insert_user(conn: &mut SqliteConnection, data: &CreateUser) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (name, role) VALUES (?, ?) RETURNING {}",
        USER_COLUMNS
    ))
    .bind(&data.name)
    .bind(data.role)
    .fetch_one(conn)
    .await
}

/// Inserts a task, letting the table assign the identity
///
/// A missing description is stored as the task name.
pub async fn insert_task(conn: &mut SqliteConnection, data: &CreateTask) -> Result<Task, sqlx::Error> {
    sqlx::query_as::<_, Task>(&format!(
        "INSERT INTO tasks (name, description, status, priority, assigned_user_id)
         VALUES (?, ?, ?, ?, ?)
         RETURNING {}",
        TASK_COLUMNS
    ))
    .bind(&data.name)
    .bind(data.resolved_description())
    .bind(data.status)
    .bind(data.priority)
    .bind(data.assigned_user_id)
    .fetch_one(conn)
    .await
}

/// Inserts a user that already carries an identity
pub async fn insert_user_with_id(conn: &mut SqliteConnection, user: &User) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO users (id, name, role) VALUES (?, ?, ?)")
        .bind(user.id)
        .bind(&user.name)
        .bind(user.role)
        .execute(conn)
        .await?;
    Ok(())
}

/// Inserts a task that already carries an identity
///
/// The description is stored as given, including `NULL`.
pub async fn insert_task_with_id(conn: &mut SqliteConnection, task: &Task) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO tasks (id, name, description, status, priority, assigned_user_id)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(task.id)
    .bind(&task.name)
    .bind(&task.description)
    .bind(task.status)
    .bind(task.priority)
    .bind(task.assigned_user_id)
    .execute(conn)
    .await?;
    Ok(())
}

/// Returns true if a user row with this identity exists
pub async fn user_exists(conn: &mut SqliteConnection, id: i64) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE id = ?)")
        .bind(id)
        .fetch_one(conn)
        .await
}

/// Returns true if a task row with this identity exists
pub async fn task_exists(conn: &mut SqliteConnection, id: i64) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM tasks WHERE id = ?)")
        .bind(id)
        .fetch_one(conn)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        task::{TaskPriority, TaskStatus},
        user::UserRole,
    };

    async fn store() -> SqlStore {
        SqlStore::connect(DatabaseConfig::in_memory()).await.unwrap()
    }

    fn new_user(name: &str, role: UserRole) -> CreateUser {
        CreateUser {
            name: name.to_string(),
            role,
        }
    }

    fn new_task(name: &str, status: TaskStatus, priority: TaskPriority, assignee: Option<i64>) -> CreateTask {
        CreateTask {
            name: name.to_string(),
            description: None,
            status,
            priority,
            assigned_user_id: assignee,
        }
    }

    #[tokio::test]
    async fn test_create_user_assigns_increasing_ids() {
        let store = store().await;

        let ada = store.create_user(new_user("Ada", UserRole::Admin)).await.unwrap();
        let grace = store.create_user(new_user("Grace", UserRole::Member)).await.unwrap();

        assert_eq!(ada.id, 1);
        assert_eq!(grace.id, 2);
        assert_eq!(
            store.list_users(&UserFilter::default()).await.unwrap(),
            vec![ada, grace]
        );
    }

    #[tokio::test]
    async fn test_user_filters_are_exact_match() {
        let store = store().await;
        store.create_user(new_user("Ada", UserRole::Admin)).await.unwrap();
        store.create_user(new_user("Adam", UserRole::Member)).await.unwrap();

        let by_name = store
            .list_users(&UserFilter {
                role: None,
                name: Some("Ada".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].name, "Ada");

        let none = store
            .list_users(&UserFilter {
                role: Some(UserRole::Member),
                name: Some("Ada".to_string()),
            })
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_task_filters_are_conjunctive() {
        let store = store().await;
        let a = store
            .create_task(new_task("Fix bug", TaskStatus::Todo, TaskPriority::High, Some(1)))
            .await
            .unwrap();
        store
            .create_task(new_task("Write docs", TaskStatus::Todo, TaskPriority::Low, Some(1)))
            .await
            .unwrap();
        store
            .create_task(new_task("Ship", TaskStatus::Done, TaskPriority::High, None))
            .await
            .unwrap();

        let filter = TaskFilter {
            status: Some(TaskStatus::Todo),
            priority: Some(TaskPriority::High),
            assigned_user_id: None,
        };
        assert_eq!(store.list_tasks(&filter).await.unwrap(), vec![a]);

        let assigned = TaskFilter {
            assigned_user_id: Some(1),
            ..Default::default()
        };
        assert_eq!(store.list_tasks(&assigned).await.unwrap().len(), 2);
        assert_eq!(store.list_tasks(&TaskFilter::default()).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_create_task_defaults_description() {
        let store = store().await;

        let task = store
            .create_task(new_task("Fix bug", TaskStatus::InProgress, TaskPriority::Medium, Some(42)))
            .await
            .unwrap();

        assert_eq!(task.description.as_deref(), Some("Fix bug"));
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.assigned_user_id, Some(42));
        assert_eq!(store.list_tasks(&TaskFilter::default()).await.unwrap(), vec![task]);
    }

    #[tokio::test]
    async fn test_delete_user_cascades_to_tasks() {
        let store = store().await;
        let ada = store.create_user(new_user("Ada", UserRole::Admin)).await.unwrap();
        let grace = store.create_user(new_user("Grace", UserRole::Member)).await.unwrap();
        store
            .create_task(new_task("Fix bug", TaskStatus::Todo, TaskPriority::High, Some(ada.id)))
            .await
            .unwrap();
        let kept = store
            .create_task(new_task("Review", TaskStatus::Todo, TaskPriority::Low, Some(grace.id)))
            .await
            .unwrap();

        assert!(store.delete_user(ada.id).await.unwrap());
        assert!(!store.delete_user(ada.id).await.unwrap());

        assert_eq!(store.list_users(&UserFilter::default()).await.unwrap(), vec![grace]);
        assert_eq!(store.list_tasks(&TaskFilter::default()).await.unwrap(), vec![kept]);
    }

    #[tokio::test]
    async fn test_uncommitted_session_is_rolled_back() {
        let store = store().await;

        {
            let mut session = store.acquire_session().await.unwrap();
            insert_user(&mut session, &new_user("Ada", UserRole::Admin))
                .await
                .unwrap();
        }

        assert!(store.list_users(&UserFilter::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_explicit_ids_keep_sequence_monotonic() {
        let store = store().await;

        let mut session = store.acquire_session().await.unwrap();
        insert_user_with_id(
            &mut session,
            &User {
                id: 10,
                name: "Ada".to_string(),
                role: UserRole::Admin,
            },
        )
        .await
        .unwrap();
        assert!(user_exists(&mut session, 10).await.unwrap());
        assert!(!user_exists(&mut session, 11).await.unwrap());
        assert!(!task_exists(&mut session, 10).await.unwrap());
        session.commit().await.unwrap();

        let next = store.create_user(new_user("Grace", UserRole::Member)).await.unwrap();
        assert_eq!(next.id, 11);
    }

    #[tokio::test]
    async fn test_initialize_twice_keeps_data() {
        let store = store().await;
        store.create_user(new_user("Ada", UserRole::Admin)).await.unwrap();

        store.initialize().await.unwrap();

        assert_eq!(store.list_users(&UserFilter::default()).await.unwrap().len(), 1);
        assert_eq!(store.backend(), Backend::Sql);
    }
}
