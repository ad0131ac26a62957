/// Contract tests for the storage capability
///
/// Every test runs against both backends through `Arc<dyn Store>`, so the
/// relational and file stores are held to the same observable behavior.

use std::sync::Arc;
use taskflow_shared::{
    db::pool::DatabaseConfig,
    models::{
        task::{CreateTask, TaskFilter, TaskPriority, TaskStatus},
        user::{CreateUser, UserFilter, UserRole},
    },
    store::{json::JsonStore, sql::SqlStore, Backend, Store},
};
use tempfile::TempDir;

/// A store plus whatever must outlive it
struct Fixture {
    store: Arc<dyn Store>,
    _dir: Option<TempDir>,
}

async fn fixtures() -> Vec<Fixture> {
    let sql = SqlStore::connect(DatabaseConfig::in_memory())
        .await
        .expect("Failed to open in-memory store");

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let json = JsonStore::new(dir.path().join("db.json"));

    vec![
        Fixture {
            store: Arc::new(sql),
            _dir: None,
        },
        Fixture {
            store: Arc::new(json),
            _dir: Some(dir),
        },
    ]
}

fn task(name: &str, status: TaskStatus, priority: TaskPriority, assignee: Option<i64>) -> CreateTask {
    CreateTask {
        name: name.to_string(),
        description: None,
        status,
        priority,
        assigned_user_id: assignee,
    }
}

#[tokio::test]
async fn test_identities_strictly_increase() {
    for fixture in fixtures().await {
        let store = &fixture.store;
        let mut last_user = 0;
        let mut last_task = 0;

        for i in 0..5 {
            let user = store
                .create_user(CreateUser {
                    name: format!("User {}", i),
                    role: UserRole::Member,
                })
                .await
                .unwrap();
            assert!(user.id > last_user, "{}: user id did not increase", store.backend());
            last_user = user.id;

            let created = store
                .create_task(task(&format!("Task {}", i), TaskStatus::Todo, TaskPriority::Low, None))
                .await
                .unwrap();
            assert!(created.id > last_task, "{}: task id did not increase", store.backend());
            last_task = created.id;
        }
    }
}

#[tokio::test]
async fn test_identities_are_not_reused_after_delete() {
    for fixture in fixtures().await {
        let store = &fixture.store;

        let ada = store
            .create_user(CreateUser {
                name: "Ada".to_string(),
                role: UserRole::Admin,
            })
            .await
            .unwrap();
        let bob = store
            .create_user(CreateUser {
                name: "Bob".to_string(),
                role: UserRole::Member,
            })
            .await
            .unwrap();
        let bobs_task = store
            .create_task(task("Review", TaskStatus::Todo, TaskPriority::Low, Some(bob.id)))
            .await
            .unwrap();

        assert!(store.delete_user(bob.id).await.unwrap(), "{}", store.backend());

        let carol = store
            .create_user(CreateUser {
                name: "Carol".to_string(),
                role: UserRole::Member,
            })
            .await
            .unwrap();
        let next_task = store
            .create_task(task("Ship", TaskStatus::Todo, TaskPriority::High, Some(ada.id)))
            .await
            .unwrap();

        assert!(carol.id > bob.id, "{}: user id reused", store.backend());
        assert!(next_task.id > bobs_task.id, "{}: task id reused", store.backend());
    }
}

#[tokio::test]
async fn test_first_ids_match_scenario() {
    for fixture in fixtures().await {
        let store = &fixture.store;

        let ada = store
            .create_user(CreateUser {
                name: "Ada".to_string(),
                role: UserRole::Admin,
            })
            .await
            .unwrap();
        let grace = store
            .create_user(CreateUser {
                name: "Grace".to_string(),
                role: UserRole::Admin,
            })
            .await
            .unwrap();

        assert_eq!(ada.id, 1, "{}", store.backend());
        assert_eq!(grace.id, 2, "{}", store.backend());
    }
}

#[tokio::test]
async fn test_task_filtering_is_conjunctive_and_exact() {
    for fixture in fixtures().await {
        let store = &fixture.store;

        let mut created = Vec::new();
        for status in TaskStatus::ALL {
            for priority in TaskPriority::ALL {
                for assignee in [None, Some(1), Some(2)] {
                    let name = format!("{}-{}", status, priority);
                    created.push(store.create_task(task(&name, status, priority, assignee)).await.unwrap());
                }
            }
        }

        let filter = TaskFilter {
            status: Some(TaskStatus::InProgress),
            priority: Some(TaskPriority::High),
            assigned_user_id: None,
        };
        let expected: Vec<_> = created.iter().filter(|t| filter.matches(t)).cloned().collect();
        let listed = store.list_tasks(&filter).await.unwrap();
        assert_eq!(listed.len(), 3, "{}", store.backend());
        assert_eq!(listed, expected, "{}", store.backend());

        let filter = TaskFilter {
            status: Some(TaskStatus::Done),
            priority: None,
            assigned_user_id: Some(2),
        };
        let listed = store.list_tasks(&filter).await.unwrap();
        assert_eq!(listed.len(), 3, "{}", store.backend());
        assert!(listed
            .iter()
            .all(|t| t.status == TaskStatus::Done && t.assigned_user_id == Some(2)));

        assert_eq!(
            store.list_tasks(&TaskFilter::default()).await.unwrap(),
            created,
            "{}",
            store.backend()
        );
    }
}

#[tokio::test]
async fn test_user_filtering_is_exact_match() {
    for fixture in fixtures().await {
        let store = &fixture.store;
        for (name, role) in [
            ("Ada", UserRole::Admin),
            ("Ada Lovelace", UserRole::Admin),
            ("Grace", UserRole::Manager),
        ] {
            store
                .create_user(CreateUser {
                    name: name.to_string(),
                    role,
                })
                .await
                .unwrap();
        }

        let admins = store
            .list_users(&UserFilter {
                role: Some(UserRole::Admin),
                name: None,
            })
            .await
            .unwrap();
        assert_eq!(admins.len(), 2, "{}", store.backend());

        let ada = store
            .list_users(&UserFilter {
                role: Some(UserRole::Admin),
                name: Some("Ada".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(ada.len(), 1, "{}", store.backend());
        assert_eq!(ada[0].name, "Ada");

        let prefix = store
            .list_users(&UserFilter {
                role: None,
                name: Some("Gra".to_string()),
            })
            .await
            .unwrap();
        assert!(prefix.is_empty(), "{}", store.backend());
    }
}

#[tokio::test]
async fn test_created_records_round_trip() {
    for fixture in fixtures().await {
        let store = &fixture.store;

        let described = store
            .create_task(CreateTask {
                name: "Write docs".to_string(),
                description: Some("Cover the import tool".to_string()),
                status: TaskStatus::InProgress,
                priority: TaskPriority::Medium,
                assigned_user_id: Some(7),
            })
            .await
            .unwrap();
        let defaulted = store
            .create_task(task("Fix bug", TaskStatus::Todo, TaskPriority::High, None))
            .await
            .unwrap();

        assert_eq!(described.description.as_deref(), Some("Cover the import tool"));
        assert_eq!(defaulted.description.as_deref(), Some("Fix bug"));

        let listed = store.list_tasks(&TaskFilter::default()).await.unwrap();
        assert_eq!(listed, vec![described, defaulted], "{}", store.backend());
    }
}

#[tokio::test]
async fn test_backends_report_their_kind() {
    let kinds: Vec<Backend> = fixtures().await.iter().map(|f| f.store.backend()).collect();
    assert_eq!(kinds, vec![Backend::Sql, Backend::Json]);
}
