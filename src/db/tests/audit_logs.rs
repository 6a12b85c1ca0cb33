//! Shared tests for AuditLogRepo implementations

use serde_json::json;

use crate::{
    db::repos::{AuditLogRepo, ListParams},
    models::{AuditActorType, AuditLogQuery, CreateAuditLog},
};

fn entry(actor: Option<&str>, action: &str, target: &str) -> CreateAuditLog {
    CreateAuditLog {
        actor_type: if actor.is_some() {
            AuditActorType::User
        } else {
            AuditActorType::System
        },
        actor_subject: actor.map(str::to_string),
        action: action.to_string(),
        target_subject: target.to_string(),
        details: json!({ "roles": ["EDITOR"] }),
    }
}

pub async fn test_create_and_fetch(repo: &dyn AuditLogRepo) {
    let created = repo
        .create(entry(Some("a1"), "roles.add", "u1"))
        .await
        .expect("Failed to create audit log");

    let fetched = repo
        .get_by_id(created.id)
        .await
        .expect("Failed to fetch")
        .expect("Entry should exist");

    assert_eq!(fetched.actor_type, AuditActorType::User);
    assert_eq!(fetched.actor_subject, Some("a1".to_string()));
    assert_eq!(fetched.action, "roles.add");
    assert_eq!(fetched.target_subject, "u1");
    assert_eq!(fetched.details, json!({ "roles": ["EDITOR"] }));
}

pub async fn test_list_filters_by_action_and_target(repo: &dyn AuditLogRepo) {
    repo.create(entry(Some("a1"), "roles.add", "u1"))
        .await
        .expect("Failed to create");
    repo.create(entry(Some("a1"), "roles.remove", "u1"))
        .await
        .expect("Failed to create");
    repo.create(entry(None, "roles.sync", "u2"))
        .await
        .expect("Failed to create");

    let adds = repo
        .list(
            AuditLogQuery {
                action: Some("roles.add".to_string()),
                ..Default::default()
            },
            ListParams::default(),
        )
        .await
        .expect("Failed to list by action");
    assert_eq!(adds.items.len(), 1);

    let for_u1 = repo
        .list(
            AuditLogQuery {
                target_subject: Some("u1".to_string()),
                ..Default::default()
            },
            ListParams::default(),
        )
        .await
        .expect("Failed to list by target");
    assert_eq!(for_u1.items.len(), 2);

    let by_system = repo
        .list(
            AuditLogQuery {
                actor_subject: Some("a1".to_string()),
                ..Default::default()
            },
            ListParams::default(),
        )
        .await
        .expect("Failed to list by actor");
    assert_eq!(by_system.items.len(), 2);
}

mod sqlite_tests {
    use super::*;
    use crate::db::{
        sqlite::SqliteAuditLogRepo,
        tests::harness::{create_sqlite_pool, run_sqlite_migrations},
    };

    async fn create_repo() -> SqliteAuditLogRepo {
        let pool = create_sqlite_pool().await;
        run_sqlite_migrations(&pool).await;
        SqliteAuditLogRepo::new(pool)
    }

    macro_rules! sqlite_test {
        ($name:ident) => {
            #[tokio::test]
            async fn $name() {
                let repo = create_repo().await;
                super::$name(&repo).await;
            }
        };
    }

    sqlite_test!(test_create_and_fetch);
    sqlite_test!(test_list_filters_by_action_and_target);
}
