//! Shared tests for UserRepo implementations

use uuid::Uuid;

use crate::{
    db::{
        error::DbError,
        repos::{ListParams, UserRepo},
    },
    models::CreateUser,
};

fn create_user_input(external_id: &str) -> CreateUser {
    CreateUser {
        external_id: external_id.to_string(),
        email: None,
        name: None,
    }
}

fn roles(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

pub async fn test_create_user(repo: &dyn UserRepo) {
    let user = repo
        .create(CreateUser {
            external_id: "user-123".to_string(),
            email: Some("test@example.com".to_string()),
            name: Some("Test User".to_string()),
        })
        .await
        .expect("Failed to create user");

    assert_eq!(user.external_id, "user-123");
    assert_eq!(user.email, Some("test@example.com".to_string()));
    assert!(!user.id.is_nil());
}

pub async fn test_create_duplicate_external_id_fails(repo: &dyn UserRepo) {
    repo.create(create_user_input("duplicate-id"))
        .await
        .expect("Failed to create first user");

    let result = repo.create(create_user_input("duplicate-id")).await;
    assert!(matches!(result, Err(DbError::Conflict(_))));
}

pub async fn test_get_by_external_id(repo: &dyn UserRepo) {
    let created = repo
        .create(create_user_input("ext-id-test"))
        .await
        .expect("Failed to create user");

    let fetched = repo
        .get_by_external_id("ext-id-test")
        .await
        .expect("Failed to get user")
        .expect("User should exist");
    assert_eq!(fetched.id, created.id);

    let missing = repo
        .get_by_external_id("no-such-subject")
        .await
        .expect("Query should succeed");
    assert!(missing.is_none());
}

pub async fn test_get_by_id_not_found(repo: &dyn UserRepo) {
    let result = repo
        .get_by_id(Uuid::new_v4())
        .await
        .expect("Query should succeed");
    assert!(result.is_none());
}

pub async fn test_new_user_has_no_roles(repo: &dyn UserRepo) {
    let user = repo
        .create(create_user_input("roleless"))
        .await
        .expect("Failed to create user");

    let assigned = repo.roles(user.id).await.expect("Failed to read roles");
    assert!(assigned.is_empty());
}

pub async fn test_add_roles_unions_and_sorts(repo: &dyn UserRepo) {
    let user = repo
        .create(create_user_input("union-test"))
        .await
        .expect("Failed to create user");

    repo.add_roles(user.id, &roles(&["USER"]))
        .await
        .expect("Failed to add first role");
    let resulting = repo
        .add_roles(user.id, &roles(&["EDITOR", "ADMIN"]))
        .await
        .expect("Failed to add more roles");

    assert_eq!(resulting, roles(&["ADMIN", "EDITOR", "USER"]));
}

pub async fn test_add_already_held_role_is_noop(repo: &dyn UserRepo) {
    let user = repo
        .create(create_user_input("idempotent-test"))
        .await
        .expect("Failed to create user");

    repo.add_roles(user.id, &roles(&["EDITOR"]))
        .await
        .expect("Failed to add role");
    let resulting = repo
        .add_roles(user.id, &roles(&["EDITOR"]))
        .await
        .expect("Re-adding should succeed");

    assert_eq!(resulting, roles(&["EDITOR"]));
}

pub async fn test_remove_role(repo: &dyn UserRepo) {
    let user = repo
        .create(create_user_input("remove-test"))
        .await
        .expect("Failed to create user");
    repo.add_roles(user.id, &roles(&["USER", "EDITOR"]))
        .await
        .expect("Failed to add roles");

    let removed = repo
        .remove_role(user.id, "EDITOR")
        .await
        .expect("Failed to remove role");
    assert!(removed);
    assert_eq!(
        repo.roles(user.id).await.expect("Failed to read roles"),
        roles(&["USER"])
    );
}

pub async fn test_remove_absent_role_reports_false(repo: &dyn UserRepo) {
    let user = repo
        .create(create_user_input("remove-absent"))
        .await
        .expect("Failed to create user");

    let removed = repo
        .remove_role(user.id, "EDITOR")
        .await
        .expect("Removal of absent role should not error");
    assert!(!removed);
}

pub async fn test_list_with_pagination(repo: &dyn UserRepo) {
    for i in 0..5 {
        repo.create(create_user_input(&format!("user-{}", i)))
            .await
            .expect("Failed to create user");
    }

    let page1 = repo
        .list(ListParams::page(2, 0))
        .await
        .expect("Failed to list page 1");
    let page2 = repo
        .list(ListParams::page(2, 2))
        .await
        .expect("Failed to list page 2");
    let tail = repo
        .list(ListParams::page(2, 4))
        .await
        .expect("Failed to list tail");

    assert_eq!(page1.items.len(), 2);
    assert!(page1.has_more);
    assert_eq!(page2.items.len(), 2);
    assert!(page2.has_more);
    assert_eq!(tail.items.len(), 1);
    assert!(!tail.has_more);
    assert_ne!(page1.items[0].id, page2.items[0].id);
}

mod sqlite_tests {
    use super::*;
    use crate::db::{
        sqlite::SqliteUserRepo,
        tests::harness::{create_sqlite_pool, run_sqlite_migrations},
    };

    async fn create_repo() -> SqliteUserRepo {
        let pool = create_sqlite_pool().await;
        run_sqlite_migrations(&pool).await;
        SqliteUserRepo::new(pool)
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

    sqlite_test!(test_create_user);
    sqlite_test!(test_create_duplicate_external_id_fails);
    sqlite_test!(test_get_by_external_id);
    sqlite_test!(test_get_by_id_not_found);
    sqlite_test!(test_new_user_has_no_roles);
    sqlite_test!(test_add_roles_unions_and_sorts);
    sqlite_test!(test_add_already_held_role_is_noop);
    sqlite_test!(test_remove_role);
    sqlite_test!(test_remove_absent_role_reports_false);
    sqlite_test!(test_list_with_pagination);
}
