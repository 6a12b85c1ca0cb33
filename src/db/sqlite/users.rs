use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::common::parse_uuid;
use crate::{
    db::{
        error::{DbError, DbResult},
        repos::{ListParams, Page, UserRepo},
    },
    models::{CreateUser, User},
};

pub struct SqliteUserRepo {
    pool: SqlitePool,
}

impl SqliteUserRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> DbResult<User> {
        Ok(User {
            id: parse_uuid(&row.get::<String, _>("id"))?,
            external_id: row.get("external_id"),
            email: row.get("email"),
            name: row.get("name"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }
}

#[async_trait]
impl UserRepo for SqliteUserRepo {
    async fn create(&self, input: CreateUser) -> DbResult<User> {
        let id = Uuid::new_v4();
        let now = chrono::Utc::now();

        sqlx::query(
            r#"
            INSERT INTO users (id, external_id, email, name, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(&input.external_id)
        .bind(&input.email)
        .bind(&input.name)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                DbError::Conflict(format!(
                    "User with external_id '{}' already exists",
                    input.external_id
                ))
            }
            _ => DbError::from(e),
        })?;

        Ok(User {
            id,
            external_id: input.external_id,
            email: input.email,
            name: input.name,
            created_at: now,
            updated_at: now,
        })
    }

    async fn get_by_id(&self, id: Uuid) -> DbResult<Option<User>> {
        let result = sqlx::query(
            r#"
            SELECT id, external_id, email, name, created_at, updated_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        match result {
            Some(row) => Ok(Some(Self::row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    async fn get_by_external_id(&self, external_id: &str) -> DbResult<Option<User>> {
        let result = sqlx::query(
            r#"
            SELECT id, external_id, email, name, created_at, updated_at
            FROM users
            WHERE external_id = ?
            "#,
        )
        .bind(external_id)
        .fetch_optional(&self.pool)
        .await?;

        match result {
            Some(row) => Ok(Some(Self::row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    async fn list(&self, params: ListParams) -> DbResult<Page<User>> {
        let limit = params.effective_limit();

        let rows = sqlx::query(
            r#"
            SELECT id, external_id, email, name, created_at, updated_at
            FROM users
            ORDER BY created_at DESC, id DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(limit + 1)
        .bind(params.offset)
        .fetch_all(&self.pool)
        .await?;

        let users = rows
            .iter()
            .map(Self::row_to_user)
            .collect::<DbResult<Vec<_>>>()?;

        Ok(Page::from_overfetch(users, limit))
    }

    async fn roles(&self, user_id: Uuid) -> DbResult<Vec<String>> {
        let rows = sqlx::query(
            r#"
            SELECT role FROM user_roles
            WHERE user_id = ?
            ORDER BY role
            "#,
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|row| row.get("role")).collect())
    }

    async fn add_roles(&self, user_id: Uuid, roles: &[String]) -> DbResult<Vec<String>> {
        let now = chrono::Utc::now();

        for role in roles {
            sqlx::query(
                r#"
                INSERT INTO user_roles (user_id, role, granted_at)
                VALUES (?, ?, ?)
                ON CONFLICT (user_id, role) DO NOTHING
                "#,
            )
            .bind(user_id.to_string())
            .bind(role)
            .bind(now)
            .execute(&self.pool)
            .await?;
        }

        self.roles(user_id).await
    }

    async fn remove_role(&self, user_id: Uuid, role: &str) -> DbResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM user_roles
            WHERE user_id = ? AND role = ?
            "#,
        )
        .bind(user_id.to_string())
        .bind(role)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
