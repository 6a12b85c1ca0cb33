use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::common::parse_uuid;
use crate::{
    db::{
        error::{DbError, DbResult},
        repos::{ListParams, NewRoleRequest, Page, RoleRequestRepo, RoleRequestTransition},
    },
    models::{RoleRequest, RoleRequestQuery, RoleRequestStatus},
};

pub struct SqliteRoleRequestRepo {
    pool: SqlitePool,
}

impl SqliteRoleRequestRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn parse_status(s: &str) -> DbResult<RoleRequestStatus> {
        s.parse().map_err(DbError::Internal)
    }

    fn row_to_request(row: &sqlx::sqlite::SqliteRow) -> DbResult<RoleRequest> {
        let roles_json: String = row.get("roles");

        Ok(RoleRequest {
            id: parse_uuid(&row.get::<String, _>("id"))?,
            requester_subject: row.get("requester_subject"),
            roles: serde_json::from_str(&roles_json)?,
            reason: row.get("reason"),
            status: Self::parse_status(&row.get::<String, _>("status"))?,
            decided_by: row.get("decided_by"),
            decision_note: row.get("decision_note"),
            decided_at: row.get("decided_at"),
            version: row.get("version"),
            created_at: row.get("created_at"),
        })
    }
}

const REQUEST_COLUMNS: &str = "id, requester_subject, roles, reason, status, \
                               decided_by, decision_note, decided_at, version, created_at";

#[async_trait]
impl RoleRequestRepo for SqliteRoleRequestRepo {
    async fn create(&self, input: NewRoleRequest) -> DbResult<RoleRequest> {
        let id = Uuid::new_v4();
        let now = chrono::Utc::now();
        let roles_json = serde_json::to_string(&input.roles)?;

        // The partial unique index over PENDING rows serializes concurrent
        // creates for the same requester; the loser lands here.
        sqlx::query(
            r#"
            INSERT INTO role_requests (id, requester_subject, roles, reason, status, version, created_at)
            VALUES (?, ?, ?, ?, ?, 0, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(&input.requester_subject)
        .bind(&roles_json)
        .bind(&input.reason)
        .bind(RoleRequestStatus::Pending.as_str())
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => DbError::Conflict(
                "an existing PENDING request must be resolved first".to_string(),
            ),
            _ => DbError::from(e),
        })?;

        Ok(RoleRequest {
            id,
            requester_subject: input.requester_subject,
            roles: input.roles,
            reason: input.reason,
            status: RoleRequestStatus::Pending,
            decided_by: None,
            decision_note: None,
            decided_at: None,
            version: 0,
            created_at: now,
        })
    }

    async fn get_by_id(&self, id: Uuid) -> DbResult<Option<RoleRequest>> {
        let result = sqlx::query(&format!(
            "SELECT {REQUEST_COLUMNS} FROM role_requests WHERE id = ?"
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        match result {
            Some(row) => Ok(Some(Self::row_to_request(&row)?)),
            None => Ok(None),
        }
    }

    async fn pending_for_requester(
        &self,
        requester_subject: &str,
    ) -> DbResult<Option<RoleRequest>> {
        let result = sqlx::query(&format!(
            "SELECT {REQUEST_COLUMNS} FROM role_requests \
             WHERE requester_subject = ? AND status = ?"
        ))
        .bind(requester_subject)
        .bind(RoleRequestStatus::Pending.as_str())
        .fetch_optional(&self.pool)
        .await?;

        match result {
            Some(row) => Ok(Some(Self::row_to_request(&row)?)),
            None => Ok(None),
        }
    }

    async fn list_by_requester(
        &self,
        requester_subject: &str,
        status: Option<RoleRequestStatus>,
        params: ListParams,
    ) -> DbResult<Page<RoleRequest>> {
        let limit = params.effective_limit();

        let mut sql = format!(
            "SELECT {REQUEST_COLUMNS} FROM role_requests WHERE requester_subject = ?"
        );
        if status.is_some() {
            sql.push_str(" AND status = ?");
        }
        sql.push_str(" ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?");

        let mut query = sqlx::query(&sql).bind(requester_subject);
        if let Some(status) = status {
            query = query.bind(status.as_str());
        }
        let rows = query
            .bind(limit + 1)
            .bind(params.offset)
            .fetch_all(&self.pool)
            .await?;

        let requests = rows
            .iter()
            .map(Self::row_to_request)
            .collect::<DbResult<Vec<_>>>()?;

        Ok(Page::from_overfetch(requests, limit))
    }

    async fn list(
        &self,
        query: RoleRequestQuery,
        params: ListParams,
    ) -> DbResult<Page<RoleRequest>> {
        let limit = params.effective_limit();

        let mut sql = format!("SELECT {REQUEST_COLUMNS} FROM role_requests WHERE 1 = 1");
        if query.status.is_some() {
            sql.push_str(" AND status = ?");
        }
        if query.search.is_some() {
            sql.push_str(" AND LOWER(requester_subject) LIKE ?");
        }
        sql.push_str(" ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?");

        let mut q = sqlx::query(&sql);
        if let Some(status) = query.status {
            q = q.bind(status.as_str());
        }
        if let Some(search) = &query.search {
            q = q.bind(format!("%{}%", search.to_lowercase()));
        }
        let rows = q
            .bind(limit + 1)
            .bind(params.offset)
            .fetch_all(&self.pool)
            .await?;

        let requests = rows
            .iter()
            .map(Self::row_to_request)
            .collect::<DbResult<Vec<_>>>()?;

        Ok(Page::from_overfetch(requests, limit))
    }

    async fn transition(
        &self,
        id: Uuid,
        expected_version: i64,
        transition: RoleRequestTransition,
    ) -> DbResult<RoleRequest> {
        let result = sqlx::query(
            r#"
            UPDATE role_requests
            SET status = ?, decided_by = ?, decision_note = ?, decided_at = ?,
                version = version + 1
            WHERE id = ? AND version = ?
            "#,
        )
        .bind(transition.status.as_str())
        .bind(&transition.decided_by)
        .bind(&transition.decision_note)
        .bind(transition.decided_at)
        .bind(id.to_string())
        .bind(expected_version)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            // Disambiguate a stale version from a missing row.
            return match self.get_by_id(id).await? {
                Some(_) => Err(DbError::Conflict(
                    "role request was modified concurrently".to_string(),
                )),
                None => Err(DbError::NotFound),
            };
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::Internal("role request missing after update".to_string()))
    }
}
