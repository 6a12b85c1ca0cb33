use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::common::parse_uuid;
use crate::{
    db::{
        error::{DbError, DbResult},
        repos::{AuditLogRepo, ListParams, Page},
    },
    models::{AuditActorType, AuditLog, AuditLogQuery, CreateAuditLog},
};

pub struct SqliteAuditLogRepo {
    pool: SqlitePool,
}

impl SqliteAuditLogRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn parse_actor_type(s: &str) -> DbResult<AuditActorType> {
        s.parse().map_err(DbError::Internal)
    }

    fn row_to_log(row: &sqlx::sqlite::SqliteRow) -> DbResult<AuditLog> {
        let details_str: String = row.get("details");

        Ok(AuditLog {
            id: parse_uuid(&row.get::<String, _>("id"))?,
            timestamp: row.get("timestamp"),
            actor_type: Self::parse_actor_type(&row.get::<String, _>("actor_type"))?,
            actor_subject: row.get("actor_subject"),
            action: row.get("action"),
            target_subject: row.get("target_subject"),
            details: serde_json::from_str(&details_str)?,
        })
    }
}

#[async_trait]
impl AuditLogRepo for SqliteAuditLogRepo {
    async fn create(&self, input: CreateAuditLog) -> DbResult<AuditLog> {
        let id = Uuid::new_v4();
        let now = chrono::Utc::now();
        let details_json = serde_json::to_string(&input.details)?;

        sqlx::query(
            r#"
            INSERT INTO audit_logs (id, timestamp, actor_type, actor_subject, action, target_subject, details)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(now)
        .bind(input.actor_type.to_string())
        .bind(&input.actor_subject)
        .bind(&input.action)
        .bind(&input.target_subject)
        .bind(&details_json)
        .execute(&self.pool)
        .await?;

        Ok(AuditLog {
            id,
            timestamp: now,
            actor_type: input.actor_type,
            actor_subject: input.actor_subject,
            action: input.action,
            target_subject: input.target_subject,
            details: input.details,
        })
    }

    async fn get_by_id(&self, id: Uuid) -> DbResult<Option<AuditLog>> {
        let result = sqlx::query(
            r#"
            SELECT id, timestamp, actor_type, actor_subject, action, target_subject, details
            FROM audit_logs
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        match result {
            Some(row) => Ok(Some(Self::row_to_log(&row)?)),
            None => Ok(None),
        }
    }

    async fn list(&self, query: AuditLogQuery, params: ListParams) -> DbResult<Page<AuditLog>> {
        let limit = params.effective_limit();

        let mut sql = String::from(
            "SELECT id, timestamp, actor_type, actor_subject, action, target_subject, details \
             FROM audit_logs WHERE 1 = 1",
        );
        if query.actor_subject.is_some() {
            sql.push_str(" AND actor_subject = ?");
        }
        if query.action.is_some() {
            sql.push_str(" AND action = ?");
        }
        if query.target_subject.is_some() {
            sql.push_str(" AND target_subject = ?");
        }
        if query.from.is_some() {
            sql.push_str(" AND timestamp >= ?");
        }
        if query.to.is_some() {
            sql.push_str(" AND timestamp < ?");
        }
        sql.push_str(" ORDER BY timestamp DESC, id DESC LIMIT ? OFFSET ?");

        let mut q = sqlx::query(&sql);
        if let Some(actor_subject) = &query.actor_subject {
            q = q.bind(actor_subject);
        }
        if let Some(action) = &query.action {
            q = q.bind(action);
        }
        if let Some(target_subject) = &query.target_subject {
            q = q.bind(target_subject);
        }
        if let Some(from) = query.from {
            q = q.bind(from);
        }
        if let Some(to) = query.to {
            q = q.bind(to);
        }
        let rows = q
            .bind(limit + 1)
            .bind(params.offset)
            .fetch_all(&self.pool)
            .await?;

        let logs = rows
            .iter()
            .map(Self::row_to_log)
            .collect::<DbResult<Vec<_>>>()?;

        Ok(Page::from_overfetch(logs, limit))
    }
}
