use std::sync::Arc;

use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::{
    db::{DbPool, DbResult, ListParams, Page},
    models::{AuditActorType, AuditLog, AuditLogQuery, CreateAuditLog},
};

/// Service layer for the privilege-change audit trail.
#[derive(Clone)]
pub struct AuditLogService {
    db: Arc<DbPool>,
}

impl AuditLogService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    /// Create a new audit log entry.
    pub async fn create(&self, input: CreateAuditLog) -> DbResult<AuditLog> {
        self.db.audit_logs().create(input).await
    }

    /// Get an audit log entry by ID.
    pub async fn get_by_id(&self, id: Uuid) -> DbResult<Option<AuditLog>> {
        self.db.audit_logs().get_by_id(id).await
    }

    /// List audit logs with optional filtering and pagination.
    pub async fn list(&self, query: AuditLogQuery, params: ListParams) -> DbResult<Page<AuditLog>> {
        self.db.audit_logs().list(query, params).await
    }

    /// Record a privilege change. An absent actor subject means the system
    /// acted on its own.
    pub async fn record(
        &self,
        actor_subject: Option<&str>,
        action: &str,
        target_subject: &str,
        details: JsonValue,
    ) -> DbResult<AuditLog> {
        let actor_type = if actor_subject.is_some() {
            AuditActorType::User
        } else {
            AuditActorType::System
        };

        self.create(CreateAuditLog {
            actor_type,
            actor_subject: actor_subject.map(str::to_string),
            action: action.to_string(),
            target_subject: target_subject.to_string(),
            details,
        })
        .await
    }
}
