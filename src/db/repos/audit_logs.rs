use async_trait::async_trait;
use uuid::Uuid;

use super::{ListParams, Page};
use crate::{
    db::error::DbResult,
    models::{AuditLog, AuditLogQuery, CreateAuditLog},
};

/// Repository for the privilege-change audit trail.
#[async_trait]
pub trait AuditLogRepo: Send + Sync {
    async fn create(&self, input: CreateAuditLog) -> DbResult<AuditLog>;
    async fn get_by_id(&self, id: Uuid) -> DbResult<Option<AuditLog>>;
    /// List entries matching the query, newest first.
    async fn list(&self, query: AuditLogQuery, params: ListParams) -> DbResult<Page<AuditLog>>;
}
