use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{ListParams, Page};
use crate::{
    db::error::DbResult,
    models::{RoleRequest, RoleRequestQuery, RoleRequestStatus},
};

/// Repository-level input for persisting a new role request.
///
/// Roles arrive already normalized; the workflow service owns validation.
#[derive(Debug, Clone)]
pub struct NewRoleRequest {
    pub requester_subject: String,
    pub roles: Vec<String>,
    pub reason: Option<String>,
}

/// Terminal transition applied to a pending request.
#[derive(Debug, Clone)]
pub struct RoleRequestTransition {
    pub status: RoleRequestStatus,
    /// Deciding administrator. None for cancellation, which is not a decision.
    pub decided_by: Option<String>,
    pub decision_note: Option<String>,
    pub decided_at: Option<DateTime<Utc>>,
}

/// Repository for role elevation requests.
#[async_trait]
pub trait RoleRequestRepo: Send + Sync {
    /// Persist a new PENDING request. The storage layer enforces at most one
    /// PENDING request per requester; a lost check-then-act race surfaces as
    /// `Conflict` here rather than a second PENDING row.
    async fn create(&self, input: NewRoleRequest) -> DbResult<RoleRequest>;

    async fn get_by_id(&self, id: Uuid) -> DbResult<Option<RoleRequest>>;

    /// The requester's outstanding PENDING request, if any.
    async fn pending_for_requester(&self, requester_subject: &str)
    -> DbResult<Option<RoleRequest>>;

    /// Requests belonging to one requester, newest first.
    async fn list_by_requester(
        &self,
        requester_subject: &str,
        status: Option<RoleRequestStatus>,
        params: ListParams,
    ) -> DbResult<Page<RoleRequest>>;

    /// Unscoped listing for administrators, newest first.
    async fn list(&self, query: RoleRequestQuery, params: ListParams)
    -> DbResult<Page<RoleRequest>>;

    /// Apply a terminal transition if and only if the stored version still
    /// equals `expected_version` (compare-and-swap). A concurrent writer
    /// surfaces as `Conflict`; an unknown id as `NotFound`.
    async fn transition(
        &self,
        id: Uuid,
        expected_version: i64,
        transition: RoleRequestTransition,
    ) -> DbResult<RoleRequest>;
}
