use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use super::{AuditLogService, RoleService};
use crate::{
    db::{DbPool, ListParams, NewRoleRequest, Page, RoleRequestTransition},
    error::{AccessError, AccessResult},
    models::{
        CreateRoleRequest, DecideRoleRequest, REQUESTABLE_ROLES, RoleRequest, RoleRequestQuery,
        RoleRequestStatus, actions, disallowed_roles, normalize_roles,
    },
};

/// The role elevation request workflow.
///
/// State machine: PENDING → APPROVED | REJECTED (administrator decision) or
/// PENDING → CANCELED (owning requester). Terminal requests are immutable.
/// The two real concurrency hazards — duplicate PENDING creation and
/// concurrent decisions — are resolved at the persistence layer (partial
/// unique index, version compare-and-swap); the loser receives `Conflict`.
#[derive(Clone)]
pub struct RoleRequestService {
    db: Arc<DbPool>,
    roles: RoleService,
    audit: AuditLogService,
}

impl RoleRequestService {
    pub fn new(db: Arc<DbPool>, roles: RoleService, audit: AuditLogService) -> Self {
        Self { db, roles, audit }
    }

    /// Create a PENDING request for the requester.
    ///
    /// Requested roles must be non-empty after normalization and drawn from
    /// the requestable allow-list. At most one PENDING request may exist per
    /// requester; a duplicate fails with `Conflict` whether it is caught by
    /// the existence check here or by the storage constraint under a race.
    pub async fn create(
        &self,
        requester_subject: &str,
        input: CreateRoleRequest,
    ) -> AccessResult<RoleRequest> {
        input
            .validate()
            .map_err(|e| AccessError::invalid_argument(e.to_string()))?;

        let normalized = normalize_roles(&input.roles);
        if normalized.is_empty() {
            return Err(AccessError::invalid_argument(
                "no roles left after normalization",
            ));
        }
        let rejected = disallowed_roles(&normalized, REQUESTABLE_ROLES);
        if !rejected.is_empty() {
            return Err(AccessError::invalid_argument(format!(
                "roles not requestable: {}",
                rejected.join(", ")
            )));
        }

        if self
            .db
            .role_requests()
            .pending_for_requester(requester_subject)
            .await?
            .is_some()
        {
            return Err(AccessError::conflict(
                "an existing PENDING request must be resolved first",
            ));
        }

        let request = self
            .db
            .role_requests()
            .create(NewRoleRequest {
                requester_subject: requester_subject.to_string(),
                roles: normalized,
                reason: input.reason,
            })
            .await?;

        self.audit
            .record(
                Some(requester_subject),
                actions::REQUEST_CREATE,
                requester_subject,
                json!({ "request_id": request.id, "roles": request.roles }),
            )
            .await?;

        Ok(request)
    }

    /// The requester's own requests, newest first.
    pub async fn list_for_user(
        &self,
        requester_subject: &str,
        status: Option<RoleRequestStatus>,
        params: ListParams,
    ) -> AccessResult<Page<RoleRequest>> {
        Ok(self
            .db
            .role_requests()
            .list_by_requester(requester_subject, status, params)
            .await?)
    }

    /// Unscoped listing. Administrator-only; enforced by the caller.
    pub async fn admin_list(
        &self,
        query: RoleRequestQuery,
        params: ListParams,
    ) -> AccessResult<Page<RoleRequest>> {
        Ok(self.db.role_requests().list(query, params).await?)
    }

    pub async fn get(&self, id: Uuid) -> AccessResult<RoleRequest> {
        self.db
            .role_requests()
            .get_by_id(id)
            .await?
            .ok_or_else(|| AccessError::not_found("role request", id.to_string()))
    }

    /// Cancel a PENDING request. Only the owning requester may cancel, and
    /// an ownership mismatch reads as absence so request ids cannot be
    /// probed across users. Cancellation records no decision metadata.
    pub async fn cancel(&self, requester_subject: &str, id: Uuid) -> AccessResult<RoleRequest> {
        let request = self.get(id).await?;

        if request.requester_subject != requester_subject {
            return Err(AccessError::not_found("role request", id.to_string()));
        }
        if request.status.is_terminal() {
            return Err(AccessError::conflict("only PENDING requests can be canceled"));
        }

        let updated = self
            .db
            .role_requests()
            .transition(
                id,
                request.version,
                RoleRequestTransition {
                    status: RoleRequestStatus::Canceled,
                    decided_by: None,
                    decision_note: None,
                    decided_at: None,
                },
            )
            .await?;

        self.audit
            .record(
                Some(requester_subject),
                actions::REQUEST_CANCEL,
                requester_subject,
                json!({ "request_id": id }),
            )
            .await?;

        Ok(updated)
    }

    /// Approve a PENDING request and grant the requested roles.
    ///
    /// The decision is committed first — it is the audit-significant event.
    /// A failing role grant (or claims push) afterwards leaves the approval
    /// authoritative and is logged for manual remediation.
    pub async fn approve(
        &self,
        id: Uuid,
        approver_subject: &str,
        input: DecideRoleRequest,
    ) -> AccessResult<RoleRequest> {
        let updated = self
            .decide(id, approver_subject, input, RoleRequestStatus::Approved)
            .await?;

        if let Err(e) = self
            .roles
            .add_roles(
                Some(approver_subject),
                &updated.requester_subject,
                &updated.roles,
            )
            .await
        {
            tracing::error!(
                request_id = %id,
                requester = %updated.requester_subject,
                error = %e,
                "role grant after approval failed; approval stands, grant needs manual remediation"
            );
        }

        Ok(updated)
    }

    /// Reject a PENDING request. Never mutates the role store.
    pub async fn reject(
        &self,
        id: Uuid,
        approver_subject: &str,
        input: DecideRoleRequest,
    ) -> AccessResult<RoleRequest> {
        self.decide(id, approver_subject, input, RoleRequestStatus::Rejected)
            .await
    }

    async fn decide(
        &self,
        id: Uuid,
        approver_subject: &str,
        input: DecideRoleRequest,
        status: RoleRequestStatus,
    ) -> AccessResult<RoleRequest> {
        input
            .validate()
            .map_err(|e| AccessError::invalid_argument(e.to_string()))?;

        let request = self.get(id).await?;
        if request.status.is_terminal() {
            return Err(AccessError::conflict("only PENDING requests can be decided"));
        }

        // The version captured by the read above guards the write: a
        // concurrent decision between read and write surfaces as Conflict
        // and this writer's effect is not applied.
        let updated = self
            .db
            .role_requests()
            .transition(
                id,
                request.version,
                RoleRequestTransition {
                    status,
                    decided_by: Some(approver_subject.to_string()),
                    decision_note: input.note,
                    decided_at: Some(Utc::now()),
                },
            )
            .await?;

        let action = match status {
            RoleRequestStatus::Approved => actions::REQUEST_APPROVE,
            _ => actions::REQUEST_REJECT,
        };
        self.audit
            .record(
                Some(approver_subject),
                action,
                &updated.requester_subject,
                json!({
                    "request_id": id,
                    "roles": updated.roles,
                    "note": updated.decision_note,
                }),
            )
            .await?;

        Ok(updated)
    }
}
