use std::sync::Arc;

use serde_json::json;

use super::AuditLogService;
use crate::{
    claims::ClaimsSynchronizer,
    db::DbPool,
    error::{AccessError, AccessResult},
    models::{ASSIGNABLE_ROLES, User, actions, disallowed_roles, normalize_roles},
};

/// The role store: single source of truth for which role names a user holds.
///
/// Every mutation is audited and followed by a best-effort claims sync; the
/// sync runs after the local write has committed and can never roll it back.
#[derive(Clone)]
pub struct RoleService {
    db: Arc<DbPool>,
    synchronizer: ClaimsSynchronizer,
    audit: AuditLogService,
}

impl RoleService {
    pub fn new(db: Arc<DbPool>, synchronizer: ClaimsSynchronizer, audit: AuditLogService) -> Self {
        Self {
            db,
            synchronizer,
            audit,
        }
    }

    async fn user_by_subject(&self, subject: &str) -> AccessResult<User> {
        self.db
            .users()
            .get_by_external_id(subject)
            .await?
            .ok_or_else(|| AccessError::not_found("user", subject))
    }

    /// Current role set for a user, sorted.
    pub async fn get_roles(&self, subject: &str) -> AccessResult<Vec<String>> {
        let user = self.user_by_subject(subject).await?;
        Ok(self.db.users().roles(user.id).await?)
    }

    /// Union `roles` into the user's set.
    ///
    /// The whole call fails if any normalized role is outside the allow-list;
    /// partial application is not permitted. Returns the resulting set.
    pub async fn add_roles(
        &self,
        actor_subject: Option<&str>,
        subject: &str,
        roles: &[String],
    ) -> AccessResult<Vec<String>> {
        let normalized = normalize_roles(roles);
        if normalized.is_empty() {
            return Err(AccessError::invalid_argument(
                "no roles left after normalization",
            ));
        }
        let rejected = disallowed_roles(&normalized, ASSIGNABLE_ROLES);
        if !rejected.is_empty() {
            return Err(AccessError::invalid_argument(format!(
                "unknown roles: {}",
                rejected.join(", ")
            )));
        }

        let user = self.user_by_subject(subject).await?;
        let resulting = self.db.users().add_roles(user.id, &normalized).await?;

        self.audit
            .record(
                actor_subject,
                actions::ROLES_ADD,
                subject,
                json!({ "added": normalized, "resulting": resulting }),
            )
            .await?;

        self.synchronizer.sync_best_effort(subject, true).await;

        Ok(resulting)
    }

    /// Remove a single role. Returns whether anything was removed.
    ///
    /// An absent role is a no-op: no write, no sync call — but the attempt
    /// is still audited.
    pub async fn remove_role(
        &self,
        actor_subject: Option<&str>,
        subject: &str,
        role: &str,
    ) -> AccessResult<bool> {
        let normalized = normalize_roles([role]);
        let Some(role) = normalized.first() else {
            return Err(AccessError::invalid_argument("role name is empty"));
        };
        if !ASSIGNABLE_ROLES.contains(&role.as_str()) {
            return Err(AccessError::invalid_argument(format!(
                "unknown role: {role}"
            )));
        }

        let user = self.user_by_subject(subject).await?;
        let removed = self.db.users().remove_role(user.id, role).await?;

        self.audit
            .record(
                actor_subject,
                actions::ROLES_REMOVE,
                subject,
                json!({ "role": role, "removed": removed }),
            )
            .await?;

        if removed {
            self.synchronizer.sync_best_effort(subject, true).await;
        }

        Ok(removed)
    }

    /// Explicitly resync the provider's claims mirror for a user.
    ///
    /// Unknown subjects surface as `NotFound`; a failing provider does not,
    /// per the eventual-consistency boundary.
    pub async fn sync_claims(
        &self,
        actor_subject: Option<&str>,
        subject: &str,
        force: bool,
    ) -> AccessResult<()> {
        self.synchronizer.sync(subject, force).await?;

        self.audit
            .record(
                actor_subject,
                actions::ROLES_SYNC,
                subject,
                json!({ "forced": force }),
            )
            .await?;

        Ok(())
    }
}
