use std::{collections::HashMap, sync::Arc};

use serde_json::Value as JsonValue;

use super::{CallerIdentity, VerifiedToken};
use crate::{
    config::IdentityProviderConfig,
    db::{DbError, DbPool},
    error::{AccessError, AccessResult},
    models::{CreateUser, ROLE_ADMIN, ROLE_EDITOR, ROLE_USER, User, normalize_roles},
};

/// Resolves a verified token into the request-scoped [`CallerIdentity`].
///
/// Role flags come from the token's mirrored roles claim; the internal user
/// id comes from an application-specific hint claim when present, otherwise
/// from a find-or-create lookup keyed by the external subject. Users are
/// provisioned on the first verified request from a new subject.
#[derive(Clone)]
pub struct IdentityResolver {
    db: Arc<DbPool>,
    config: IdentityProviderConfig,
}

impl IdentityResolver {
    pub fn new(db: Arc<DbPool>, config: IdentityProviderConfig) -> Self {
        Self { db, config }
    }

    /// Build a [`VerifiedToken`] from a raw claims map using the configured
    /// subject claim names.
    pub fn token_from_claims(&self, claims: HashMap<String, JsonValue>) -> Option<VerifiedToken> {
        VerifiedToken::from_claims(
            claims,
            &self.config.subject_claim,
            &self.config.subject_fallback_claim,
        )
    }

    /// Resolve the caller identity for one request.
    pub async fn resolve(&self, token: &VerifiedToken) -> AccessResult<CallerIdentity> {
        let roles = normalize_roles(token.string_list_claim(&self.config.roles_claim));
        let is_admin = roles.iter().any(|r| r == ROLE_ADMIN);
        let is_editor = roles.iter().any(|r| r == ROLE_EDITOR);

        // The hint claim short-circuits the database lookup when the
        // provider already carries our internal id.
        let user_id = match token.uuid_claim(&self.config.user_id_claim) {
            Some(id) => Some(id),
            None => Some(self.find_or_create(token).await?.id),
        };

        Ok(CallerIdentity {
            user_id,
            is_admin,
            is_editor,
        })
    }

    /// Fetch the user for a subject, provisioning one on first contact.
    ///
    /// Two concurrent first requests race on the insert; the unique
    /// constraint on `external_id` picks a winner and the loser re-reads.
    pub async fn find_or_create(&self, token: &VerifiedToken) -> AccessResult<User> {
        let subject = token.subject();

        if let Some(user) = self.db.users().get_by_external_id(subject).await? {
            return Ok(user);
        }

        let input = CreateUser {
            external_id: subject.to_string(),
            email: token.string_claim("email").map(str::to_string),
            name: token.string_claim("name").map(str::to_string),
        };

        match self.db.users().create(input).await {
            Ok(user) => {
                // New identities start with the baseline role; elevated
                // roles only ever arrive through the role store.
                self.db
                    .users()
                    .add_roles(user.id, &[ROLE_USER.to_string()])
                    .await?;
                tracing::info!(
                    subject,
                    user_id = %user.id,
                    "provisioned user on first verified request"
                );
                Ok(user)
            }
            Err(DbError::Conflict(_)) => self
                .db
                .users()
                .get_by_external_id(subject)
                .await?
                .ok_or_else(|| {
                    AccessError::Internal(format!(
                        "user '{subject}' lost a provisioning race but is still absent"
                    ))
                }),
            Err(e) => Err(e.into()),
        }
    }
}
