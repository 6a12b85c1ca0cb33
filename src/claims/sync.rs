use std::{sync::Arc, time::Instant};

use sha2::{Digest, Sha256};

use super::{ClaimsDirectory, RoleClaims};
use crate::{
    db::DbPool,
    error::{AccessError, AccessResult},
    models::{ROLE_USER, normalize_roles},
};

/// Separator for the content hash input. Role names are uppercase, so this
/// can never appear inside a role.
const HASH_SEPARATOR: &str = "\n";

/// Build the claims payload for a role set: normalize, guarantee the
/// baseline role, and stamp a deterministic content hash.
///
/// Every authenticated identity carries the baseline role downstream
/// regardless of administrative role edits: an empty set becomes exactly
/// `[USER]`, a non-empty set missing it gets it prepended.
pub fn role_claims_for<S: AsRef<str>>(roles: &[S]) -> RoleClaims {
    let mut roles = normalize_roles(roles);
    if roles.is_empty() {
        roles.push(ROLE_USER.to_string());
    } else if !roles.iter().any(|r| r == ROLE_USER) {
        roles.insert(0, ROLE_USER.to_string());
    }

    let mut hasher = Sha256::new();
    hasher.update(roles.join(HASH_SEPARATOR).as_bytes());
    let roles_version = hex::encode(hasher.finalize());

    RoleClaims {
        roles,
        roles_version,
    }
}

/// Mirrors the canonical role store into the identity provider's claims.
///
/// The push is a best-effort follow-up to an already-committed local
/// mutation: it holds no lock or transaction, and a failing provider never
/// rolls back or blocks local state. A failed push is logged and left for a
/// future forced resync.
#[derive(Clone)]
pub struct ClaimsSynchronizer {
    db: Arc<DbPool>,
    directory: Arc<dyn ClaimsDirectory>,
}

impl ClaimsSynchronizer {
    pub fn new(db: Arc<DbPool>, directory: Arc<dyn ClaimsDirectory>) -> Self {
        Self { db, directory }
    }

    /// Push the current role set for `subject` to the provider.
    ///
    /// Fails with `NotFound` before any external call when the subject is
    /// unknown. Push failures do NOT fail the call: they are logged with
    /// full context and swallowed — local state is authoritative and the
    /// mirror is allowed to lag.
    pub async fn sync(&self, subject: &str, force: bool) -> AccessResult<RoleClaims> {
        let user = self
            .db
            .users()
            .get_by_external_id(subject)
            .await?
            .ok_or_else(|| AccessError::not_found("user", subject))?;

        let roles = self.db.users().roles(user.id).await?;
        let claims = role_claims_for(&roles);

        // force is accepted for a future hash-gated skip; today every call
        // pushes.
        let started = Instant::now();
        match self.directory.put_role_claims(subject, &claims).await {
            Ok(()) => {
                tracing::info!(
                    subject,
                    roles = ?claims.roles,
                    roles_version = %claims.roles_version,
                    force,
                    duration_ms = started.elapsed().as_millis() as u64,
                    "pushed role claims to identity provider"
                );
            }
            Err(e) => {
                tracing::warn!(
                    subject,
                    roles = ?claims.roles,
                    roles_version = %claims.roles_version,
                    force,
                    duration_ms = started.elapsed().as_millis() as u64,
                    error = %e,
                    "claims push failed; local role state stays authoritative"
                );
            }
        }

        Ok(claims)
    }

    /// Fire-and-forget variant used as the side effect of role mutations.
    ///
    /// The callers already validated user existence, so even a `NotFound`
    /// here is logged rather than surfaced.
    pub async fn sync_best_effort(&self, subject: &str, force: bool) {
        if let Err(e) = self.sync(subject, force).await {
            tracing::warn!(subject, error = %e, "claims sync skipped");
        }
    }
}
