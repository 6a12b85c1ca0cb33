use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    auth::CallerIdentity,
    error::{AccessError, AccessResult},
};

/// Publication status of a domain resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublicationStatus {
    Draft,
    /// The public-visible value.
    Published,
}

/// Owner filter that matches no real resource. Applied for editors whose
/// identity has not been provisioned yet, so they see nothing rather than
/// falling through to an unscoped query.
pub const UNMATCHABLE_OWNER: Uuid = Uuid::nil();

/// Capability the domain layer implements for resources these policies gate
/// (in this platform: events with an owner and a publication status).
pub trait OwnedPublishable {
    fn resource_id(&self) -> Uuid;
    /// Resource kind used in the not-found shape ("event", "venue", ...).
    fn resource_kind(&self) -> &'static str;
    fn owner_id(&self) -> Option<Uuid>;
    fn publication_status(&self) -> PublicationStatus;
}

/// Whether the caller may see the resource.
///
/// Administrators see everything. An editor who owns the resource sees it
/// regardless of publication status. Everyone else, anonymous included,
/// only sees published resources.
pub fn can_view<R: OwnedPublishable>(resource: &R, caller: &CallerIdentity) -> bool {
    if caller.is_admin {
        return true;
    }
    if caller.is_editor
        && let Some(user_id) = caller.user_id
        && resource.owner_id() == Some(user_id)
    {
        return true;
    }
    resource.publication_status() == PublicationStatus::Published
}

/// Fail with a not-found-shaped error unless the caller may see the
/// resource. Visibility denial is indistinguishable from absence.
pub fn ensure_can_view<R: OwnedPublishable>(
    resource: &R,
    caller: &CallerIdentity,
) -> AccessResult<()> {
    if can_view(resource, caller) {
        return Ok(());
    }
    tracing::debug!(
        resource_id = %resource.resource_id(),
        caller_id = ?caller.user_id,
        "view denied"
    );
    Err(AccessError::not_found(
        resource.resource_kind(),
        resource.resource_id().to_string(),
    ))
}

/// Fail with a not-found-shaped error unless the caller may modify the
/// resource: administrators always, an editor only on resources they own.
pub fn ensure_can_modify<R: OwnedPublishable>(
    resource: &R,
    caller: &CallerIdentity,
) -> AccessResult<()> {
    if caller.is_admin {
        return Ok(());
    }
    if caller.is_editor
        && let Some(user_id) = caller.user_id
        && resource.owner_id() == Some(user_id)
    {
        return Ok(());
    }
    tracing::debug!(
        resource_id = %resource.resource_id(),
        caller_id = ?caller.user_id,
        "modify denied"
    );
    Err(AccessError::not_found(
        resource.resource_kind(),
        resource.resource_id().to_string(),
    ))
}

/// Filters applied to list/search queries over publishable resources.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilters {
    pub owner_id: Option<Uuid>,
    pub status: Option<PublicationStatus>,
    /// When set, the owner filter widens to "owned by me OR published"
    /// instead of a plain conjunction, so an editor's own drafts and
    /// everyone's published resources are both eligible.
    pub owned_or_published: bool,
}

/// Inject default filters the caller did not explicitly specify, so that
/// unauthorized data is never returned by omission.
///
/// Administrators get no injected defaults. Editors are pinned to their own
/// resources (widened to owned-or-published unless they asked for a specific
/// publication status); an editor with no resolved internal id is pinned to
/// [`UNMATCHABLE_OWNER`]. Everyone else defaults to published-only. Explicit
/// caller filters are only ever widened by an admin identity, never by
/// others.
pub fn apply_list_defaults(requested: ListFilters, caller: &CallerIdentity) -> ListFilters {
    if caller.is_admin {
        return requested;
    }

    let mut effective = requested;

    if caller.is_editor {
        match caller.user_id {
            Some(user_id) => {
                effective.owner_id = Some(user_id);
                if effective.status.is_none() {
                    effective.owned_or_published = true;
                }
            }
            None => {
                effective.owner_id = Some(UNMATCHABLE_OWNER);
            }
        }
        return effective;
    }

    if effective.status.is_none() {
        effective.status = Some(PublicationStatus::Published);
    }
    effective
}
