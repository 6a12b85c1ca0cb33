use uuid::Uuid;

/// The resolved caller identity for one request.
///
/// Derived fresh per request from verified-token claims and never persisted.
/// It travels as an explicit parameter (or a per-request extension) through
/// every call chain — there is no ambient or thread-local copy to leak onto
/// a pooled worker's next request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallerIdentity {
    /// Internal user id. None for anonymous callers and for identities the
    /// resolver could not provision.
    pub user_id: Option<Uuid>,
    pub is_admin: bool,
    pub is_editor: bool,
}

impl CallerIdentity {
    /// Identity of an unauthenticated caller.
    pub fn anonymous() -> Self {
        Self::default()
    }
}
