use thiserror::Error;

use crate::db::DbError;

/// Error taxonomy surfaced by the role store, the role request workflow and
/// the access policies.
///
/// Callers branch on the variant, not on message text. Authorization denials
/// are deliberately reported as [`AccessError::NotFound`] so that a denied
/// resource is indistinguishable from an absent one.
#[derive(Debug, Error)]
pub enum AccessError {
    /// Malformed or disallowed input (empty role set, unknown role name).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Missing entity, or access denied disguised as missing.
    #[error("{resource} '{id}' not found")]
    NotFound { resource: &'static str, id: String },

    /// Business-rule violation on current state: duplicate PENDING request,
    /// transition from a terminal status, optimistic-version mismatch.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Anything unexpected (storage faults, corrupted rows).
    #[error("internal error: {0}")]
    Internal(String),
}

impl AccessError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            id: id.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }
}

impl From<DbError> for AccessError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound => AccessError::not_found("record", "unknown"),
            DbError::Conflict(message) => AccessError::Conflict(message),
            DbError::Validation(message) => AccessError::InvalidArgument(message),
            other => AccessError::Internal(other.to_string()),
        }
    }
}

pub type AccessResult<T> = Result<T, AccessError>;
