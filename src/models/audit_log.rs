use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

/// Type of actor that performed a privilege change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditActorType {
    /// An authenticated user (administrator or requester).
    User,
    /// The system performed the action automatically.
    System,
}

impl fmt::Display for AuditActorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditActorType::User => write!(f, "user"),
            AuditActorType::System => write!(f, "system"),
        }
    }
}

impl std::str::FromStr for AuditActorType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(AuditActorType::User),
            "system" => Ok(AuditActorType::System),
            _ => Err(format!("Invalid actor type: {}", s)),
        }
    }
}

/// Audit event types for privilege changes.
///
/// Written for every role mutation, successful or rejected, so the forensic
/// trail survives independent of the call outcome.
pub mod actions {
    /// Roles unioned into a user's set.
    pub const ROLES_ADD: &str = "roles.add";
    /// Role removal attempt (details carry whether anything was removed).
    pub const ROLES_REMOVE: &str = "roles.remove";
    /// Explicitly requested claims resync.
    pub const ROLES_SYNC: &str = "roles.sync";
    /// Role request created.
    pub const REQUEST_CREATE: &str = "role_request.create";
    /// Role request canceled by its requester.
    pub const REQUEST_CANCEL: &str = "role_request.cancel";
    /// Role request approved by an administrator.
    pub const REQUEST_APPROVE: &str = "role_request.approve";
    /// Role request rejected by an administrator.
    pub const REQUEST_REJECT: &str = "role_request.reject";
}

/// An audit log entry recording a privilege change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLog {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub actor_type: AuditActorType,
    /// External subject of the actor (None for system actions).
    pub actor_subject: Option<String>,
    /// The action performed (see [`actions`]).
    pub action: String,
    /// External subject of the user whose privileges were touched.
    pub target_subject: String,
    /// Additional details as JSON (roles added, resulting set, notes).
    pub details: JsonValue,
}

/// Input for creating a new audit log entry.
#[derive(Debug, Clone)]
pub struct CreateAuditLog {
    pub actor_type: AuditActorType,
    pub actor_subject: Option<String>,
    pub action: String,
    pub target_subject: String,
    pub details: JsonValue,
}

/// Query parameters for listing audit logs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditLogQuery {
    pub actor_subject: Option<String>,
    pub action: Option<String>,
    pub target_subject: Option<String>,
    /// Start of time range (inclusive).
    pub from: Option<DateTime<Utc>>,
    /// End of time range (exclusive).
    pub to: Option<DateTime<Utc>>,
}
