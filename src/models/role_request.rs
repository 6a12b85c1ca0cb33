use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Lifecycle status of a role elevation request.
///
/// `Pending` is the only non-terminal status. Transitions: a pending request
/// is approved or rejected by an administrator, or canceled by its owning
/// requester. Terminal requests are immutable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleRequestStatus {
    Pending,
    Approved,
    Rejected,
    Canceled,
}

impl RoleRequestStatus {
    /// Convert to string for database storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Canceled => "canceled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for RoleRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for RoleRequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "canceled" => Ok(Self::Canceled),
            _ => Err(format!("Invalid role request status: {}", s)),
        }
    }
}

/// A user-initiated request to gain one or more roles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleRequest {
    pub id: Uuid,
    /// External subject identifier of the requester.
    pub requester_subject: String,
    /// Requested roles, normalized (uppercase, deduped, sorted).
    pub roles: Vec<String>,
    pub reason: Option<String>,
    pub status: RoleRequestStatus,
    /// External subject identifier of the deciding administrator.
    /// Stays None until a terminal decision; cancellation is not a decision.
    pub decided_by: Option<String>,
    pub decision_note: Option<String>,
    pub decided_at: Option<DateTime<Utc>>,
    /// Monotonically incremented on every write; backs the optimistic
    /// concurrency check on decisions.
    pub version: i64,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a role request.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRoleRequest {
    #[validate(length(min = 1))]
    pub roles: Vec<String>,
    #[validate(length(max = 500))]
    pub reason: Option<String>,
}

/// Input for an administrator decision (approve or reject).
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct DecideRoleRequest {
    #[validate(length(max = 500))]
    pub note: Option<String>,
}

/// Filters for the administrator-facing request listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoleRequestQuery {
    pub status: Option<RoleRequestStatus>,
    /// Case-insensitive substring match on the requester subject.
    pub search: Option<String>,
}
