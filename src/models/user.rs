use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// An internal account record, provisioned on the first verified request
/// from a new external subject.
///
/// `external_id` is the identity provider's subject claim: unique, and
/// immutable once assigned. Role assignments live in their own table and are
/// mutated only through the role store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    /// External subject identifier from the identity provider.
    pub external_id: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUser {
    /// External subject identifier from the identity provider.
    #[validate(length(min = 1, max = 255))]
    pub external_id: String,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
}
