use async_trait::async_trait;
use uuid::Uuid;

use super::{ListParams, Page};
use crate::{
    db::error::DbResult,
    models::{CreateUser, User},
};

/// Repository for users and their canonical role assignments.
///
/// Role names are stored normalized (uppercase); normalization happens in
/// the role store before any call reaches this trait.
#[async_trait]
pub trait UserRepo: Send + Sync {
    /// Create a user. Fails with `Conflict` if the external subject is
    /// already taken; concurrent provisioning races resolve by re-fetching.
    async fn create(&self, input: CreateUser) -> DbResult<User>;
    async fn get_by_id(&self, id: Uuid) -> DbResult<Option<User>>;
    async fn get_by_external_id(&self, external_id: &str) -> DbResult<Option<User>>;
    async fn list(&self, params: ListParams) -> DbResult<Page<User>>;

    /// Current role set for a user, sorted.
    async fn roles(&self, user_id: Uuid) -> DbResult<Vec<String>>;

    /// Union `roles` into the user's set. Adding an already-held role is a
    /// no-op for that role. Returns the resulting set, sorted.
    async fn add_roles(&self, user_id: Uuid, roles: &[String]) -> DbResult<Vec<String>>;

    /// Remove a single role. Returns whether anything was removed; an absent
    /// role performs no write.
    async fn remove_role(&self, user_id: Uuid, role: &str) -> DbResult<bool>;
}
