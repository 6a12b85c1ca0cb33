use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
};

use async_trait::async_trait;
use serde_json::{Value as JsonValue, json};

use crate::{
    auth::{IdentityResolver, VerifiedToken},
    claims::{ClaimsDirectory, ClaimsDirectoryError, RoleClaims},
    config::IdentityProviderConfig,
    db::{
        DbPool,
        tests::harness::{create_sqlite_pool, run_sqlite_migrations},
    },
    services::Services,
};

/// Claims directory double: records every push and can be switched into a
/// failing mode to simulate a provider outage.
#[derive(Default)]
pub struct RecordingDirectory {
    pushes: Mutex<Vec<(String, RoleClaims)>>,
    failing: AtomicBool,
}

impl RecordingDirectory {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn pushes(&self) -> Vec<(String, RoleClaims)> {
        self.pushes.lock().expect("pushes lock").clone()
    }

    pub fn last_push_for(&self, subject: &str) -> Option<RoleClaims> {
        self.pushes()
            .into_iter()
            .rev()
            .find(|(s, _)| s == subject)
            .map(|(_, claims)| claims)
    }
}

#[async_trait]
impl ClaimsDirectory for RecordingDirectory {
    async fn put_role_claims(
        &self,
        subject: &str,
        claims: &RoleClaims,
    ) -> Result<(), ClaimsDirectoryError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ClaimsDirectoryError::Rejected {
                status: 502,
                body: "simulated provider outage".to_string(),
            });
        }
        self.pushes
            .lock()
            .expect("pushes lock")
            .push((subject.to_string(), claims.clone()));
        Ok(())
    }
}

pub fn test_idp_config() -> IdentityProviderConfig {
    IdentityProviderConfig {
        admin_base_url: "http://idp.test".to_string(),
        admin_token: "test-token".to_string(),
        request_timeout_ms: 1_000,
        subject_claim: "sub".to_string(),
        subject_fallback_claim: "nameid".to_string(),
        user_id_claim: "app_user_id".to_string(),
        roles_claim: "roles".to_string(),
    }
}

pub struct TestEnv {
    pub db: Arc<DbPool>,
    pub services: Services,
    pub resolver: IdentityResolver,
    pub directory: Arc<RecordingDirectory>,
}

pub async fn setup() -> TestEnv {
    let pool = create_sqlite_pool().await;
    run_sqlite_migrations(&pool).await;

    let db = Arc::new(DbPool::from_sqlite(pool));
    let directory = Arc::new(RecordingDirectory::default());
    let services = Services::new(db.clone(), directory.clone());
    let resolver = IdentityResolver::new(db.clone(), test_idp_config());

    TestEnv {
        db,
        services,
        resolver,
        directory,
    }
}

/// Build a verified token for a subject with the given mirrored roles.
pub fn token(subject: &str, roles: &[&str]) -> VerifiedToken {
    let mut claims: HashMap<String, JsonValue> = HashMap::new();
    claims.insert("roles".to_string(), json!(roles));
    VerifiedToken::new(subject, claims)
}

impl TestEnv {
    /// Provision a user the way production does: through the resolver.
    pub async fn provision(&self, subject: &str) {
        self.resolver
            .resolve(&token(subject, &[]))
            .await
            .expect("Failed to provision user");
    }
}
