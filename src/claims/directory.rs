use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::IdentityProviderConfig;

/// The claims payload mirrored into provider-issued tokens.
///
/// `roles_version` is a content hash over the role list; downstream
/// consumers use it to detect drift between the canonical store and the
/// mirror, not to skip pushes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleClaims {
    pub roles: Vec<String>,
    pub roles_version: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ClaimsDirectoryError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("provider rejected claims update: status {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// The identity provider's administrative claims store.
///
/// One operation: overwrite the managed custom claims for a subject. The
/// provider treats it as an idempotent full replace of the keys it manages,
/// never a merge.
#[async_trait]
pub trait ClaimsDirectory: Send + Sync {
    async fn put_role_claims(
        &self,
        subject: &str,
        claims: &RoleClaims,
    ) -> Result<(), ClaimsDirectoryError>;
}

/// HTTP implementation against the provider's admin API.
pub struct HttpClaimsDirectory {
    client: reqwest::Client,
    base_url: String,
    admin_token: String,
}

impl HttpClaimsDirectory {
    pub fn new(config: &IdentityProviderConfig) -> Result<Self, ClaimsDirectoryError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self {
            client,
            base_url: config.admin_base_url.trim_end_matches('/').to_string(),
            admin_token: config.admin_token.clone(),
        })
    }
}

#[async_trait]
impl ClaimsDirectory for HttpClaimsDirectory {
    async fn put_role_claims(
        &self,
        subject: &str,
        claims: &RoleClaims,
    ) -> Result<(), ClaimsDirectoryError> {
        let url = format!("{}/admin/users/{}/claims", self.base_url, subject);

        let response = self
            .client
            .put(&url)
            .bearer_auth(&self.admin_token)
            .json(claims)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClaimsDirectoryError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}
