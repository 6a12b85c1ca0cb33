use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Identity provider settings.
///
/// The provider verifies tokens and exposes an administrative API that
/// overwrites a user's custom claims by subject; this crate only consumes
/// the latter, plus a handful of claim names read from verified tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IdentityProviderConfig {
    /// Base URL of the provider's administrative API.
    pub admin_base_url: String,

    /// Bearer token for the administrative API.
    pub admin_token: String,

    /// Timeout for claims push requests, in milliseconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,

    /// Primary claim carrying the external subject identifier.
    #[serde(default = "default_subject_claim")]
    pub subject_claim: String,

    /// Fallback claim consulted when the primary subject claim is absent.
    #[serde(default = "default_subject_fallback_claim")]
    pub subject_fallback_claim: String,

    /// Application-specific claim carrying the internal user id. When
    /// present on a token it short-circuits the database lookup.
    #[serde(default = "default_user_id_claim")]
    pub user_id_claim: String,

    /// Claim carrying the mirrored role list.
    #[serde(default = "default_roles_claim")]
    pub roles_claim: String,
}

impl IdentityProviderConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.admin_base_url.is_empty() {
            return Err(ConfigError::Validation(
                "identity provider admin_base_url cannot be empty".into(),
            ));
        }
        if self.admin_token.is_empty() {
            return Err(ConfigError::Validation(
                "identity provider admin_token cannot be empty".into(),
            ));
        }
        Ok(())
    }
}

fn default_request_timeout() -> u64 {
    10_000 // 10 seconds
}

fn default_subject_claim() -> String {
    "sub".to_string()
}

fn default_subject_fallback_claim() -> String {
    "nameid".to_string()
}

fn default_user_id_claim() -> String {
    "app_user_id".to_string()
}

fn default_roles_claim() -> String {
    "roles".to_string()
}
