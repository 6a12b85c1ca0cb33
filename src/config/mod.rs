//! Configuration for the access-control core.
//!
//! The host application deserializes [`AccessConfig`] from whatever
//! configuration source it owns (file, environment) and hands it to the
//! constructors in this crate. All sections carry defaults suitable for
//! local development except the identity-provider admin endpoint, which has
//! no sensible default and must be provided.

mod database;
mod identity_provider;

pub use database::*;
pub use identity_provider::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration validation error: {0}")]
    Validation(String),
}

/// Root configuration for the access-control core.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccessConfig {
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Identity provider admin endpoint used for claims mirroring.
    pub identity_provider: IdentityProviderConfig,
}

impl AccessConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.database.validate()?;
        self.identity_provider.validate()?;
        Ok(())
    }
}
