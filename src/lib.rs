//! Access-control core for an events platform.
//!
//! The platform's identity tokens are minted by an external provider; this
//! crate keeps the application's own role state authoritative and mirrors it
//! outward:
//!
//! - [`services::RoleService`] — canonical role assignments per user, with
//!   normalization, validation and an audit trail.
//! - [`services::RoleRequestService`] — the role-elevation request workflow
//!   (create, cancel, approve, reject) with optimistic-concurrency safety.
//! - [`claims::ClaimsSynchronizer`] — idempotent, failure-isolated push of
//!   role sets into the provider's custom claims.
//! - [`auth::IdentityResolver`] / [`middleware::resolve_identity`] — the
//!   request-scoped caller identity derived from verified-token claims.
//! - [`authz`] — pure visibility and mutation policies for ownable,
//!   publishable domain resources.
//!
//! The domain CRUD surface and HTTP routing live in the host application;
//! this crate is a set of in-process components behind a [`db::DbPool`] and
//! a [`claims::ClaimsDirectory`].

pub mod auth;
pub mod authz;
pub mod claims;
pub mod config;
pub mod db;
mod error;
pub mod middleware;
pub mod models;
pub mod services;

#[cfg(test)]
mod tests;

pub use error::{AccessError, AccessResult};
