//! Claims mirroring: pushes the canonical role store into the external
//! identity provider's custom-claim storage, idempotently and without ever
//! making local state depend on the external call succeeding.

mod directory;
mod sync;

pub use directory::{ClaimsDirectory, ClaimsDirectoryError, HttpClaimsDirectory, RoleClaims};
pub use sync::{ClaimsSynchronizer, role_claims_for};
