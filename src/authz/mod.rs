//! Authorization policies for ownable, publishable domain resources.
//!
//! The policies are pure functions over (resource state, caller identity):
//! the domain layer resolves a [`crate::auth::CallerIdentity`] once per
//! request and threads it through. Denials are shaped as not-found so a
//! caller cannot distinguish a resource it may not see from one that does
//! not exist.

mod policies;

pub use policies::{
    ListFilters, OwnedPublishable, PublicationStatus, UNMATCHABLE_OWNER, apply_list_defaults,
    can_view, ensure_can_modify, ensure_can_view,
};
