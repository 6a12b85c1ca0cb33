//! Service-level integration tests over an in-memory database and a
//! recording claims directory double.

pub mod support;
