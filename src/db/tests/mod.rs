//! Shared database repository test infrastructure
//!
//! Each repository has a test module containing shared test functions that
//! take the repo trait object, plus a SQLite-specific setup using in-memory
//! databases with real migrations. A PostgreSQL backend would reuse the same
//! shared functions behind its own harness.

mod audit_logs;
mod users;
