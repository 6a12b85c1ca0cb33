mod audit_logs;
mod common;
mod role_requests;
mod users;

pub use audit_logs::SqliteAuditLogRepo;
pub use role_requests::SqliteRoleRequestRepo;
pub use users::SqliteUserRepo;
