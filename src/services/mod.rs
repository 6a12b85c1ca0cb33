mod audit_logs;
mod role_requests;
mod roles;

use std::sync::Arc;

pub use audit_logs::AuditLogService;
pub use role_requests::RoleRequestService;
pub use roles::RoleService;

use crate::{
    claims::{ClaimsDirectory, ClaimsSynchronizer},
    db::DbPool,
};

/// Container for all services.
#[derive(Clone)]
pub struct Services {
    pub roles: RoleService,
    pub role_requests: RoleRequestService,
    pub audit_logs: AuditLogService,
}

impl Services {
    pub fn new(db: Arc<DbPool>, directory: Arc<dyn ClaimsDirectory>) -> Self {
        let audit_logs = AuditLogService::new(db.clone());
        let synchronizer = ClaimsSynchronizer::new(db.clone(), directory);
        let roles = RoleService::new(db.clone(), synchronizer, audit_logs.clone());
        let role_requests = RoleRequestService::new(db, roles.clone(), audit_logs.clone());

        Self {
            roles,
            role_requests,
            audit_logs,
        }
    }
}
