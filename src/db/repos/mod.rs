mod audit_logs;
mod role_requests;
mod users;

pub use audit_logs::*;
pub use role_requests::*;
pub use users::*;

/// Pagination parameters for list queries.
#[derive(Debug, Clone, Default)]
pub struct ListParams {
    /// Maximum number of records to return. Defaults to 100.
    pub limit: Option<i64>,
    /// Number of records to skip.
    pub offset: i64,
}

impl ListParams {
    pub fn page(limit: i64, offset: i64) -> Self {
        Self {
            limit: Some(limit),
            offset,
        }
    }

    /// Effective limit with the default applied.
    pub fn effective_limit(&self) -> i64 {
        self.limit.unwrap_or(100).max(1)
    }
}

/// Result of a paginated list query.
#[derive(Debug, Clone)]
pub struct Page<T> {
    /// The items returned for this page.
    pub items: Vec<T>,
    /// Whether there are more items after this page.
    pub has_more: bool,
}

impl<T> Page<T> {
    /// Build a page from rows fetched with `limit + 1`, trimming the probe row.
    pub fn from_overfetch(mut rows: Vec<T>, limit: i64) -> Self {
        let has_more = rows.len() as i64 > limit;
        rows.truncate(limit as usize);
        Page {
            items: rows,
            has_more,
        }
    }
}
