//! List window shared by every store implementation.

use crate::constants::{DEFAULT_LIST_LIMIT, DEFAULT_LIST_OFFSET, MAX_LIST_LIMIT};

/// A clamped `limit`/`offset` pair.
///
/// Stores accept raw signed values from callers. A non-positive limit selects
/// nothing and a negative offset counts from the start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListWindow {
    pub limit: u64,
    pub offset: u64,
}

impl ListWindow {
    pub fn new(limit: i64, offset: i64) -> Self {
        Self {
            limit: limit.max(0) as u64,
            offset: offset.max(0) as u64,
        }
    }

    /// Whether this window can return any rows at all
    pub fn is_empty(&self) -> bool {
        self.limit == 0
    }

    /// Build a window from optional request parameters, falling back to the
    /// defaults for missing or out-of-range values and capping the page size.
    pub fn from_request(limit: Option<i64>, offset: Option<i64>) -> Self {
        let limit = limit
            .filter(|l| *l > 0)
            .unwrap_or(DEFAULT_LIST_LIMIT)
            .min(MAX_LIST_LIMIT);
        let offset = offset.filter(|o| *o >= 0).unwrap_or(DEFAULT_LIST_OFFSET);
        Self::new(limit, offset)
    }
}
