//! List request and pagination descriptor shared by every entity's `get_all`.
//!
//! Keys of the filter maps use dot notation to reach related records
//! (`Country.Name`) and may end with a lookup operator (`Name__icontains`).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Page size used when a request leaves `limit` at zero.
pub const DEFAULT_LIMIT: u64 = 20;

/// AND / OR condition maps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CondMap {
    pub and: Map<String, Value>,
    pub or: Map<String, Value>,
}

impl CondMap {
    pub fn is_empty(&self) -> bool {
        self.and.is_empty() && self.or.is_empty()
    }
}

/// Filtered, sorted, paginated list request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListQuery {
    /// Include filters, AND-combined
    pub query: Map<String, Value>,
    /// Exclude filters, each applied as `NOT (...)`
    pub exclude: Map<String, Value>,
    pub cond: CondMap,
    /// Requested fields; validated against the entity's field registry
    pub fields: Vec<String>,
    pub sortby: Vec<String>,
    /// `"asc"` / `"desc"`, paired with `sortby`
    pub order: Vec<String>,
    pub offset: u64,
    /// `0` means [`DEFAULT_LIMIT`]
    pub limit: u64,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    pub fn exclude(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.exclude.insert(key.into(), value.into());
        self
    }

    pub fn and(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.cond.and.insert(key.into(), value.into());
        self
    }

    pub fn or(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.cond.or.insert(key.into(), value.into());
        self
    }

    pub fn sort<S: Into<String>, O: Into<String>>(
        mut self,
        sortby: impl IntoIterator<Item = S>,
        order: impl IntoIterator<Item = O>,
    ) -> Self {
        self.sortby = sortby.into_iter().map(Into::into).collect();
        self.order = order.into_iter().map(Into::into).collect();
        self
    }

    pub fn page(mut self, offset: u64, limit: u64) -> Self {
        self.offset = offset;
        self.limit = limit;
        self
    }

    /// Limit with the default applied.
    pub fn effective_limit(&self) -> u64 {
        if self.limit == 0 {
            DEFAULT_LIMIT
        } else {
            self.limit
        }
    }
}

/// Описание одной страницы результата
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paginator {
    pub total_count: u64,
    /// Rows actually returned for this page
    pub current_page_size: u64,
    pub limit: u64,
    pub offset: u64,
    pub total_page: u64,
    /// 1-based
    pub current_page: u64,
    pub has_next: bool,
}

impl Paginator {
    /// Build the descriptor for a non-empty result set. `current_page_size`
    /// stays zero until the page has been fetched.
    pub fn new(limit: u64, offset: u64, total_count: u64) -> Self {
        let limit = if limit == 0 { DEFAULT_LIMIT } else { limit };
        Self {
            total_count,
            current_page_size: 0,
            limit,
            offset,
            total_page: total_count.div_ceil(limit),
            current_page: offset / limit + 1,
            has_next: offset.saturating_add(limit) < total_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_partial_request() {
        let q: ListQuery = serde_json::from_value(json!({
            "query": {"Name__icontains": "ru"},
            "cond": {"or": {"Code": "RU"}},
            "sortby": ["Name"],
            "order": ["desc"]
        }))
        .unwrap();

        assert_eq!(q.query.get("Name__icontains"), Some(&json!("ru")));
        assert!(q.cond.and.is_empty());
        assert_eq!(q.cond.or.get("Code"), Some(&json!("RU")));
        assert_eq!(q.limit, 0);
        assert_eq!(q.effective_limit(), DEFAULT_LIMIT);
    }

    #[test]
    fn test_paginator_arithmetic() {
        let p = Paginator::new(20, 40, 45);
        assert_eq!(p.total_page, 3);
        assert_eq!(p.current_page, 3);
        assert!(!p.has_next);

        let p = Paginator::new(10, 0, 11);
        assert_eq!(p.total_page, 2);
        assert_eq!(p.current_page, 1);
        assert!(p.has_next);
    }

    #[test]
    fn test_paginator_zero_limit_uses_default() {
        let p = Paginator::new(0, 0, 5);
        assert_eq!(p.limit, DEFAULT_LIMIT);
        assert_eq!(p.total_page, 1);
    }
}
