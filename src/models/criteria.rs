//! Match criteria for find and remove.
//!
//! Every field is optional: an empty list or a zero bound places no
//! constraint, so `MatchCriteria::default()` selects the whole collection.

use serde::{Deserialize, Serialize};

/// Filter accepted by [`crate::store::LogStore::find`] and
/// [`crate::store::LogStore::remove`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchCriteria {
    /// Entry matches if any of its labels is in this list
    #[serde(default)]
    pub labels: Vec<String>,
    /// Entry matches if its message contains any keyword
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub origin_services: Vec<String>,
    #[serde(default)]
    pub log_levels: Vec<String>,
    /// Exclusive lower bound on `created`, 0 = unset
    #[serde(default)]
    pub start: i64,
    /// Exclusive upper bound on `created`, 0 = unset
    #[serde(default)]
    pub end: i64,
    /// Maximum number of entries returned by find, <= 0 = no cap
    #[serde(default)]
    pub limit: i64,
}

impl MatchCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.labels.push(label.into());
        self
    }

    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keywords.push(keyword.into());
        self
    }

    pub fn with_origin_service(mut self, origin_service: impl Into<String>) -> Self {
        self.origin_services.push(origin_service.into());
        self
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_levels.push(level.into());
        self
    }

    pub fn with_time_range(mut self, start: i64, end: i64) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    /// True when no field restricts the match, i.e. every entry is selected.
    /// `limit` is not a filter and is ignored here.
    pub fn is_unrestricted(&self) -> bool {
        self.labels.is_empty()
            && self.keywords.is_empty()
            && self.origin_services.is_empty()
            && self.log_levels.is_empty()
            && self.start == 0
            && self.end == 0
    }

    /// The row cap to apply for find, if any
    pub fn effective_limit(&self) -> Option<i64> {
        (self.limit > 0).then_some(self.limit)
    }
}
