//! Common types for domain models

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// Deserialize a present field as `Some`, so a JSON `null` becomes
/// `Some(None)` and stays distinct from an absent field (`None` via
/// `#[serde(default)]`).
pub fn deserialize_present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Fixed page size of every paginated list
pub const PAGE_SIZE: i64 = 5;

/// Resolved page window for a list query.
///
/// Out-of-range pages clamp instead of failing: anything below 1 (or
/// unparseable) becomes page 1, anything past the end becomes the last page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Pagination {
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl Pagination {
    pub fn new(requested_page: i64, per_page: i64, total: i64) -> Self {
        let total_pages = if total <= 0 {
            0
        } else {
            (total + per_page - 1) / per_page
        };
        let page = requested_page.clamp(1, total_pages.max(1));
        Self {
            page,
            per_page,
            total,
            total_pages,
        }
    }

    /// Row offset of the first item on this page
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.per_page
    }

    pub fn limit(&self) -> i64 {
        self.per_page
    }
}

/// A page of items plus its window
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

/// Parse a raw `page` query value, falling back to the first page
pub fn parse_page(raw: Option<&str>) -> i64 {
    raw.and_then(|p| p.trim().parse::<i64>().ok()).unwrap_or(1)
}
