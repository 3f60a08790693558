//! Search filtering and page slicing over catalog and tag lists

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const MAX_PAGE_SIZE: usize = 100;

/// Caller-supplied paging parameters, kept raw until [`PageRequest::page`]
/// and [`PageRequest::page_size`] clamp them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub page_size: i64,
    pub search: String,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE as i64,
            page_size: DEFAULT_PAGE_SIZE as i64,
            search: String::new(),
        }
    }
}

impl PageRequest {
    pub fn new(page: i64, page_size: i64) -> Self {
        Self {
            page,
            page_size,
            search: String::new(),
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    /// Build from query-string values. Absent values take the defaults;
    /// unparsable ones count as `0` and are clamped like any other.
    pub fn from_query(page: Option<&str>, page_size: Option<&str>, search: Option<&str>) -> Self {
        Self {
            page: parse_or_zero(page, DEFAULT_PAGE as i64),
            page_size: parse_or_zero(page_size, DEFAULT_PAGE_SIZE as i64),
            search: search.unwrap_or_default().to_string(),
        }
    }

    /// 1-based page, never below 1
    pub fn page(&self) -> usize {
        if self.page < 1 {
            DEFAULT_PAGE
        } else {
            usize::try_from(self.page).unwrap_or(usize::MAX)
        }
    }

    /// Page size within `[1, 100]`, otherwise 20
    pub fn page_size(&self) -> usize {
        if (1..=MAX_PAGE_SIZE as i64).contains(&self.page_size) {
            self.page_size as usize
        } else {
            DEFAULT_PAGE_SIZE
        }
    }
}

fn parse_or_zero(value: Option<&str>, default: i64) -> i64 {
    match value {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or(0),
    }
}

/// Case-insensitive substring match on ASCII letters only.
pub fn matches_search(candidate: &str, search: &str) -> bool {
    search.is_empty()
        || candidate
            .to_ascii_lowercase()
            .contains(&search.to_ascii_lowercase())
}

/// Keep the items matching `search`, in their original order.
pub fn filter_by_search<I>(items: I, search: &str) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    items
        .into_iter()
        .filter(|item| matches_search(item, search))
        .collect()
}

/// One page over a filtered sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginatedResult<D> {
    pub data: D,
    /// Size of the filtered sequence, before slicing
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    /// Items dropped from this page because enriching them failed
    #[serde(default, skip_serializing_if = "is_zero")]
    pub skipped: usize,
}

fn is_zero(value: &usize) -> bool {
    *value == 0
}

impl<D> PaginatedResult<D> {
    pub fn map_data<E, F>(self, f: F) -> PaginatedResult<E>
    where
        F: FnOnce(D) -> E,
    {
        PaginatedResult {
            data: f(self.data),
            total: self.total,
            page: self.page,
            page_size: self.page_size,
            total_pages: self.total_pages,
            skipped: self.skipped,
        }
    }
}

/// Number of pages needed for `total` items.
pub fn total_pages(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        0
    } else {
        total.div_ceil(page_size)
    }
}

/// Slice `items` to the requested page. A page past the end is empty.
pub fn paginate<T>(items: Vec<T>, request: &PageRequest) -> PaginatedResult<Vec<T>> {
    let page = request.page();
    let page_size = request.page_size();
    let total = items.len();

    let start = (page - 1).saturating_mul(page_size).min(total);
    let end = start.saturating_add(page_size).min(total);

    let data = items.into_iter().skip(start).take(end - start).collect();

    PaginatedResult {
        data,
        total,
        page,
        page_size,
        total_pages: total_pages(total, page_size),
        skipped: 0,
    }
}
