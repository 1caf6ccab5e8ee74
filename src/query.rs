//! Listing: search, sort, paginate

use serde::Deserialize;

use crate::models::{Submission, SubmissionPage};

/// Page sizes the list endpoint accepts; anything else falls back to the first.
pub const PAGE_LIMITS: [usize; 3] = [10, 20, 50];

const DEFAULT_SORT_KEY: &str = "createdAt";

/// Raw query-string parameters. Numeric fields arrive as strings so that
/// non-numeric input coerces to a default instead of failing extraction.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
    #[serde(rename = "sortOrder")]
    pub sort_order: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Normalized query, ready to run
#[derive(Debug, Clone)]
pub struct QueryOptions {
    pub page: usize,
    pub limit: usize,
    pub sort_by: String,
    pub sort_order: SortOrder,
    pub search: String,
}

impl QueryOptions {
    pub fn from_params(params: &ListParams) -> Self {
        Self {
            page: normalize_page(params.page.as_deref()),
            limit: normalize_limit(params.limit.as_deref()),
            sort_by: params
                .sort_by
                .clone()
                .unwrap_or_else(|| DEFAULT_SORT_KEY.into()),
            sort_order: match params.sort_order.as_deref() {
                Some("asc") => SortOrder::Asc,
                _ => SortOrder::Desc,
            },
            search: params.search.clone().unwrap_or_default(),
        }
    }
}

/// `page` below 1 or non-numeric falls back to 1.
pub fn normalize_page(raw: Option<&str>) -> usize {
    match raw.and_then(|s| s.parse::<i64>().ok()) {
        Some(page) if page >= 1 => page as usize,
        _ => 1,
    }
}

/// `limit` outside the allowed set falls back to the smallest size.
pub fn normalize_limit(raw: Option<&str>) -> usize {
    match raw.and_then(|s| s.parse::<usize>().ok()) {
        Some(limit) if PAGE_LIMITS.contains(&limit) => limit,
        _ => PAGE_LIMITS[0],
    }
}

/// Filter, sort, and paginate the collection.
///
/// Search runs over the entire unfiltered collection before pagination, and
/// `totalCount`/`totalPages` describe the filtered set.
pub fn run(submissions: Vec<Submission>, opts: &QueryOptions) -> SubmissionPage {
    let filtered = filter_and_sort(submissions, opts);

    let total_count = filtered.len();
    let total_pages = total_count.div_ceil(opts.limit);

    let start = (opts.page - 1).saturating_mul(opts.limit);
    let items: Vec<Submission> = filtered.into_iter().skip(start).take(opts.limit).collect();

    SubmissionPage {
        submissions: items,
        total_count,
        total_pages,
        current_page: opts.page,
        limit: opts.limit,
        sort_by: opts.sort_by.clone(),
        sort_order: opts.sort_order.as_str().into(),
        search: opts.search.clone(),
    }
}

/// The filtered, sorted collection without pagination; shared with CSV export.
pub fn filter_and_sort(submissions: Vec<Submission>, opts: &QueryOptions) -> Vec<Submission> {
    let mut filtered: Vec<Submission> = if opts.search.is_empty() {
        submissions
    } else {
        let needle = opts.search.to_lowercase();
        submissions
            .into_iter()
            .filter(|s| matches_search(s, &needle))
            .collect()
    };

    // Only `createdAt` is sortable; any other key silently keeps the
    // pre-existing order. Longstanding behavior, kept as-is.
    if opts.sort_by == DEFAULT_SORT_KEY {
        match opts.sort_order {
            SortOrder::Asc => filtered.sort_by_key(|s| s.created_at),
            SortOrder::Desc => filtered.sort_by_key(|s| std::cmp::Reverse(s.created_at)),
        }
    }

    filtered
}

/// Case-insensitive substring match over scalar data values, the id, and the
/// creation timestamp. List and toggle values do not participate.
fn matches_search(submission: &Submission, needle: &str) -> bool {
    submission
        .data
        .values()
        .filter_map(|v| v.search_text())
        .any(|text| text.to_lowercase().contains(needle))
        || submission.id.to_string().to_lowercase().contains(needle)
        || submission.created_at_text().to_lowercase().contains(needle)
}
