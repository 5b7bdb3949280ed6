// ComboStats - core/view.rs
//
// Ranking sort and pagination over a filtered table, and the combined
// filter -> sort -> page step the UI runs after every interaction.

use crate::core::filter::{self, FilterSpec};
use crate::core::model::{Table, Value};
use crate::util::error::FilterError;
use std::cmp::Ordering;

/// Order two cells for a descending ranking. Missing values sort last.
fn descending(a: &Value, b: &Value) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Greater,
        (false, true) => return Ordering::Less,
        (false, false) => {}
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        _ => b.key().cmp(&a.key()),
    }
}

/// Sort rows by `column`, strictly descending.
///
/// The sort is stable: rows with equal keys keep their input order.
pub fn sort_descending(table: &Table, column: &str) -> Result<Table, FilterError> {
    let col = table
        .column_index(column)
        .ok_or_else(|| FilterError::MissingColumn {
            column: column.to_string(),
        })?;

    let mut rows = table.rows().to_vec();
    rows.sort_by(|a, b| descending(&a[col], &b[col]));
    Ok(table.with_rows(rows))
}

/// Number of pages needed for `rows` at `page_size`. Never less than one.
pub fn page_count(rows: usize, page_size: usize) -> usize {
    let page_size = page_size.max(1);
    rows.div_ceil(page_size).max(1)
}

/// Bound a 1-based page number into `[1, page_count]`.
pub fn clamp_page(page: usize, rows: usize, page_size: usize) -> usize {
    page.clamp(1, page_count(rows, page_size))
}

/// One page of a table.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// Rows on this page, re-indexed from zero.
    pub rows: Table,
    /// 1-based page number actually served (after clamping).
    pub number: usize,
    /// Total number of pages.
    pub count: usize,
    /// Rows across all pages.
    pub total_rows: usize,
}

/// Slice `table` to the requested page. Out-of-range pages are clamped.
pub fn paginate(table: &Table, page: usize, page_size: usize) -> Page {
    let page_size = page_size.max(1);
    let total_rows = table.len();
    let count = page_count(total_rows, page_size);
    let number = clamp_page(page, total_rows, page_size);

    let start = ((number - 1) * page_size).min(total_rows);
    let end = (start + page_size).min(total_rows);

    Page {
        rows: table.with_rows(table.rows()[start..end].to_vec()),
        number,
        count,
        total_rows,
    }
}

/// Everything needed to turn a loaded table into what is on screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewRequest {
    pub filters: Vec<FilterSpec>,
    /// Ranking column; `None` keeps load order.
    pub sort_by: Option<String>,
    /// 1-based page; `None` disables pagination.
    pub page: Option<usize>,
}

/// Result of running a `ViewRequest`.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewResult {
    /// Filtered and sorted rows, all pages.
    pub filtered: Table,
    /// The rows to display: one page, or everything when paging is off.
    pub visible: Table,
    /// Served page number (1 when paging is off).
    pub page: usize,
    pub page_count: usize,
}

/// Filter, sort, and paginate `table` in that order.
pub fn render(
    table: &Table,
    request: &ViewRequest,
    page_size: usize,
) -> Result<ViewResult, FilterError> {
    let mut filtered = filter::apply(table, &request.filters)?;
    if let Some(ref column) = request.sort_by {
        filtered = sort_descending(&filtered, column)?;
    }

    let result = match request.page {
        Some(page) => {
            let page = paginate(&filtered, page, page_size);
            ViewResult {
                visible: page.rows,
                page: page.number,
                page_count: page.count,
                filtered,
            }
        }
        None => ViewResult {
            visible: filtered.clone(),
            page: 1,
            page_count: 1,
            filtered,
        },
    };
    Ok(result)
}
