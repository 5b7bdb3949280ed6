// ComboStats - core/chart.rs
//
// Bar-chart data: the top rows of a table by a ranking column.
// Rendering lives in the UI layer; this module only selects and labels.

use crate::core::model::Table;
use crate::core::view::sort_descending;
use crate::util::error::FilterError;

/// One bar of the ranking chart.
#[derive(Debug, Clone, PartialEq)]
pub struct BarDatum {
    pub label: String,
    pub value: f64,
}

/// The first `n` rows of `table` ranked by `value_column`, descending.
///
/// Rows whose value is missing or non-numeric are skipped. Ties keep the
/// table order.
pub fn top_n(
    table: &Table,
    label_column: &str,
    value_column: &str,
    n: usize,
) -> Result<Vec<BarDatum>, FilterError> {
    let label_col = table
        .column_index(label_column)
        .ok_or_else(|| FilterError::MissingColumn {
            column: label_column.to_string(),
        })?;
    let sorted = sort_descending(table, value_column)?;
    let value_col = sorted
        .column_index(value_column)
        .ok_or_else(|| FilterError::MissingColumn {
            column: value_column.to_string(),
        })?;

    Ok(sorted
        .rows()
        .iter()
        .filter_map(|row| {
            let value = row[value_col].as_f64()?;
            Some(BarDatum {
                label: row[label_col].key(),
                value,
            })
        })
        .take(n)
        .collect())
}
