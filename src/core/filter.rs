// ComboStats - core/filter.rs
//
// Declarative filter pipeline over a `Table`.
// All specs are AND-combined in list order.
// Core layer: pure logic, no I/O or UI dependencies.

use crate::core::model::{Row, Table, Value};
use crate::util::constants::EMPTY_SELECTION_MATCHES_ALL;
use crate::util::error::FilterError;
use std::collections::BTreeSet;

/// The test a single spec applies to one column.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Cell key is one of the selected keys (multi-select, checkbox list).
    Membership(BTreeSet<String>),

    /// Numeric view lies in `[lo, hi]`, both bounds included (slider).
    Range { lo: f64, hi: f64 },

    /// Cell key contains the query, ignoring case (text search).
    Contains(String),

    /// Cell equals the value (radio toggle).
    Equals(Value),
}

/// A named predicate over one column.
///
/// A spec whose column is absent from the table is a pass-through unless it
/// was marked `required`, in which case `apply` fails with
/// `FilterError::MissingColumn`.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec {
    pub column: String,
    pub predicate: Predicate,
    pub required: bool,
}

impl FilterSpec {
    pub fn new(column: &str, predicate: Predicate) -> Self {
        Self {
            column: column.to_string(),
            predicate,
            required: false,
        }
    }

    pub fn membership<I, S>(column: &str, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            column,
            Predicate::Membership(keys.into_iter().map(Into::into).collect()),
        )
    }

    pub fn range(column: &str, lo: f64, hi: f64) -> Self {
        Self::new(column, Predicate::Range { lo, hi })
    }

    pub fn contains(column: &str, query: &str) -> Self {
        Self::new(column, Predicate::Contains(query.to_string()))
    }

    pub fn equals(column: &str, value: impl Into<Value>) -> Self {
        Self::new(column, Predicate::Equals(value.into()))
    }

    /// Mark the spec as required: a missing column becomes an error.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// A spec resolved against a concrete schema.
enum Compiled<'a> {
    Membership(usize, &'a BTreeSet<String>),
    Nothing,
    Range(usize, f64, f64),
    Contains(usize, String),
    Equals(usize, &'a Value),
}

impl Compiled<'_> {
    fn matches(&self, row: &Row) -> bool {
        match self {
            Compiled::Membership(col, keys) => {
                let cell = &row[*col];
                !cell.is_null() && keys.contains(&cell.key())
            }
            Compiled::Nothing => false,
            Compiled::Range(col, lo, hi) => row[*col]
                .as_f64()
                .is_some_and(|v| *lo <= v && v <= *hi),
            Compiled::Contains(col, needle) => {
                let cell = &row[*col];
                !cell.is_null() && cell.key().to_lowercase().contains(needle.as_str())
            }
            Compiled::Equals(col, value) => {
                let cell = &row[*col];
                !cell.is_null() && cell == *value
            }
        }
    }
}

/// Resolve specs to column positions, dropping pass-through specs.
fn compile<'a>(table: &Table, specs: &'a [FilterSpec]) -> Result<Vec<Compiled<'a>>, FilterError> {
    let mut compiled = Vec::with_capacity(specs.len());
    for spec in specs {
        let Some(col) = table.column_index(&spec.column) else {
            if spec.required {
                return Err(FilterError::MissingColumn {
                    column: spec.column.clone(),
                });
            }
            tracing::trace!(column = %spec.column, "Filter column absent, skipping");
            continue;
        };

        match &spec.predicate {
            Predicate::Membership(keys) if keys.is_empty() => {
                if !EMPTY_SELECTION_MATCHES_ALL {
                    compiled.push(Compiled::Nothing);
                }
            }
            Predicate::Membership(keys) => compiled.push(Compiled::Membership(col, keys)),
            Predicate::Range { lo, hi } => {
                let (lo, hi) = if lo <= hi { (*lo, *hi) } else { (*hi, *lo) };
                compiled.push(Compiled::Range(col, lo, hi));
            }
            Predicate::Contains(query) => {
                let needle = query.trim().to_lowercase();
                if !needle.is_empty() {
                    compiled.push(Compiled::Contains(col, needle));
                }
            }
            Predicate::Equals(value) => compiled.push(Compiled::Equals(col, value)),
        }
    }
    Ok(compiled)
}

/// Apply `specs` to `table`, returning the matching rows as a new table.
///
/// Rows keep their relative order and are re-indexed from zero. No row is
/// ever created or modified; applying the same specs to the result returns
/// the result unchanged.
pub fn apply(table: &Table, specs: &[FilterSpec]) -> Result<Table, FilterError> {
    let compiled = compile(table, specs)?;

    if compiled.is_empty() {
        return Ok(table.clone());
    }

    let rows = table
        .rows()
        .iter()
        .filter(|row| compiled.iter().all(|c| c.matches(row)))
        .cloned()
        .collect();

    let filtered = table.with_rows(rows);
    tracing::debug!(
        specs = specs.len(),
        input = table.len(),
        output = filtered.len(),
        "Filters applied"
    );
    Ok(filtered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{Column, ColumnType, Schema};

    fn stats_table() -> Table {
        let schema = Schema::new(vec![
            Column::new("combo", ColumnType::Text),
            Column::new("nb_joueurs", ColumnType::Integer),
            Column::new("matches", ColumnType::Integer),
            Column::new("victoires", ColumnType::Integer),
        ]);
        Table::new(
            schema,
            vec![
                vec!["A".into(), Value::Int(2), Value::Int(10), Value::Int(7)],
                vec!["B".into(), Value::Int(3), Value::Int(5), Value::Int(1)],
            ],
        )
    }

    fn mixed_table() -> Table {
        let schema = Schema::new(vec![
            Column::new("combo", ColumnType::Text),
            Column::new("matches", ColumnType::Integer),
        ]);
        Table::new(
            schema,
            vec![
                vec!["Alpha-Beta".into(), Value::Int(1)],
                vec![Value::Null, Value::Int(20)],
                vec!["gamma".into(), Value::Null],
                vec!["ALPHA".into(), Value::Int(21)],
                vec!["delta".into(), Value::Int(20)],
            ],
        )
    }

    #[test]
    fn test_membership_and_range_selects_single_row() {
        let table = stats_table();
        let specs = vec![
            FilterSpec::membership("nb_joueurs", ["2"]),
            FilterSpec::range("matches", 1.0, 20.0),
        ];
        let result = apply(&table, &specs).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result.value(0, "combo"), Some(&Value::from("A")));
    }

    #[test]
    fn test_empty_membership_matches_all() {
        let table = stats_table();
        let specs = vec![FilterSpec::membership("nb_joueurs", Vec::<String>::new())];
        let result = apply(&table, &specs).unwrap();
        assert_eq!(result, table);
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        let table = mixed_table();
        let result = apply(&table, &[FilterSpec::range("matches", 1.0, 20.0)]).unwrap();
        let combos: Vec<String> = result.rows().iter().map(|r| r[0].key()).collect();
        // Null combo row passes (matches = 20); null matches row never does.
        assert_eq!(combos, vec!["Alpha-Beta", "", "delta"]);
    }

    #[test]
    fn test_reversed_range_is_normalised() {
        let table = mixed_table();
        let forward = apply(&table, &[FilterSpec::range("matches", 1.0, 20.0)]).unwrap();
        let reversed = apply(&table, &[FilterSpec::range("matches", 20.0, 1.0)]).unwrap();
        assert_eq!(forward, reversed);
    }

    #[test]
    fn test_contains_is_case_insensitive_and_skips_missing() {
        let table = mixed_table();
        let result = apply(&table, &[FilterSpec::contains("combo", "alpha")]).unwrap();
        let combos: Vec<String> = result.rows().iter().map(|r| r[0].key()).collect();
        assert_eq!(combos, vec!["Alpha-Beta", "ALPHA"]);
    }

    #[test]
    fn test_blank_query_matches_all() {
        let table = mixed_table();
        let result = apply(&table, &[FilterSpec::contains("combo", "   ")]).unwrap();
        assert_eq!(result.len(), table.len());
    }

    #[test]
    fn test_equals_never_matches_missing() {
        let table = mixed_table();
        let result = apply(&table, &[FilterSpec::equals("matches", 20i64)]).unwrap();
        assert_eq!(result.len(), 2);
        let none = apply(&table, &[FilterSpec::equals("matches", Value::Null)]).unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_missing_optional_column_is_passthrough() {
        let table = stats_table();
        let result = apply(&table, &[FilterSpec::range("taux_victoire", 0.0, 1.0)]).unwrap();
        assert_eq!(result, table);
    }

    #[test]
    fn test_missing_required_column_is_error() {
        let table = stats_table();
        let err = apply(
            &table,
            &[FilterSpec::range("taux_victoire", 0.0, 1.0).required()],
        )
        .unwrap_err();
        assert_eq!(
            err,
            FilterError::MissingColumn {
                column: "taux_victoire".to_string()
            }
        );
    }

    #[test]
    fn test_apply_is_idempotent() {
        let table = mixed_table();
        let specs = vec![
            FilterSpec::contains("combo", "a"),
            FilterSpec::range("matches", 0.0, 20.0),
        ];
        let once = apply(&table, &specs).unwrap();
        let twice = apply(&once, &specs).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_result_is_subset_in_original_order() {
        let table = mixed_table();
        let result = apply(&table, &[FilterSpec::range("matches", 0.0, 100.0)]).unwrap();
        let mut cursor = 0;
        for row in result.rows() {
            let pos = table.rows()[cursor..]
                .iter()
                .position(|r| r == row)
                .expect("row must come from the input");
            cursor += pos + 1;
        }
    }
}
