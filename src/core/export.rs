// ComboStats - core/export.rs
//
// CSV and JSON export of a filtered table.
// Core layer: writes to any Write trait object.

use crate::core::model::Table;
use crate::util::constants::MAX_EXPORT_ROWS;
use crate::util::error::ExportError;
use serde_json::{Map, Value as JsonValue};
use std::io::Write;
use std::path::Path;

fn check_size(table: &Table) -> Result<(), ExportError> {
    if table.len() > MAX_EXPORT_ROWS {
        return Err(ExportError::TooManyRows {
            count: table.len(),
            max: MAX_EXPORT_ROWS,
        });
    }
    Ok(())
}

/// Export `table` to CSV.
///
/// UTF-8, header row from the schema, no index column. Missing values are
/// written as empty fields. Returns the number of data rows written.
pub fn export_csv<W: Write>(
    table: &Table,
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    check_size(table)?;
    let csv_err = |e| ExportError::Csv {
        path: export_path.to_path_buf(),
        source: e,
    };

    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer
        .write_record(table.schema().names())
        .map_err(csv_err)?;

    let mut count = 0;
    for row in table.rows() {
        csv_writer
            .write_record(row.iter().map(|v| v.key()))
            .map_err(csv_err)?;
        count += 1;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    tracing::info!(rows = count, path = %export_path.display(), "CSV export written");
    Ok(count)
}

/// Export `table` to JSON: an array of objects keyed by column name.
pub fn export_json<W: Write>(
    table: &Table,
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    check_size(table)?;
    let records: Vec<Map<String, JsonValue>> = table
        .rows()
        .iter()
        .map(|row| {
            table
                .schema()
                .names()
                .zip(row.iter())
                .map(|(name, value)| {
                    (
                        name.to_string(),
                        serde_json::to_value(value).unwrap_or(JsonValue::Null),
                    )
                })
                .collect()
        })
        .collect();

    serde_json::to_writer_pretty(writer, &records).map_err(|e| ExportError::Json {
        path: export_path.to_path_buf(),
        source: e,
    })?;
    tracing::info!(rows = records.len(), path = %export_path.display(), "JSON export written");
    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{Column, ColumnType, Schema, Value};
    use chrono::NaiveDate;

    fn table() -> Table {
        let schema = Schema::new(vec![
            Column::new("combo", ColumnType::Text),
            Column::new("nb_joueurs", ColumnType::Integer),
            Column::new("date_debut", ColumnType::Date),
            Column::new("en_cours", ColumnType::Boolean),
        ]);
        Table::new(
            schema,
            vec![
                vec![
                    "Ézio, Lara".into(),
                    Value::Int(2),
                    NaiveDate::from_ymd_opt(2024, 5, 1).unwrap().into(),
                    true.into(),
                ],
                vec!["B".into(), Value::Null, Value::Null, false.into()],
            ],
        )
    }

    #[test]
    fn test_csv_export() {
        let mut buf = Vec::new();
        let count = export_csv(&table(), &mut buf, Path::new("out.csv")).unwrap();
        assert_eq!(count, 2);

        let output = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "combo,nb_joueurs,date_debut,en_cours");
        assert_eq!(lines[1], "\"Ézio, Lara\",2,2024-05-01,true");
        assert_eq!(lines[2], "B,,,false");
    }

    #[test]
    fn test_csv_export_empty_table_keeps_header() {
        let empty = table().with_rows(Vec::new());
        let mut buf = Vec::new();
        assert_eq!(export_csv(&empty, &mut buf, Path::new("e.csv")).unwrap(), 0);
        assert_eq!(
            String::from_utf8(buf).unwrap().trim_end(),
            "combo,nb_joueurs,date_debut,en_cours"
        );
    }

    #[test]
    fn test_json_export() {
        let mut buf = Vec::new();
        let count = export_json(&table(), &mut buf, Path::new("out.json")).unwrap();
        assert_eq!(count, 2);

        let parsed: JsonValue = serde_json::from_slice(&buf).unwrap();
        assert_eq!(parsed[0]["combo"], "Ézio, Lara");
        assert_eq!(parsed[0]["nb_joueurs"], 2);
        assert_eq!(parsed[0]["date_debut"], "2024-05-01");
        assert_eq!(parsed[1]["nb_joueurs"], JsonValue::Null);
    }
}
