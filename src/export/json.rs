use crate::error::ExportError;
use crate::model::{Cell, RawNode, Table};
use serde_json::{Map, Value};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Table as a list of row objects, keys in column order. Absent cells are
/// left out of their row.
#[must_use]
pub fn table_records(table: &Table) -> Value {
    let rows = (0..table.row_count())
        .map(|row| {
            let mut record = Map::new();
            for column in table.columns() {
                if let Some(cell @ Cell::Value(_)) = column.cells.get(row) {
                    record.insert(column.name.clone(), cell.to_json());
                }
            }
            Value::Object(record)
        })
        .collect();
    Value::Array(rows)
}

fn write_json_file(value: &Value, path: &Path) -> Result<(), ExportError> {
    let json = serde_json::to_string_pretty(value)?;

    let mut file = File::create(path).map_err(|source| ExportError::FileCreate {
        path: path.to_path_buf(),
        source,
    })?;

    file.write_all(json.as_bytes())
        .map_err(|e| ExportError::WriteError {
            message: e.to_string(),
        })?;

    Ok(())
}

/// Writes the raw object tree, mirroring the received structure.
pub fn export_json<P: AsRef<Path>>(root: &RawNode, path: P) -> Result<(), ExportError> {
    let path_ref = path.as_ref();
    write_json_file(&root.to_json(), path_ref)?;
    info!(path = %path_ref.display(), "exported JSON tree");
    Ok(())
}

pub fn export_table_json<P: AsRef<Path>>(table: &Table, path: P) -> Result<(), ExportError> {
    let path_ref = path.as_ref();
    write_json_file(&table_records(table), path_ref)?;
    info!(path = %path_ref.display(), rows = table.row_count(), "exported JSON records");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Scalar;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn records_skip_absent_cells() {
        let mut table = Table::new(2);
        table.push_column(
            "Name",
            vec![
                Cell::Value(Scalar::Text("a".into())),
                Cell::Value(Scalar::Null),
            ],
        );
        table.push_column("Höhe", vec![Cell::Absent, Cell::Value(Scalar::Float(2.5))]);

        assert_eq!(
            table_records(&table),
            json!([{ "Name": "a" }, { "Name": null, "Höhe": 2.5 }])
        );
    }

    #[test]
    fn tree_export_round_trips_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("RevitData.json");
        let source = json!({ "id": "root", "@Wände": [{ "id": "w1" }] });

        export_json(&RawNode::from_json(source.clone()), &path).unwrap();

        let content = std::fs::read_to_string(path).unwrap();
        let written: Value = serde_json::from_str(&content).unwrap();
        assert_eq!(written, source);
    }
}
