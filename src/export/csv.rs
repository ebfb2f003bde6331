use crate::error::ExportError;
use crate::model::Table;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Writes `table` as UTF-8 CSV: a header row of column names, then one
/// record per row. Absent cells become empty fields.
pub fn write_csv<W: Write>(table: &Table, writer: W) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_writer(writer);

    if table.column_count() > 0 {
        writer.write_record(table.column_names())?;

        for row in 0..table.row_count() {
            writer.write_record(table.row(row).iter().map(ToString::to_string))?;
        }
    }

    writer.flush().map_err(|e| ExportError::WriteError {
        message: e.to_string(),
    })?;

    Ok(())
}

pub fn export_csv<P: AsRef<Path>>(table: &Table, path: P) -> Result<(), ExportError> {
    let path_ref = path.as_ref();
    let file = File::create(path_ref).map_err(|source| ExportError::FileCreate {
        path: path_ref.to_path_buf(),
        source,
    })?;

    write_csv(table, file)?;
    info!(path = %path_ref.display(), rows = table.row_count(), "exported CSV");
    Ok(())
}
