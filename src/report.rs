use std::path::Path;

use tracing::error;

use crate::error::{InventoryError, Result};

/// One report line: scalar fields matching the report's header 1:1.
pub type Row = Vec<String>;

/// Writes the header and all rows, in order, as comma-delimited CSV with
/// CRLF line terminators.
pub fn write_csv_report(path: &Path, field_names: &[&str], rows: &[Row]) -> Result<()> {
    let report_write = |source| InventoryError::ReportWrite {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_path(path)
        .map_err(report_write)?;

    writer.write_record(field_names).map_err(report_write)?;
    for row in rows {
        writer.write_record(row).map_err(report_write)?;
    }
    writer.flush().map_err(|e| report_write(e.into()))?;

    Ok(())
}

/// Writes the report and tells the operator how it went. A write failure is
/// logged rather than propagated, so a run that already gathered rows from
/// every profile still finishes cleanly.
pub fn finish_report(path: &Path, field_names: &[&str], rows: &[Row]) {
    match write_csv_report(path, field_names, rows) {
        Ok(()) => println!(
            "{} rows successfully saved to {}\r\n",
            rows.len(),
            path.display()
        ),
        Err(err) => {
            error!("{err}");
            println!("An error occurred when writing to {}", path.display());
        }
    }
}
