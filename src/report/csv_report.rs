//! @ai:module:intent Tab-separated results table
//! @ai:module:layer infrastructure
//! @ai:module:public_api header_line, row_line
//! @ai:module:stateless true

use crate::definition::ColumnSpec;

const SEPARATOR: &str = "\t";

/// @ai:intent Header row naming the fixed fields and every metric column
/// @ai:effects pure
pub fn header_line(columns: &[ColumnSpec]) -> String {
    let mut fields = vec!["sourcefile", "status", "cputime", "walltime"];
    fields.extend(columns.iter().map(|c| c.title.as_str()));

    format!("{}\n", fields.join(SEPARATOR))
}

/// @ai:intent One row per run, values in column order
/// @ai:effects pure
pub fn row_line(file: &str, status: &str, cpu: &str, wall: &str, values: &[&str]) -> String {
    let mut fields = vec![file, status, cpu, wall];
    fields.extend_from_slice(values);

    format!("{}\n", fields.join(SEPARATOR))
}
