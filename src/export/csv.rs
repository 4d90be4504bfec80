//! Export the activity report as a CSV count matrix.
//!
//! Output is UTF-8 with BOM for Excel compatibility.

use std::io::Write;

use crate::stats::ActivityReport;

/// Write the report to `writer`.
///
/// Columns: Sender, then one column per bucket label. One row per sender,
/// zeros included, so rows align with the shared bucket axis.
pub fn write_counts<W: Write>(report: &ActivityReport, writer: &mut W) -> anyhow::Result<()> {
    // UTF-8 BOM for Excel
    writer.write_all(&[0xEF, 0xBB, 0xBF])?;

    let mut header = "Sender".to_string();
    for label in &report.bucket_labels {
        header.push(',');
        header.push_str(&csv_escape(label));
    }
    writeln!(writer, "{header}")?;

    for series in &report.series {
        let mut row = csv_escape(&series.sender);
        for count in &series.counts {
            row.push(',');
            row.push_str(&count.to_string());
        }
        writeln!(writer, "{row}")?;
    }

    Ok(())
}

/// Quote a field when it contains a separator, quote, or newline.
fn csv_escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
