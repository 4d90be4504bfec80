//! Export the archive index as InfluxDB line-protocol points.
//!
//! One point per message: `mail,from=<sender> count=1i <timestamp_ns>`.
//! Feed the output to `influx write` or any line-protocol-compatible sink.

use std::io::Write;

use crate::error::GraphError;
use crate::model::index::ArchiveIndex;

/// Write one point per message to `writer`.
///
/// Points follow index order: senders in key order, each sender's
/// timestamps in the index's (sorted) order.
pub fn write_points<W: Write>(
    index: &ArchiveIndex,
    writer: &mut W,
    measurement: &str,
) -> anyhow::Result<()> {
    let measurement = escape_identifier(measurement);
    for (sender, timestamps) in index.iter() {
        let tag = escape_identifier(sender.as_str());
        for &t in timestamps {
            let ns = t.timestamp_nanos_opt().ok_or_else(|| {
                GraphError::Export(format!("timestamp out of line-protocol range: {t}"))
            })?;
            writeln!(writer, "{measurement},from={tag} count=1i {ns}")?;
        }
    }
    Ok(())
}

/// Escape commas, spaces, and equals signs in measurement and tag values.
fn escape_identifier(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, ',' | ' ' | '=') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
