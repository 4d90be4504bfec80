//! Export: HTML stacked bar chart, CSV count matrix, and line-protocol points.

pub mod csv;
pub mod html;
pub mod points;

/// Output format selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Self-contained HTML page with a stacked bar chart.
    Html,
    /// CSV matrix: one row per sender, one column per bucket.
    Csv,
    /// InfluxDB line protocol, one point per message.
    Points,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "html" => Ok(Self::Html),
            "csv" => Ok(Self::Csv),
            "points" => Ok(Self::Points),
            other => Err(format!("unknown format '{other}' (try html, csv, points)")),
        }
    }
}
