//! Render the activity report as a self-contained HTML stacked bar chart.
//!
//! Senders run along the x-axis; each time bucket is one stacked series, so
//! a bar's height is the sender's total and its segments show when the
//! messages were sent.

use std::io::Write;

use serde_json::json;

use crate::config::ChartConfig;
use crate::stats::ActivityReport;

/// Write the chart page to `writer`.
///
/// The page loads ECharts from a CDN and embeds the chart option as JSON.
pub fn write_chart<W: Write>(
    report: &ActivityReport,
    writer: &mut W,
    config: &ChartConfig,
) -> anyhow::Result<()> {
    let series: Vec<serde_json::Value> = report
        .bucket_labels
        .iter()
        .enumerate()
        .map(|(bucket, label)| {
            let values: Vec<u64> = report.series.iter().map(|s| s.counts[bucket]).collect();
            json!({
                "name": label,
                "type": "bar",
                "stack": "total",
                "itemStyle": { "opacity": config.opacity },
                "data": values,
            })
        })
        .collect();

    let option = json!({
        "title": { "text": config.title },
        "tooltip": { "trigger": "axis" },
        "legend": { "show": true, "type": "scroll", "orient": "horizontal", "top": 30 },
        "dataZoom": [{ "type": "slider" }],
        "grid": { "containLabel": true },
        "xAxis": {
            "type": "category",
            "data": report.sender_labels(),
            "axisLabel": {
                "show": true,
                "rotate": config.axis_label_rotate,
                "fontWeight": "bold",
                "inside": true,
            },
        },
        "yAxis": { "type": "value" },
        "series": series,
    });

    // "</" would terminate the surrounding <script> block early
    let payload = option.to_string().replace("</", "<\\/");

    write!(
        writer,
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="https://cdn.jsdelivr.net/npm/echarts@5/dist/echarts.min.js"></script>
</head>
<body>
<div id="chart" style="width:100%;height:90vh;"></div>
<script>
echarts.init(document.getElementById("chart")).setOption({payload});
</script>
</body>
</html>
"#,
        title = escape_html(&config.title),
        payload = payload,
    )?;
    Ok(())
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
