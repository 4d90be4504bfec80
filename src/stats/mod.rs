//! Aggregation: bucketing per-sender timestamps onto a shared time axis.

pub mod bucket;

pub use bucket::{BucketAxis, BucketWidth};

use crate::model::index::ArchiveIndex;

/// Per-bucket message counts for one sender. `counts` always has one entry
/// per axis bucket; buckets with no messages hold an explicit zero.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SenderSeries {
    pub sender: String,
    pub counts: Vec<u64>,
}

impl SenderSeries {
    /// Total messages for this sender.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

/// The bucketed report consumed by every exporter: a shared bucket axis and
/// one aligned series per sender.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct ActivityReport {
    pub bucket_labels: Vec<String>,
    pub series: Vec<SenderSeries>,
}

impl ActivityReport {
    /// Sender labels in series order.
    pub fn sender_labels(&self) -> Vec<&str> {
        self.series.iter().map(|s| s.sender.as_str()).collect()
    }
}

/// Bucket every sender's timestamps onto one global axis spanning the
/// earliest to latest message in the archive.
///
/// Series are ordered by ascending total count, ties broken by sender name,
/// so busier senders end up at the far end of the chart's axis.
pub fn aggregate(index: &ArchiveIndex, width: BucketWidth) -> ActivityReport {
    let Some((min, max)) = index.time_range() else {
        return ActivityReport::default();
    };
    let axis = BucketAxis::span(width, min, max);

    let mut series: Vec<SenderSeries> = index
        .iter()
        .map(|(sender, timestamps)| {
            let mut counts = vec![0u64; axis.len()];
            for &t in timestamps {
                counts[axis.index_of(t)] += 1;
            }
            SenderSeries {
                sender: sender.to_string(),
                counts,
            }
        })
        .collect();

    series.sort_by(|a, b| a.total().cmp(&b.total()).then_with(|| a.sender.cmp(&b.sender)));

    ActivityReport {
        bucket_labels: axis.labels(),
        series,
    }
}
