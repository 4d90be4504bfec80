//! The in-memory archive index: per-sender message timestamps.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use super::address::SenderIdentity;

/// Timestamps of every recovered message, grouped by sender.
///
/// Built once per run by the scanner, sorted with
/// [`sort_chronologically`](Self::sort_chronologically), and read-only
/// afterwards; aggregation and export passes share it freely.
///
/// Senders iterate in `Ord` order, so two scans of byte-identical input
/// produce identical output. Within a sender, timestamps keep scan order
/// until the sort step.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct ArchiveIndex {
    by_sender: BTreeMap<SenderIdentity, Vec<DateTime<Utc>>>,
}

impl ArchiveIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one message timestamp for a sender.
    pub fn record(&mut self, sender: SenderIdentity, date: DateTime<Utc>) {
        self.by_sender.entry(sender).or_default().push(date);
    }

    /// Sort every sender's timestamps ascending.
    ///
    /// Call once after the scan completes; ties keep scan order
    /// (the sort is stable).
    pub fn sort_chronologically(&mut self) {
        for timestamps in self.by_sender.values_mut() {
            timestamps.sort();
        }
    }

    /// True when no message was recovered at all.
    pub fn is_empty(&self) -> bool {
        self.by_sender.is_empty()
    }

    /// Number of distinct senders.
    pub fn sender_count(&self) -> usize {
        self.by_sender.len()
    }

    /// Total number of recovered messages across all senders.
    pub fn message_count(&self) -> u64 {
        self.by_sender.values().map(|t| t.len() as u64).sum()
    }

    /// Iterate senders (in key order) with their timestamps.
    pub fn iter(&self) -> impl Iterator<Item = (&SenderIdentity, &[DateTime<Utc>])> {
        self.by_sender.iter().map(|(s, t)| (s, t.as_slice()))
    }

    /// Minimum and maximum timestamp across every sender, if any.
    pub fn time_range(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let mut range: Option<(DateTime<Utc>, DateTime<Utc>)> = None;
        for timestamps in self.by_sender.values() {
            for &t in timestamps {
                range = Some(match range {
                    None => (t, t),
                    Some((lo, hi)) => (lo.min(t), hi.max(t)),
                });
            }
        }
        range
    }
}
