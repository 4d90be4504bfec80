//! Integration tests for the MBOX scanner, sender extraction, date parsing,
//! and aggregation pipeline.

use std::path::Path;

use chrono::{DateTime, TimeZone, Utc};

use mboxgraph::error::GraphError;
use mboxgraph::model::address::SenderIdentity;
use mboxgraph::model::index::ArchiveIndex;
use mboxgraph::parser::mbox::{MboxScanner, ScanSummary};
use mboxgraph::stats::{self, BucketWidth};

fn fixture(name: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Scan a file into a fresh index.
fn scan_file(path: &Path) -> (ArchiveIndex, ScanSummary) {
    let scanner = MboxScanner::new(path).unwrap();
    let mut index = ArchiveIndex::new();
    let summary = scanner
        .scan(&mut |sender, date| index.record(sender, date), None)
        .unwrap();
    (index, summary)
}

/// Write `content` to a scratch mbox and scan it.
fn scan_str(content: &str) -> (ArchiveIndex, ScanSummary) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.mbox");
    std::fs::write(&path, content).unwrap();
    scan_file(&path)
}

fn timestamps<'a>(index: &'a ArchiveIndex, sender: &str) -> &'a [DateTime<Utc>] {
    index
        .iter()
        .find(|(s, _)| s.as_str() == sender)
        .map(|(_, t)| t)
        .unwrap_or_else(|| panic!("no entry for {sender}"))
}

// ─── Single message between two boundaries ──────────────────────────

#[test]
fn test_single_message() {
    let (index, summary) = scan_str(
        "From a@b.com Mon Jan  1 00:00:00 2001\n\
         From: a@b.com\n\
         Date: Mon, 1 Jan 2001 00:00:00 +0000\n\
         From closing@boundary.org Mon Jan  1 00:01:00 2001\n",
    );
    assert_eq!(summary.messages, 1);
    assert_eq!(index.sender_count(), 1);
    assert_eq!(
        timestamps(&index, "a@b.com"),
        &[Utc.with_ymd_and_hms(2001, 1, 1, 0, 0, 0).unwrap()]
    );
}

// ─── Unparsable date: dropped, scan continues ───────────────────────

#[test]
fn test_bad_date_drops_message_and_continues() {
    let (index, summary) = scan_str(
        "From a@b.com Mon Jan  1 00:00:00 2001\n\
         From: a@b.com\n\
         Date: garbage-not-a-date\n\
         From c@d.com Mon Jan  1 00:00:00 2001\n\
         From: c@d.com\n\
         Date: Mon, 1 Jan 2001 00:00:00 +0000\n\
         From closing@boundary.org Mon Jan  1 00:01:00 2001\n",
    );
    assert_eq!(summary.messages, 1);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.bad_dates, 1);
    assert!(index.iter().all(|(s, _)| s.as_str() != "a@b.com"));
    assert_eq!(timestamps(&index, "c@d.com").len(), 1);
}

// ─── A later Date: header overwrites an earlier one ─────────────────

#[test]
fn test_last_date_wins() {
    let (index, _) = scan_str(
        "From a@b.com Mon Jan  1 00:00:00 2001\n\
         From: a@b.com\n\
         Date: Mon, 1 Jan 2001 00:00:00 +0000\n\
         Date: Tue, 2 Jan 2001 00:00:00 +0000\n\
         From closing@boundary.org Mon Jan  1 00:01:00 2001\n",
    );
    assert_eq!(
        timestamps(&index, "a@b.com"),
        &[Utc.with_ymd_and_hms(2001, 1, 2, 0, 0, 0).unwrap()]
    );
}

// ─── "From:" is never a message boundary ────────────────────────────

#[test]
fn test_from_header_is_not_a_boundary() {
    // If "From:" were misread as a separator, the first message would be
    // emitted early and the count would be wrong.
    let (_, summary) = scan_str(
        "From a@b.com Mon Jan  1 00:00:00 2001\n\
         From: a@b.com\n\
         Date: Mon, 1 Jan 2001 00:00:00 +0000\n\
         From closing@boundary.org Mon Jan  1 00:01:00 2001\n\
         From: ignored@tail.com\n",
    );
    assert_eq!(summary.messages, 1);
}

// ─── Headers before any boundary are ignored ────────────────────────

#[test]
fn test_headers_outside_message_are_ignored() {
    let (index, summary) = scan_str(
        "From: stray@header.com\n\
         Date: Mon, 1 Jan 2001 00:00:00 +0000\n\
         From closing@boundary.org Mon Jan  1 00:01:00 2001\n",
    );
    assert_eq!(summary.messages, 0);
    assert!(index.is_empty());
}

// ─── Final message without a trailing boundary is dropped ───────────

#[test]
fn test_no_trailing_boundary_drops_last_message() {
    let (index, summary) = scan_str(
        "From a@b.com Mon Jan  1 00:00:00 2001\n\
         From: a@b.com\n\
         Date: Mon, 1 Jan 2001 00:00:00 +0000\n",
    );
    assert_eq!(summary.messages, 0);
    assert!(index.is_empty());
}

// ─── Multi-line From: continuation ──────────────────────────────────

#[test]
fn test_folded_from_header_resolves_on_at_line() {
    let (index, _) = scan_str(
        "From daemon Mon Jan  1 00:00:00 2001\n\
         From: Mail Delivery Subsystem\n\
         \x20mailer-daemon@example.com\n\
         Date: Mon, 1 Jan 2001 00:00:00 +0000\n\
         From closing@boundary.org Mon Jan  1 00:01:00 2001\n",
    );
    assert_eq!(timestamps(&index, "mailer-daemon@example.com").len(), 1);
}

// ─── simple.mbox fixture end-to-end ─────────────────────────────────

#[test]
fn test_simple_mbox() {
    let (index, summary) = scan_file(&fixture("simple.mbox"));

    // 7 separators; one message has a garbage date, and the final message
    // has no trailing separator, so 5 survive.
    assert_eq!(summary.messages, 5);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.bad_dates, 1);
    assert_eq!(index.sender_count(), 3);

    assert_eq!(timestamps(&index, "user1@example.com").len(), 2);
    assert_eq!(timestamps(&index, "user2@example.com").len(), 2);
    assert_eq!(
        timestamps(&index, "mailer-daemon@example.com"),
        &[Utc.with_ymd_and_hms(2024, 4, 1, 15, 4, 0).unwrap()]
    );
}

// ─── Idempotence ────────────────────────────────────────────────────

#[test]
fn test_reparsing_yields_identical_index() {
    let flatten = |index: &ArchiveIndex| -> Vec<(String, Vec<DateTime<Utc>>)> {
        index
            .iter()
            .map(|(s, t)| (s.as_str().to_string(), t.to_vec()))
            .collect()
    };
    let (first, _) = scan_file(&fixture("simple.mbox"));
    let (second, _) = scan_file(&fixture("simple.mbox"));
    assert_eq!(flatten(&first), flatten(&second));
}

// ─── Sorting invariant ──────────────────────────────────────────────

#[test]
fn test_sorted_timestamps_non_decreasing() {
    let (mut index, _) = scan_file(&fixture("simple.mbox"));
    index.sort_chronologically();
    for (_, timestamps) in index.iter() {
        for pair in timestamps.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
    }
}

// ─── Empty MBOX → empty index, no error ─────────────────────────────

#[test]
fn test_empty_mbox() {
    let (index, summary) = scan_file(&fixture("empty.mbox"));
    assert_eq!(summary.messages, 0);
    assert!(index.is_empty());
}

// ─── Long lines ─────────────────────────────────────────────────────

#[test]
fn test_one_mebibyte_line_scans_losslessly() {
    let long_line = "x".repeat(1024 * 1024);
    let (index, summary) = scan_str(&format!(
        "From a@b.com Mon Jan  1 00:00:00 2001\n\
         From: a@b.com\n\
         Date: Mon, 1 Jan 2001 00:00:00 +0000\n\
         \n\
         {long_line}\n\
         From closing@boundary.org Mon Jan  1 00:01:00 2001\n"
    ));
    assert_eq!(summary.messages, 1);
    assert_eq!(timestamps(&index, "a@b.com").len(), 1);
}

#[test]
fn test_line_over_cap_is_an_explicit_failure() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wide.mbox");
    let long_line = "x".repeat(1024 * 1024 + 1);
    std::fs::write(
        &path,
        format!("From a@b.com Mon Jan  1 00:00:00 2001\n{long_line}\n"),
    )
    .unwrap();

    let scanner = MboxScanner::new(&path)
        .unwrap()
        .with_max_line_len(1024 * 1024);
    let result = scanner.scan(&mut |_, _| {}, None);
    assert!(matches!(result, Err(GraphError::LineTooLong { .. })));
}

// ─── Missing file ───────────────────────────────────────────────────

#[test]
fn test_missing_file_is_distinguished() {
    let result = MboxScanner::new("/nonexistent/archive.mbox");
    assert!(matches!(result, Err(GraphError::FileNotFound(_))));
}

// ─── Full pipeline: scan → sort → aggregate ─────────────────────────

#[test]
fn test_pipeline_bucketing_aligns_and_sums() {
    let (mut index, _) = scan_str(
        "From a@b.com Mon Jan  1 00:00:00 2001\n\
         From: a@b.com\n\
         Date: Mon, 1 Jan 2001 00:00:00 +0000\n\
         From a@b.com Mon Jan  1 00:00:00 2001\n\
         From: a@b.com\n\
         Date: Thu, 1 Jan 2004 00:00:00 +0000\n\
         From closing@boundary.org Mon Jan  1 00:01:00 2001\n",
    );
    index.sort_chronologically();
    let report = stats::aggregate(&index, BucketWidth::Year);

    assert_eq!(report.bucket_labels, vec!["2001", "2002", "2003", "2004"]);
    assert_eq!(report.series.len(), 1);
    assert_eq!(report.series[0].counts, vec![1, 0, 0, 1]);
    assert_eq!(report.series[0].total(), 2);
}

// ─── Sender extraction scenarios ────────────────────────────────────

#[test]
fn test_sender_extraction_scenarios() {
    assert_eq!(
        SenderIdentity::extract("  John Doe <john@example.com>  ")
            .unwrap()
            .as_str(),
        "john@example.com"
    );
    // Already-normalized input is a fixed point
    assert_eq!(
        SenderIdentity::extract("john@example.com").unwrap().as_str(),
        "john@example.com"
    );
}
