//! `Date:` header parsing against an ordered list of real-world formats.
//!
//! Email archives carry dates far outside RFC 2822: 12-hour clocks with
//! `at` separators, parenthetical zone comments, bare `M/D/YYYY` dates.
//! Each recognized shape is a [`DatePattern`]; the first full match wins.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use thiserror::Error;

/// A `Date:` value that matched none of the recognized formats.
///
/// Recoverable: the caller logs the raw text and drops the message. The
/// timestamp is never defaulted to the current time, which would tally the
/// scan run itself into the newest bucket.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unrecognized date format: '{raw}'")]
pub struct DateParseError {
    /// The offending header value, verbatim (after trimming).
    pub raw: String,
}

/// How a pattern resolves the timezone.
#[derive(Debug, Clone, Copy)]
enum Zone {
    /// The format string carries `%z`.
    Offset,
    /// A trailing zone abbreviation is rewritten to its numeric offset,
    /// then the format is applied.
    Named,
    /// RFC 3339, delegated to chrono's dedicated parser.
    Rfc3339,
    /// A trailing `(…)` comment is stripped, then the format is applied.
    Comment,
    /// No zone information; the wall-clock value is taken as UTC.
    Naive,
    /// Date only; resolves to midnight UTC.
    DateOnly,
}

/// One recognized date shape: a chrono format plus its zone strategy.
struct DatePattern {
    format: &'static str,
    zone: Zone,
}

impl DatePattern {
    const fn new(format: &'static str, zone: Zone) -> Self {
        Self { format, zone }
    }

    fn try_parse(&self, input: &str) -> Option<DateTime<Utc>> {
        match self.zone {
            Zone::Offset => parse_with_offset(input, self.format),
            Zone::Named => parse_with_offset(&replace_named_zone(input)?, self.format),
            Zone::Rfc3339 => DateTime::parse_from_rfc3339(input)
                .ok()
                .map(|d| d.with_timezone(&Utc)),
            Zone::Comment => parse_with_offset(strip_zone_comment(input)?, self.format),
            Zone::Naive => NaiveDateTime::parse_from_str(input, self.format)
                .ok()
                .map(|n| Utc.from_utc_datetime(&n)),
            Zone::DateOnly => {
                let day = NaiveDate::parse_from_str(input, self.format).ok()?;
                Some(Utc.from_utc_datetime(&day.and_hms_opt(0, 0, 0)?))
            }
        }
    }
}

/// Recognized formats, most specific and most common first.
///
/// Evaluated strictly in order; the list is append-only so existing
/// priorities stay stable when new shapes are added. Numeric fields parse
/// with or without zero padding, so padded and unpadded day variants share
/// one entry.
const PATTERNS: &[DatePattern] = &[
    // Mon, 02 Jan 2006 15:04:05 -0700
    DatePattern::new("%a, %d %b %Y %H:%M:%S %z", Zone::Offset),
    // Mon, 02 Jan 2006 15:04:05 MST
    DatePattern::new("%a, %d %b %Y %H:%M:%S %z", Zone::Named),
    // 2006-01-02T15:04:05+07:00
    DatePattern::new("%+", Zone::Rfc3339),
    // Mon, 2 Jan 2006 15:04:05 -0700 (MST), also (GMT+00:00) style comments
    DatePattern::new("%a, %d %b %Y %H:%M:%S %z", Zone::Comment),
    // Mon, Jan 2, 2006 at 3:04 PM
    DatePattern::new("%a, %b %d, %Y at %I:%M %p", Zone::Naive),
    // Mon, Jan 2, 2006 at 04:05
    DatePattern::new("%a, %b %d, %Y at %H:%M", Zone::Naive),
    // Mon, Jan 2, 2006, 04:05
    DatePattern::new("%a, %b %d, %Y, %H:%M", Zone::Naive),
    // Mon, 2 Jan 2006 at 04:05
    DatePattern::new("%a, %d %b %Y at %H:%M", Zone::Naive),
    // Mon 2, 1, 2006 at 04:05
    DatePattern::new("%a %d, %m, %Y at %H:%M", Zone::Naive),
    // 02 Jan 2006 15:04:05 -0700
    DatePattern::new("%d %b %Y %H:%M:%S %z", Zone::Offset),
    // 1/2/2006
    DatePattern::new("%m/%d/%Y", Zone::DateOnly),
];

/// Parse a raw `Date:` header value into a UTC timestamp.
///
/// Every `.` is first replaced by `,` because some mailers write
/// `Mon. Jan 2. 2006. 04:05`. The substitution is unconditional, so formats
/// that would need a literal period can never match.
pub fn parse_date(raw: &str) -> Result<DateTime<Utc>, DateParseError> {
    let trimmed = raw.trim();
    let normalized = trimmed.replace('.', ",");
    PATTERNS
        .iter()
        .find_map(|p| p.try_parse(&normalized))
        .ok_or_else(|| DateParseError {
            raw: trimmed.to_string(),
        })
}

fn parse_with_offset(input: &str, format: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_str(input, format)
        .ok()
        .map(|d| d.with_timezone(&Utc))
}

/// Strip a trailing parenthetical zone comment: `… -0700 (MST)` → `… -0700`.
fn strip_zone_comment(input: &str) -> Option<&str> {
    let input = input.trim_end();
    if !input.ends_with(')') {
        return None;
    }
    let open = input.rfind('(')?;
    Some(input[..open].trim_end())
}

/// Well-known timezone abbreviations and their numeric offsets.
const NAMED_ZONES: &[(&str, &str)] = &[
    ("EST", "-0500"),
    ("EDT", "-0400"),
    ("CST", "-0600"),
    ("CDT", "-0500"),
    ("MST", "-0700"),
    ("MDT", "-0600"),
    ("PST", "-0800"),
    ("PDT", "-0700"),
    ("GMT", "+0000"),
    ("UTC", "+0000"),
    ("UT", "+0000"),
    ("CET", "+0100"),
    ("CEST", "+0200"),
    ("JST", "+0900"),
];

/// Rewrite a trailing zone abbreviation to its numeric offset.
fn replace_named_zone(input: &str) -> Option<String> {
    let input = input.trim_end();
    NAMED_ZONES
        .iter()
        .find_map(|(name, offset)| Some(format!("{}{offset}", input.strip_suffix(name)?)))
}
