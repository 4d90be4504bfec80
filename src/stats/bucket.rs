//! Bucket widths and the shared global time axis.

use chrono::{DateTime, Datelike, Duration, TimeZone, Timelike, Utc};

/// Width of one aggregation bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketWidth {
    /// Calendar years.
    Year,
    /// Clock hours (timestamps truncated to the hour).
    Hour,
    /// A fixed duration, e.g. 90 days.
    Fixed(Duration),
}

impl std::str::FromStr for BucketWidth {
    type Err = String;

    /// Accepts `year`, `hour`, `<n>d` (days), or `<n>h` (hours).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "year" => return Ok(Self::Year),
            "hour" => return Ok(Self::Hour),
            _ => {}
        }
        let invalid = || format!("invalid bucket width '{s}' (try 'year', 'hour', '90d', '12h')");
        let (count, unit) = match s.strip_suffix(['d', 'h']) {
            Some(count) => (count, &s[count.len()..]),
            None => return Err(invalid()),
        };
        let n: i64 = count.parse().map_err(|_| invalid())?;
        if n <= 0 {
            return Err(format!("bucket width must be positive, got '{s}'"));
        }
        match unit {
            "d" => Ok(Self::Fixed(Duration::days(n))),
            _ => Ok(Self::Fixed(Duration::hours(n))),
        }
    }
}

/// The global bucket axis: spans the minimum to maximum observed timestamp
/// so every sender's counts align index-for-index.
pub struct BucketAxis {
    width: BucketWidth,
    start: DateTime<Utc>,
    len: usize,
}

impl BucketAxis {
    pub fn span(width: BucketWidth, min: DateTime<Utc>, max: DateTime<Utc>) -> Self {
        let (start, len) = match width {
            BucketWidth::Year => {
                let start = truncate_to_year(min);
                (start, (max.year() - min.year() + 1) as usize)
            }
            BucketWidth::Hour => {
                let start = truncate_to_hour(min);
                let hours = (truncate_to_hour(max) - start).num_hours();
                (start, (hours + 1) as usize)
            }
            BucketWidth::Fixed(duration) => {
                let buckets = (max - min).num_seconds() / duration.num_seconds();
                (min, (buckets + 1) as usize)
            }
        };
        Self { width, start, len }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Index of the bucket containing `t`. `t` must lie within the span the
    /// axis was built from.
    pub fn index_of(&self, t: DateTime<Utc>) -> usize {
        match self.width {
            BucketWidth::Year => (t.year() - self.start.year()) as usize,
            BucketWidth::Hour => (truncate_to_hour(t) - self.start).num_hours() as usize,
            BucketWidth::Fixed(duration) => {
                ((t - self.start).num_seconds() / duration.num_seconds()) as usize
            }
        }
    }

    /// Human-readable label per bucket, in axis order.
    pub fn labels(&self) -> Vec<String> {
        (0..self.len)
            .map(|i| match self.width {
                BucketWidth::Year => format!("{}", self.start.year() + i as i32),
                BucketWidth::Hour => (self.start + Duration::hours(i as i64))
                    .format("%Y-%m-%d %H:00")
                    .to_string(),
                BucketWidth::Fixed(duration) => (self.start + duration * i as i32)
                    .format("%Y-%m-%d")
                    .to_string(),
            })
            .collect()
    }
}

fn truncate_to_year(t: DateTime<Utc>) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(t.year(), 1, 1, 0, 0, 0).unwrap()
}

fn truncate_to_hour(t: DateTime<Utc>) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(t.year(), t.month(), t.day(), t.hour(), 0, 0)
        .unwrap()
}
