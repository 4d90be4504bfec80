//! Per-message accumulator state for the streaming scanner.

use chrono::{DateTime, Utc};

use super::address::SenderIdentity;

/// Headers of interest collected while scanning a single message.
///
/// One envelope exists per in-progress message. At each boundary the scanner
/// takes the whole value and replaces it with a fresh default, so stale
/// fields can never leak into the next message.
#[derive(Debug, Default)]
pub struct MessageEnvelope {
    /// Sender extracted from the `From:` header, if one was seen and usable.
    pub sender: Option<SenderIdentity>,
    /// Parsed `Date:` header. A later `Date:` line overwrites an earlier one;
    /// an unparsable one clears it.
    pub date: Option<DateTime<Utc>>,
}

impl MessageEnvelope {
    /// Consume the envelope, yielding a pair only when both headers were
    /// recovered. Messages missing either are skipped.
    pub fn into_pair(self) -> Option<(SenderIdentity, DateTime<Utc>)> {
        match (self.sender, self.date) {
            (Some(sender), Some(date)) => Some((sender, date)),
            _ => None,
        }
    }
}
