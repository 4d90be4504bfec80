//! Streaming MBOX scanner.
//!
//! Reads the file line-by-line with a 128 KB buffer and never loads the
//! whole archive into memory. Only the `From ` boundary and the `From:` and
//! `Date:` headers are examined; everything else streams past.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::error::{GraphError, Result};
use crate::model::address::SenderIdentity;
use crate::model::envelope::MessageEnvelope;
use crate::parser::date;

/// Size of the internal read buffer (128 KB).
const READ_BUFFER_SIZE: usize = 128 * 1024;

/// Default maximum logical line length (8 MiB).
const DEFAULT_MAX_LINE_LEN: usize = 8 * 1024 * 1024;

/// Lines up to 1 MiB must always scan losslessly; lower configured caps are
/// clamped up to this.
const MIN_MAX_LINE_LEN: usize = 1024 * 1024;

/// Classification of one logical line.
///
/// Header prefixes are matched before the boundary token: `From:` must never
/// be mistaken for the looser `From ` separator.
#[derive(Debug, PartialEq, Eq)]
enum LineClass<'a> {
    /// A `From:` header; carries the raw value.
    FromHeader(&'a str),
    /// A `Date:` header; carries the raw value.
    DateHeader(&'a str),
    /// A `From ` message separator.
    Boundary,
    /// Anything else.
    Other,
}

fn classify(line: &str) -> LineClass<'_> {
    if let Some(value) = line.strip_prefix("From:") {
        LineClass::FromHeader(value)
    } else if let Some(value) = line.strip_prefix("Date:") {
        LineClass::DateHeader(value)
    } else if line.starts_with("From ") {
        LineClass::Boundary
    } else {
        LineClass::Other
    }
}

/// Counters for one completed scan.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanSummary {
    /// Messages emitted with both sender and date.
    pub messages: u64,
    /// Messages dropped at a boundary for lacking a sender or a date.
    pub skipped: u64,
    /// `Date:` headers that matched no recognized format.
    pub bad_dates: u64,
}

/// Streaming MBOX scanner.
///
/// Walks the file once, in order, and invokes a caller-supplied callback
/// with `(sender, timestamp)` for every message whose `From:` and `Date:`
/// headers were both recovered. Messages missing either are skipped; an
/// unrecognized date additionally logs a warning naming the raw value.
///
/// A message is emitted only when the *next* `From ` separator is seen, so
/// an archive that ends mid-message (no trailing separator) drops its final
/// message.
pub struct MboxScanner {
    path: PathBuf,
    file_size: u64,
    max_line_len: usize,
    read_buffer_size: usize,
}

impl MboxScanner {
    /// Create a scanner for the given MBOX file.
    ///
    /// Verifies that the file exists and is readable, but does NOT validate
    /// that it is actually an MBOX.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let metadata = std::fs::metadata(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                GraphError::FileNotFound(path.clone())
            } else {
                GraphError::io(&path, e)
            }
        })?;
        Ok(Self {
            path,
            file_size: metadata.len(),
            max_line_len: DEFAULT_MAX_LINE_LEN,
            read_buffer_size: READ_BUFFER_SIZE,
        })
    }

    /// Override the logical line cap. Values below 1 MiB are clamped up.
    ///
    /// A line longer than the cap aborts the scan with
    /// [`GraphError::LineTooLong`]; the scanner never truncates silently.
    pub fn with_max_line_len(mut self, max_line_len: usize) -> Self {
        self.max_line_len = max_line_len.max(MIN_MAX_LINE_LEN);
        self
    }

    /// Override the read buffer size.
    pub fn with_read_buffer_size(mut self, read_buffer_size: usize) -> Self {
        self.read_buffer_size = read_buffer_size.max(4096);
        self
    }

    /// Total size of the underlying file in bytes.
    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    /// Path to the MBOX file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Scan the full MBOX, calling `on_message` for each recovered message.
    ///
    /// Single forward pass in document order. An I/O error aborts the scan;
    /// pairs already handed to the callback remain with the caller.
    pub fn scan(
        &self,
        on_message: &mut dyn FnMut(SenderIdentity, DateTime<Utc>),
        progress_callback: Option<&dyn Fn(u64, u64)>,
    ) -> Result<ScanSummary> {
        let file = File::open(&self.path).map_err(|e| GraphError::io(&self.path, e))?;
        let mut reader = BufReader::with_capacity(self.read_buffer_size, file);

        let mut summary = ScanSummary::default();
        let mut envelope = MessageEnvelope::default();
        let mut in_message = false;
        // Multi-line From: value still waiting for a line containing '@'.
        let mut awaiting_at = false;

        let mut offset: u64 = 0;
        let mut last_progress: u64 = 0;
        const PROGRESS_INTERVAL: u64 = 4 * 1024 * 1024;

        // Reusable line buffer
        let mut line_buf: Vec<u8> = Vec::with_capacity(4096);

        loop {
            line_buf.clear();
            let line_len = self.read_logical_line(&mut reader, &mut line_buf, offset)?;
            if line_len == 0 {
                break; // EOF; the in-progress envelope is not flushed
            }

            let text = String::from_utf8_lossy(&line_buf);
            let line = text.trim_end_matches(['\r', '\n']);

            if in_message && awaiting_at {
                // Each raw line replaces the working sender value until one
                // carries an '@' or the stream ends.
                envelope.sender = SenderIdentity::extract(line);
                if line.contains('@') {
                    awaiting_at = false;
                }
            } else {
                match classify(line) {
                    LineClass::FromHeader(value) if in_message => {
                        let value = value.trim();
                        envelope.sender = SenderIdentity::extract(value);
                        awaiting_at = !value.contains('@');
                    }
                    LineClass::DateHeader(value) if in_message => {
                        // Last write wins: a later unparsable Date: clears
                        // an earlier good one.
                        match date::parse_date(value) {
                            Ok(parsed) => envelope.date = Some(parsed),
                            Err(e) => {
                                warn!(raw = %e.raw, offset, "unrecognized date format");
                                envelope.date = None;
                                summary.bad_dates += 1;
                            }
                        }
                    }
                    LineClass::Boundary => {
                        if in_message {
                            match std::mem::take(&mut envelope).into_pair() {
                                Some((sender, timestamp)) => {
                                    on_message(sender, timestamp);
                                    summary.messages += 1;
                                }
                                None => summary.skipped += 1,
                            }
                        }
                        in_message = true;
                        awaiting_at = false;
                    }
                    _ => {}
                }
            }

            offset += line_len;

            if let Some(cb) = progress_callback {
                if offset - last_progress >= PROGRESS_INTERVAL {
                    cb(offset, self.file_size);
                    last_progress = offset;
                }
            }
        }

        if let Some(cb) = progress_callback {
            cb(self.file_size, self.file_size);
        }

        Ok(summary)
    }

    /// Read one logical line (through its `\n`, if any) into `line_buf`.
    ///
    /// Returns the number of bytes consumed; 0 means EOF. Content longer
    /// than `max_line_len` (the terminator excluded) fails with
    /// [`GraphError::LineTooLong`] rather than truncating.
    fn read_logical_line(
        &self,
        reader: &mut impl BufRead,
        line_buf: &mut Vec<u8>,
        offset: u64,
    ) -> Result<u64> {
        loop {
            let buf = reader
                .fill_buf()
                .map_err(|e| GraphError::io(&self.path, e))?;
            if buf.is_empty() {
                return Ok(line_buf.len() as u64); // EOF; possibly a final unterminated line
            }

            let (content_len, consume_len, terminated) =
                match buf.iter().position(|&b| b == b'\n') {
                    Some(pos) => (pos, pos + 1, true),
                    None => (buf.len(), buf.len(), false),
                };

            if line_buf.len() + content_len > self.max_line_len {
                return Err(GraphError::LineTooLong {
                    offset,
                    limit: self.max_line_len,
                });
            }

            line_buf.extend_from_slice(&buf[..consume_len]);
            reader.consume(consume_len);

            if terminated {
                return Ok(line_buf.len() as u64);
            }
        }
    }
}
