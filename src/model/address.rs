//! Sender identity extraction from raw `From:` header values.

/// A normalized sender key: the bare email address from a `From:` header.
///
/// # Examples
/// - `"Juan García <juan@ejemplo.com>"` → `"juan@ejemplo.com"`
/// - `"'jane@example.org'"` → `"jane@example.org"`
/// - `"mailer-daemon"` (no `@`) → `"mailer-daemon"`, kept as an opaque key
///
/// Equality is exact string equality: no case folding, no alias merging.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct SenderIdentity(String);

impl SenderIdentity {
    /// Extract a bare address from a raw `From:` value.
    ///
    /// Scans left to right tracking whether an `@` has been seen. Before the
    /// `@`, any whitespace or angle bracket moves the start marker past it,
    /// so the candidate is the last delimited token preceding the `@`. After
    /// the `@`, the first whitespace or angle bracket ends the address. An
    /// address running to the end of the string is kept whole. Surrounding
    /// quotes, apostrophes, and spaces are stripped last.
    ///
    /// A value with no `@` degenerates to its trailing token and is kept as
    /// an opaque key. Returns `None` only when nothing is left after
    /// stripping; those messages are dropped.
    pub fn extract(raw: &str) -> Option<Self> {
        let chars: Vec<char> = raw.chars().collect();
        let mut at_seen = false;
        let mut lo = 0;
        let mut hi = chars.len();

        for (i, &c) in chars.iter().enumerate() {
            if c.is_whitespace() || c == '<' || c == '>' {
                if at_seen {
                    hi = i;
                    break;
                }
                lo = i + 1;
            }
            at_seen = at_seen || c == '@';
        }

        let token: String = chars[lo.min(hi)..hi].iter().collect();
        let bare = token.trim_matches(|c| c == '\'' || c == '"' || c == ' ');
        if bare.is_empty() {
            None
        } else {
            Some(Self(bare.to_string()))
        }
    }

    /// The normalized address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SenderIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
