//! Single-range `Range` header parsing.

/// An inclusive byte range within a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    /// Number of bytes covered.
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    /// `Content-Range` value for a payload of `total` bytes.
    pub fn content_range(&self, total: u64) -> String {
        format!("bytes {}-{}/{}", self.start, self.end, total)
    }
}

/// Parse a `Range` header against a payload of `total` bytes.
///
/// Supports `bytes=<start>-<end>`, `bytes=<start>-` and the suffix form
/// `bytes=-<n>` (the last `n` bytes). The end is clamped to the last byte.
/// Multiple ranges, other units and unsatisfiable ranges yield `None`.
///
/// # Example
///
/// ```
/// use signage::content::range::{parse_range, ByteRange};
///
/// assert_eq!(parse_range("bytes=0-", 10), Some(ByteRange { start: 0, end: 9 }));
/// assert_eq!(parse_range("bytes=-4", 10), Some(ByteRange { start: 6, end: 9 }));
/// assert_eq!(parse_range("bytes=10-", 10), None);
/// ```
pub fn parse_range(header: &str, total: u64) -> Option<ByteRange> {
    let (unit, spec) = split_exactly_once(header, '=')?;
    if unit.trim() != "bytes" {
        return None;
    }

    let (start_str, end_str) = split_exactly_once(spec, '-')?;
    let (start_str, end_str) = (start_str.trim(), end_str.trim());

    let last = total.checked_sub(1)?;
    let (start, end) = if start_str.is_empty() {
        let suffix: u64 = end_str.parse().ok()?;
        (total.saturating_sub(suffix), last)
    } else {
        let start: u64 = start_str.parse().ok()?;
        let end: u64 = if end_str.is_empty() {
            last
        } else {
            end_str.parse().ok()?
        };
        (start, end)
    };

    if end < start || start >= total {
        return None;
    }

    Some(ByteRange {
        start,
        end: end.min(last),
    })
}

fn split_exactly_once(s: &str, sep: char) -> Option<(&str, &str)> {
    let (left, right) = s.split_once(sep)?;
    if right.contains(sep) {
        return None;
    }
    Some((left, right))
}
