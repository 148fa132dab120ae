//! `Range` header parsing.
//!
//! Turns a `Range: bytes=...` header into a validated, inclusive
//! [`ByteRange`] against a known file size. Validation happens here, before
//! any file handle is opened, so every value that reaches the reader is
//! inside `[0, size - 1]`.

/// Inclusive byte window within a file of known size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    /// First byte offset, inclusive.
    pub start: u64,
    /// Last byte offset, inclusive.
    pub end: u64,
}

impl ByteRange {
    /// Range covering a whole non-empty file, or `None` for an empty one.
    pub fn full(size: u64) -> Option<Self> {
        (size > 0).then(|| Self {
            start: 0,
            end: size - 1,
        })
    }

    /// Number of bytes in the window.
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// Always false; a `ByteRange` covers at least one byte.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// `Content-Range` value for a 206 response.
    pub fn content_range(&self, size: u64) -> String {
        format!("bytes {}-{}/{}", self.start, self.end, size)
    }
}

/// Why a `Range` header could not be honoured. Both map to 416.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    /// Not a `bytes=` range, or the offsets are not decimal integers.
    #[error("malformed range header")]
    Malformed,
    /// Well-formed, but selects no byte of the file.
    #[error("range not satisfiable")]
    Unsatisfiable,
}

fn parse_offset(raw: &str) -> Result<u64, RangeError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RangeError::Malformed);
    }
    // Overflowing values fail here instead of wrapping.
    raw.parse().map_err(|_| RangeError::Malformed)
}

/// Parse a `Range` header value against a file of `size` bytes.
///
/// Supported forms:
/// - `bytes=0-499` (clamped to the last byte when `end` is past EOF)
/// - `bytes=500-` (to end of file)
/// - `bytes=-500` (last 500 bytes, or the whole file if shorter)
///
/// Only the first range of a comma-separated list is considered.
pub fn parse_range_header(value: &str, size: u64) -> Result<ByteRange, RangeError> {
    let (unit, ranges) = value.trim().split_once('=').ok_or(RangeError::Malformed)?;
    if !unit.trim().eq_ignore_ascii_case("bytes") {
        return Err(RangeError::Malformed);
    }

    let first = ranges.split(',').next().unwrap_or_default().trim();
    let (start, end) = first.split_once('-').ok_or(RangeError::Malformed)?;
    let (start, end) = (start.trim(), end.trim());

    match (start.is_empty(), end.is_empty()) {
        // bytes=-500
        (true, false) => {
            let suffix = parse_offset(end)?;
            if suffix == 0 || size == 0 {
                return Err(RangeError::Unsatisfiable);
            }
            Ok(ByteRange {
                start: size.saturating_sub(suffix),
                end: size - 1,
            })
        }
        // bytes=500-
        (false, true) => {
            let start = parse_offset(start)?;
            if start >= size {
                return Err(RangeError::Unsatisfiable);
            }
            Ok(ByteRange {
                start,
                end: size - 1,
            })
        }
        // bytes=0-499
        (false, false) => {
            let start = parse_offset(start)?;
            let end = parse_offset(end)?;
            if start > end {
                return Err(RangeError::Malformed);
            }
            if start >= size {
                return Err(RangeError::Unsatisfiable);
            }
            Ok(ByteRange {
                start,
                end: end.min(size - 1),
            })
        }
        // bytes=-
        (true, true) => Err(RangeError::Malformed),
    }
}
