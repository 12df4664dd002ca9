//! Transport models.
//!
//! Plain data handed back by a [`Transport`](crate::Transport); none of these
//! types know anything about the client that produced them.

use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use time::OffsetDateTime;

/// A non-empty, half-open byte range `[start, start + length)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    start: u64,
    length: u64,
}
impl ByteRange {
    /// Returns `None` for a zero-length range, which HTTP cannot express.
    pub fn new(start: u64, length: u64) -> Option<Self> {
        (length > 0).then_some(Self { start, length })
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    /// Exclusive end offset.
    pub fn end(&self) -> u64 {
        self.start.saturating_add(self.length)
    }

    pub fn len(&self) -> u64 {
        self.length
    }

    /// Value for the `Range` request header. HTTP byte ranges are inclusive
    /// on both ends.
    ///
    /// ```rust
    /// use webdir_transport::ByteRange;
    /// assert_eq!(ByteRange::new(0, 4096).unwrap().header_value(), "bytes=0-4095");
    /// ```
    pub fn header_value(&self) -> String {
        format!("bytes={}-{}", self.start, self.end() - 1)
    }
}

/// The headers the cache layer cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseMeta {
    /// `Content-Length`, or `None` when the server didn't commit to a length
    /// (chunked or streamed responses).
    pub content_length: Option<u64>,
    /// `Last-Modified`, if present and parseable.
    pub last_modified: Option<OffsetDateTime>,
}
impl ResponseMeta {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            content_length: crate::headers::content_length(headers),
            last_modified: crate::headers::last_modified(headers),
        }
    }
}

/// A complete response, body included.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: StatusCode,
    pub meta: ResponseMeta,
    pub body: Bytes,
}

/// Result of a header-only request.
#[derive(Debug, Clone)]
pub struct Probe {
    pub status: StatusCode,
    pub meta: ResponseMeta,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_empty_range_rejected() {
        assert!(ByteRange::new(10, 0).is_none());
    }

    #[rstest]
    #[case(0, 1, "bytes=0-0")]
    #[case(0, 42, "bytes=0-41")]
    #[case(4096, 4096, "bytes=4096-8191")]
    fn test_header_value(#[case] start: u64, #[case] length: u64, #[case] expected: &str) {
        let range = ByteRange::new(start, length).unwrap();
        assert_eq!(range.header_value(), expected);
        assert_eq!(range.end(), start + length);
        assert_eq!(range.len(), length);
    }

    #[test]
    fn test_range_end_saturates() {
        let range = ByteRange::new(u64::MAX - 1, 10).unwrap();
        assert_eq!(range.end(), u64::MAX);
    }
}
