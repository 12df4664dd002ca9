//! In-memory directory server for testing.

use crate::backend::Transport;
use crate::error::{ErrorKind, Result};
use crate::headers::http_date;
use crate::models::{ByteRange, Probe, Response, ResponseMeta};
use async_trait::async_trait;
use bytes::Bytes;
use http::header::{CONTENT_LENGTH, CONTENT_RANGE, HeaderValue, LAST_MODIFIED};
use http::{HeaderMap, StatusCode};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use time::OffsetDateTime;
use url::Url;

enum Resource {
    /// A generated index page: served without a `Content-Length`, the way
    /// servers stream dynamically rendered listings.
    Page { html: Bytes, last_modified: Option<OffsetDateTime> },
    /// A static file with a known length; honours byte ranges.
    File { data: Bytes, last_modified: Option<OffsetDateTime> },
    /// Every request gets this status and an empty body.
    Status(StatusCode),
    /// Every request fails before a status line is received.
    Unreachable,
}

/// Per-address request counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Calls {
    pub fetches: usize,
    pub probes: usize,
}

/// In-memory transport that behaves like a small directory listing server.
///
/// Resources are registered up front with the `with_*` builder methods and
/// are immutable afterwards; every request is counted per address so tests
/// can assert how many round-trips an operation cost. Unknown addresses get
/// a `404`.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use webdir_transport::{StatusCode, Transport, backend::MockTransport};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let transport = MockTransport::default()
///     .with_page("http://mock/", r#"<a href="readme.txt">readme.txt</a>"#)
///     .with_file("http://mock/readme.txt", "hello");
///
/// let probe = transport.probe(&Url::parse("http://mock/readme.txt")?).await?;
/// assert_eq!(probe.status, StatusCode::OK);
/// assert_eq!(probe.meta.content_length, Some(5));
/// assert_eq!(transport.calls("http://mock/readme.txt").probes, 1);
/// # Ok(())
/// # }
/// ```
pub struct MockTransport {
    name: String,
    resources: HashMap<Url, Resource>,
    honour_ranges: bool,
    calls: Mutex<HashMap<Url, Calls>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self {
            name: "mock".to_string(),
            resources: HashMap::new(),
            honour_ranges: true,
            calls: Mutex::new(HashMap::new()),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
        }
    }
}

/// Parse a test address. Panics on invalid input: if the test setup is
/// wrong, the test should not pass.
fn parse(url: &str) -> Url {
    match Url::parse(url) {
        Ok(url) => url,
        Err(e) => panic!("MockTransport: invalid url {url}: {e}"),
    }
}

impl MockTransport {
    /// Change the name of the mock transport.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Serve `html` as a directory index page at `url`.
    pub fn with_page(mut self, url: &str, html: impl Into<Bytes>) -> Self {
        let resource = Resource::Page {
            html: html.into(),
            last_modified: None,
        };
        self.resources.insert(parse(url), resource);
        self
    }

    /// Serve `data` as a static file at `url`.
    pub fn with_file(mut self, url: &str, data: impl Into<Bytes>) -> Self {
        let resource = Resource::File {
            data: data.into(),
            last_modified: None,
        };
        self.resources.insert(parse(url), resource);
        self
    }

    /// Answer every request for `url` with `status`.
    pub fn with_status(mut self, url: &str, status: StatusCode) -> Self {
        self.resources.insert(parse(url), Resource::Status(status));
        self
    }

    /// Fail every request for `url` at the network level.
    pub fn with_unreachable(mut self, url: &str) -> Self {
        self.resources.insert(parse(url), Resource::Unreachable);
        self
    }

    /// Attach a `Last-Modified` time to a page or file registered earlier.
    pub fn modified_at(mut self, url: &str, when: OffsetDateTime) -> Self {
        match self.resources.get_mut(&parse(url)) {
            Some(Resource::Page { last_modified, .. } | Resource::File { last_modified, .. }) => {
                *last_modified = Some(when);
            },
            _ => panic!("MockTransport::modified_at: no page or file registered at {url}"),
        }
        self
    }

    /// Behave like a server without range support: always `200` with the
    /// full body.
    pub fn ignoring_ranges(mut self) -> Self {
        self.honour_ranges = false;
        self
    }

    /// Requests made so far for `url`.
    pub fn calls(&self, url: &str) -> Calls {
        self.lock_calls().get(&parse(url)).copied().unwrap_or_default()
    }

    pub fn total_fetches(&self) -> usize {
        self.lock_calls().values().map(|calls| calls.fetches).sum()
    }

    pub fn total_probes(&self) -> usize {
        self.lock_calls().values().map(|calls| calls.probes).sum()
    }

    /// The largest number of requests that were ever in flight at once.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    fn lock_calls(&self) -> std::sync::MutexGuard<'_, HashMap<Url, Calls>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Count the request and hold an in-flight slot until the returned guard
    /// drops. Yields once so that sibling requests awaited together all get
    /// the chance to start before any of them finishes.
    async fn begin(&self, url: &Url, probe: bool) -> InFlight<'_> {
        {
            let mut calls = self.lock_calls();
            let entry = calls.entry(url.clone()).or_default();
            match probe {
                true => entry.probes += 1,
                false => entry.fetches += 1,
            }
        }
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        let guard = InFlight(&self.in_flight);
        tokio::task::yield_now().await;
        guard
    }

    fn respond(&self, url: &Url, range: Option<ByteRange>, head: bool) -> Result<(StatusCode, HeaderMap, Bytes)> {
        let mut headers = HeaderMap::new();
        let Some(resource) = self.resources.get(url) else {
            return Ok((StatusCode::NOT_FOUND, headers, Bytes::new()));
        };
        let (status, body) = match resource {
            Resource::Unreachable => exn::bail!(ErrorKind::Network(format!("connection refused: {url}"))),
            Resource::Status(status) => (*status, Bytes::new()),
            Resource::Page { html, last_modified } => {
                insert_last_modified(&mut headers, *last_modified);
                (StatusCode::OK, html.clone())
            },
            Resource::File { data, last_modified } => {
                insert_last_modified(&mut headers, *last_modified);
                let total = data.len() as u64;
                match range.filter(|_| self.honour_ranges && !head) {
                    Some(range) if range.start() >= total => {
                        headers.insert(CONTENT_RANGE, header_value(format!("bytes */{total}")));
                        (StatusCode::RANGE_NOT_SATISFIABLE, Bytes::new())
                    },
                    Some(range) => {
                        let end = range.end().min(total);
                        let content_range = format!("bytes {}-{}/{total}", range.start(), end - 1);
                        headers.insert(CONTENT_RANGE, header_value(content_range));
                        (StatusCode::PARTIAL_CONTENT, data.slice(range.start() as usize..end as usize))
                    },
                    None => (StatusCode::OK, data.clone()),
                }
            },
        };
        // Pages are "streamed": no length is ever committed to.
        if !matches!(resource, Resource::Page { .. }) {
            headers.insert(CONTENT_LENGTH, HeaderValue::from(body.len() as u64));
        }
        let body = if head { Bytes::new() } else { body };
        Ok((status, headers, body))
    }
}

struct InFlight<'a>(&'a AtomicUsize);
impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

fn insert_last_modified(headers: &mut HeaderMap, when: Option<OffsetDateTime>) {
    if let Some(value) = when.and_then(http_date) {
        headers.insert(LAST_MODIFIED, value);
    }
}

fn header_value(value: String) -> HeaderValue {
    match HeaderValue::from_str(&value) {
        Ok(value) => value,
        Err(e) => panic!("MockTransport: invalid header value {value}: {e}"),
    }
}

#[async_trait]
impl Transport for MockTransport {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, url: &Url, range: Option<ByteRange>) -> Result<Response> {
        let _in_flight = self.begin(url, false).await;
        let (status, headers, body) = self.respond(url, range, false)?;
        Ok(Response {
            status,
            meta: ResponseMeta::from_headers(&headers),
            body,
        })
    }

    async fn probe(&self, url: &Url) -> Result<Probe> {
        let _in_flight = self.begin(url, true).await;
        let (status, headers, _) = self.respond(url, None, true)?;
        Ok(Probe {
            status,
            meta: ResponseMeta::from_headers(&headers),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use time::macros::datetime;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    fn fixture() -> MockTransport {
        MockTransport::default()
            .with_page("http://mock/", "<a href=\"data.bin\">data.bin</a>")
            .with_file("http://mock/data.bin", "0123456789")
            .with_status("http://mock/secret", StatusCode::FORBIDDEN)
            .with_unreachable("http://mock/down")
            .modified_at("http://mock/data.bin", datetime!(2024-03-01 12:00:00 UTC))
    }

    #[tokio::test]
    async fn test_page_has_no_length() {
        let transport = fixture();
        let probe = transport.probe(&url("http://mock/")).await.unwrap();
        assert_eq!(probe.status, StatusCode::OK);
        assert_eq!(probe.meta.content_length, None);
        let response = transport.fetch(&url("http://mock/"), None).await.unwrap();
        assert!(response.body.starts_with(b"<a href"));
    }

    #[tokio::test]
    async fn test_file_probe() {
        let transport = fixture();
        let probe = transport.probe(&url("http://mock/data.bin")).await.unwrap();
        assert_eq!(probe.status, StatusCode::OK);
        assert_eq!(probe.meta.content_length, Some(10));
        assert_eq!(probe.meta.last_modified, Some(datetime!(2024-03-01 12:00:00 UTC)));
    }

    #[rstest]
    #[case(0, 4, StatusCode::PARTIAL_CONTENT, b"0123".as_slice())]
    #[case(8, 4, StatusCode::PARTIAL_CONTENT, b"89".as_slice())]
    #[case(10, 4, StatusCode::RANGE_NOT_SATISFIABLE, b"".as_slice())]
    #[case(50, 1, StatusCode::RANGE_NOT_SATISFIABLE, b"".as_slice())]
    #[tokio::test]
    async fn test_file_ranges(
        #[case] start: u64,
        #[case] length: u64,
        #[case] status: StatusCode,
        #[case] expected: &[u8],
    ) {
        let transport = fixture();
        let response = transport.fetch(&url("http://mock/data.bin"), ByteRange::new(start, length)).await.unwrap();
        assert_eq!(response.status, status);
        assert_eq!(response.body.as_ref(), expected);
    }

    #[tokio::test]
    async fn test_ignoring_ranges() {
        let transport = fixture().ignoring_ranges();
        let response = transport.fetch(&url("http://mock/data.bin"), ByteRange::new(4, 2)).await.unwrap();
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body.as_ref(), b"0123456789");
    }

    #[tokio::test]
    async fn test_status_and_unknown() {
        let transport = fixture();
        let probe = transport.probe(&url("http://mock/secret")).await.unwrap();
        assert_eq!(probe.status, StatusCode::FORBIDDEN);
        let probe = transport.probe(&url("http://mock/nope")).await.unwrap();
        assert_eq!(probe.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unreachable() {
        let transport = fixture();
        let err = transport.fetch(&url("http://mock/down"), None).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Network(_)));
    }

    #[tokio::test]
    async fn test_calls_counted() {
        let transport = fixture();
        transport.fetch(&url("http://mock/"), None).await.unwrap();
        transport.fetch(&url("http://mock/"), None).await.unwrap();
        transport.probe(&url("http://mock/data.bin")).await.unwrap();
        assert_eq!(transport.calls("http://mock/"), Calls { fetches: 2, probes: 0 });
        assert_eq!(transport.calls("http://mock/data.bin"), Calls { fetches: 0, probes: 1 });
        assert_eq!(transport.calls("http://mock/never"), Calls::default());
        assert_eq!(transport.total_fetches(), 2);
        assert_eq!(transport.total_probes(), 1);
    }

    #[tokio::test]
    async fn test_peak_in_flight() {
        let transport = fixture();
        let target = url("http://mock/data.bin");
        let probes = (0..5).map(|_| transport.probe(&target));
        futures::future::join_all(probes).await;
        assert_eq!(transport.peak_in_flight(), 5);
    }
}
