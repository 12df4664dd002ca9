//! Transport trait and implementations.
//!
//! This module defines the [`Transport`] trait, the single seam between the
//! cache layer and the network.

mod reqwest_client;
#[cfg(feature = "mock")]
mod mock;

pub use self::reqwest_client::HttpTransport;
#[cfg(feature = "mock")]
pub use self::mock::MockTransport;
use crate::error::Result;
use crate::models::{ByteRange, Probe, Response};
use async_trait::async_trait;
use url::Url;

/// Unified interface for issuing requests against a directory server.
///
/// Implementations only fail for problems that prevent a status line from
/// being received (connection refused, DNS, TLS, timeouts, too many
/// redirects). Every status code, including errors, comes back as a value.
///
/// # Concurrency
/// All methods take `&self`. Callers are free to have many requests in
/// flight on the same transport at once (the metadata resolver issues one
/// probe per file in a directory and awaits them together); implementations
/// are responsible for any limit on parallelism.
///
/// # Examples
///
/// ```no_run
/// use url::Url;
/// use webdir_transport::{ByteRange, Transport, error::Result};
///
/// async fn first_kilobyte(transport: &dyn Transport, url: &Url) -> Result<usize> {
///     let response = transport.fetch(url, ByteRange::new(0, 1024)).await?;
///     Ok(response.body.len())
/// }
/// ```
#[async_trait]
pub trait Transport: Send + Sync {
    /// Name of the transport, used for logging only.
    fn name(&self) -> &str;

    /// Fetch a resource, body included.
    ///
    /// With `range` set, a `Range` header is sent. Servers are free to
    /// ignore it (status `200`, body from the start of the resource),
    /// honour it (`206`), or reject it (`416` when the range starts at or
    /// beyond the end of the resource). For a `200` answer, implementations
    /// may stop reading once the end of the range has arrived, so the body
    /// can be shorter than the resource.
    async fn fetch(&self, url: &Url, range: Option<ByteRange>) -> Result<Response>;

    /// Request a resource's headers without its body (`HEAD`).
    async fn probe(&self, url: &Url) -> Result<Probe>;
}
