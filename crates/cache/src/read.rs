//! Ranged reads of file content.

use crate::entry::Entry;
use crate::error::{ErrorKind, Result};
use bytes::Bytes;
use exn::ResultExt;
use tracing::instrument;
use webdir_transport::{ByteRange, StatusCode, Transport};

/// Read up to `length` bytes of `entry` starting at `offset`.
///
/// May return fewer bytes than requested; returns none at all when `offset`
/// is at or past the end. A zero `length` never reaches the network.
#[instrument(level = "debug", skip(transport, entry), fields(url = %entry.url()))]
pub(crate) async fn read_range(transport: &dyn Transport, entry: &Entry, offset: u64, length: usize) -> Result<Bytes> {
    let Some(range) = ByteRange::new(offset, length as u64) else {
        return Ok(Bytes::new());
    };
    let url = entry.url();
    let response = transport
        .fetch(url, Some(range))
        .await
        .or_raise(|| ErrorKind::TransportFailure(url.to_string()))?;
    let body = match response.status {
        StatusCode::PARTIAL_CONTENT => response.body,
        StatusCode::RANGE_NOT_SATISFIABLE => Bytes::new(),
        // Range ignored: the whole file came back.
        StatusCode::OK => {
            let start = usize::try_from(offset).unwrap_or(usize::MAX).min(response.body.len());
            response.body.slice(start..)
        },
        status => exn::bail!(ErrorKind::RemoteRejected {
            url: url.to_string(),
            status: status.as_u16(),
        }),
    };
    let received = body.len().min(length);
    tracing::debug!(requested = length, received, "Read range");
    Ok(body.slice(..received))
}
