//! Metadata resolution for freshly listed files.
//!
//! An index page only tells us names. Sizes and timestamps come from one
//! `HEAD` probe per file, and the probes for a table are all awaited
//! together so the table costs one round-trip of latency rather than one per
//! file. The transport decides how many of them are really in flight.

use crate::entry::{Entry, EntryKind};
use crate::table::directory_url;
use futures::future::join_all;
use tracing::instrument;
use webdir_transport::error::Result;
use webdir_transport::{Probe, StatusCode, Transport};

/// Probe every file in `entries` whose size is still unknown and record the
/// outcome on it.
///
/// Never fails as a whole: an entry whose probe fails is marked
/// [`EntryKind::Invalid`] and its siblings are unaffected.
#[instrument(level = "debug", skip_all, fields(transport = transport.name()))]
pub(crate) async fn resolve_metadata(transport: &dyn Transport, entries: &mut [Entry]) {
    let pending: Vec<usize> = entries
        .iter()
        .enumerate()
        .filter(|(_, entry)| entry.kind == EntryKind::File && entry.size == 0)
        .map(|(index, _)| index)
        .collect();
    if pending.is_empty() {
        return;
    }
    tracing::debug!(count = pending.len(), "Probing files");
    let outcomes = join_all(pending.iter().map(|&index| transport.probe(&entries[index].url))).await;
    for (index, outcome) in pending.into_iter().zip(outcomes) {
        apply(&mut entries[index], outcome);
    }
}

/// Record a probe outcome on a single entry.
///
/// * `200` with a length: a file of that size.
/// * `200` without a length: the server is generating the response, so the
///   "file" is really a directory whose link lacked a trailing slash.
/// * any other status, or a transport failure: invalid.
pub(crate) fn apply(entry: &mut Entry, outcome: Result<Probe>) {
    let probe = match outcome {
        Ok(probe) => probe,
        Err(err) => {
            tracing::warn!(url = %entry.url, error = ?err, "Probe failed");
            entry.kind = EntryKind::Invalid;
            return;
        },
    };
    if probe.status != StatusCode::OK {
        tracing::debug!(url = %entry.url, status = probe.status.as_u16(), "Probe rejected");
        entry.kind = EntryKind::Invalid;
        return;
    }
    entry.modified = probe.meta.last_modified;
    match probe.meta.content_length {
        Some(length) => entry.size = length,
        None => {
            tracing::debug!(url = %entry.url, "No length reported, treating as directory");
            entry.kind = EntryKind::Directory;
            entry.size = 0;
            entry.url = directory_url(&entry.url);
        },
    }
}
