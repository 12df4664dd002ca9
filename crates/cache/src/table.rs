//! Entry tables: one per directory.

use crate::entry::{Entry, EntryKind};
use crate::error::{ErrorKind, Result};
use crate::resolver::resolve_metadata;
use exn::ResultExt;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tracing::instrument;
use url::Url;
use webdir_extract::{Link, LinkKind};
use webdir_transport::{StatusCode, Transport};

/// The address of a directory, with the trailing `/` that relative links
/// inside its index page are resolved against.
pub(crate) fn directory_url(url: &Url) -> Url {
    let mut url = url.clone();
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/// A directory's head entry followed by its children in listing order.
///
/// Tables are immutable once built; only the child tables of the directory
/// entries they contain are filled in later.
pub struct EntryTable {
    entries: Vec<Arc<Entry>>,
}

impl EntryTable {
    /// Fetch and parse the index page at `url`, then resolve the metadata of
    /// every file it lists.
    ///
    /// Fails if the page couldn't be fetched or didn't come back `200 OK`.
    /// Problems with individual links or probes never fail the table: the
    /// offending link is dropped, or the entry is marked invalid.
    #[instrument(level = "debug", skip(transport, url), fields(url = %url))]
    pub(crate) async fn build(transport: &dyn Transport, url: &Url) -> Result<Self> {
        let url = directory_url(url);
        let response = transport
            .fetch(&url, None)
            .await
            .or_raise(|| ErrorKind::TransportFailure(url.to_string()))?;
        if response.status != StatusCode::OK {
            exn::bail!(ErrorKind::RemoteRejected {
                url: url.to_string(),
                status: response.status.as_u16(),
            });
        }

        let head = Entry::head(url.clone(), response.meta.last_modified);
        let mut entries = vec![head];
        let mut seen = HashSet::new();
        for link in webdir_extract::extract(&response.body) {
            match child(&url, &link) {
                Ok(entry) if seen.insert(entry.name.clone()) => entries.push(entry),
                Ok(entry) => tracing::debug!(name = %entry.name, "Skipping duplicate entry"),
                Err(err) => tracing::debug!(href = link.href(), error = ?err, "Skipping malformed link"),
            }
        }

        // Index pages carry no per-directory timestamps; subdirectories
        // inherit the listing's own.
        let modified = response.meta.last_modified;
        for entry in entries.iter_mut().filter(|entry| entry.kind == EntryKind::Directory) {
            entry.modified = modified;
        }
        resolve_metadata(transport, &mut entries[1..]).await;

        let table = Self {
            entries: entries.into_iter().map(Arc::new).collect(),
        };
        tracing::debug!("Built entry table:\n{table}");
        Ok(table)
    }

    /// The entry describing this directory itself.
    pub fn head(&self) -> &Arc<Entry> {
        &self.entries[0]
    }

    /// Children that can be listed and resolved, in listing order.
    pub fn children(&self) -> impl Iterator<Item = &Arc<Entry>> {
        self.entries[1..].iter().filter(|entry| entry.kind != EntryKind::Invalid)
    }

    /// Look up a child by its decoded name.
    pub fn find(&self, name: &str) -> Option<&Arc<Entry>> {
        self.children().find(|entry| entry.name == name)
    }

    /// Number of entries, including the head and any invalid ones.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`: every table has a head entry.
    pub fn is_empty(&self) -> bool {
        false
    }
}

fn child(base: &Url, link: &Link) -> Result<Entry> {
    let name = link.name().or_raise(|| ErrorKind::Malformed(link.href().to_string()))?;
    let url = base.join(link.href()).or_raise(|| ErrorKind::Malformed(link.href().to_string()))?;
    let kind = match link.kind() {
        LinkKind::File => EntryKind::File,
        LinkKind::Directory => EntryKind::Directory,
    };
    Ok(Entry::child(name, url, kind))
}

impl fmt::Display for EntryTable {
    /// One line per entry: index, kind, size, name and address.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, entry) in self.entries.iter().enumerate() {
            writeln!(
                f,
                "{index:>4} {} {:>12} {:<32} {}",
                entry.kind.symbol(),
                entry.size,
                entry.name,
                entry.url
            )?;
        }
        Ok(())
    }
}

impl fmt::Debug for EntryTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.iter()).finish()
    }
}
