//! The cache tree and its path-based operations.

use crate::entry::{Entry, EntryKind};
use crate::error::{Error, ErrorKind, Result};
use crate::models::{EntryInfo, WalkItem};
use crate::path;
use crate::read::read_range;
use crate::table::EntryTable;
use async_stream::stream;
use bytes::Bytes;
use exn::{OptionExt, ResultExt};
use futures::Stream;
use std::sync::Arc;
use tracing::instrument;
use url::Url;
use webdir_transport::TransportHandle;

/// A lazily-populated mirror of a remote directory index.
///
/// The root table is built by [`Tree::connect`]; every other directory is
/// listed the first time a path inside it is resolved, and kept for the
/// lifetime of the tree. Concurrent first accesses to the same directory
/// share a single construction. Nothing is ever invalidated.
///
/// # Examples
///
/// ```no_run
/// use url::Url;
/// use webdir_cache::Tree;
/// use webdir_transport::TransportHandle;
///
/// # async fn example(transport: TransportHandle) -> Result<(), Box<dyn std::error::Error>> {
/// let tree = Tree::connect(&Url::parse("https://mirror.example/pub/")?, transport).await?;
/// for entry in tree.list_children("/").await? {
///     println!("{} {}", entry.kind, entry.name);
/// }
/// let _readme = tree.read("/README", 0, 512).await?;
/// # Ok(())
/// # }
/// ```
pub struct Tree {
    root: Arc<EntryTable>,
    transport: TransportHandle,
}

impl Tree {
    /// List the root directory and return a tree ready for use.
    ///
    /// Unlike every other directory, a failure to list the root is returned
    /// to the caller: there is nothing to serve without it.
    #[instrument(skip(base_url, transport), fields(url = %base_url, transport = transport.name()))]
    pub async fn connect(base_url: &Url, transport: TransportHandle) -> Result<Self> {
        let root = EntryTable::build(transport.as_ref(), base_url).await?;
        tracing::info!(entries = root.len(), "Connected");
        Ok(Self {
            root: Arc::new(root),
            transport,
        })
    }

    pub fn root(&self) -> &Arc<EntryTable> {
        &self.root
    }

    /// Address of the root directory, with a trailing `/`.
    pub fn base_url(&self) -> &Url {
        self.root.head().url()
    }

    /// Find the entry at `path`, listing any directories along the way that
    /// haven't been listed yet.
    ///
    /// The empty path (or `/`) resolves to the root's head entry. A single
    /// leading and trailing `/` are ignored, so `/a/b/`, `/a/b` and `a/b`
    /// resolve to the same entry.
    ///
    /// # Errors
    ///
    /// [`NotFound`](ErrorKind::NotFound) if a segment isn't listed, names a
    /// file where a directory is needed, or names a directory whose listing
    /// couldn't be built. The construction failure, if any, is attached as
    /// a child of the error.
    #[instrument(level = "debug", skip(self))]
    pub async fn resolve(&self, path: &str) -> Result<Arc<Entry>> {
        let mut remaining = path::trim(path);
        if remaining.is_empty() {
            return Ok(Arc::clone(self.root.head()));
        }
        let mut table = Arc::clone(&self.root);
        loop {
            let (segment, rest) = path::split_first(remaining);
            let entry = Arc::clone(table.find(segment).ok_or_raise(|| ErrorKind::NotFound(path.to_string()))?);
            let Some(rest) = rest else {
                return Ok(entry);
            };
            table = self.children_of(&entry).await.or_raise(|| ErrorKind::NotFound(path.to_string()))?;
            remaining = path::trim(rest);
        }
    }

    /// Snapshot of the valid children of the directory at `path`, in
    /// listing order.
    pub async fn list_children(&self, path: &str) -> Result<Vec<EntryInfo>> {
        let table = self.directory(path).await?;
        Ok(table.children().map(|entry| entry.info()).collect())
    }

    /// The table of the directory at `path`, built now if necessary.
    pub async fn directory(&self, path: &str) -> Result<Arc<EntryTable>> {
        if path::trim(path).is_empty() {
            return Ok(Arc::clone(&self.root));
        }
        let entry = self.resolve(path).await?;
        if entry.kind() != EntryKind::Directory {
            exn::bail!(ErrorKind::NotADirectory(path.to_string()));
        }
        self.children_of(&entry).await.or_raise(|| ErrorKind::NotFound(path.to_string()))
    }

    /// Read up to `length` bytes of the file at `path`, starting at `offset`.
    ///
    /// Fewer than `length` bytes may come back even before the end of the
    /// file, when the server splits its answer. Callers wanting a whole range
    /// keep reading from the new offset until the result is empty; reading at
    /// or past the end always returns no bytes.
    pub async fn read(&self, path: &str, offset: u64, length: usize) -> Result<Bytes> {
        let entry = self.resolve(path).await?;
        if entry.kind() != EntryKind::File {
            exn::bail!(ErrorKind::NotAFile(path.to_string()));
        }
        read_range(self.transport.as_ref(), &entry, offset, length).await
    }

    /// [`Tree::read`] for an entry that has already been resolved.
    pub async fn read_entry(&self, entry: &Entry, offset: u64, length: usize) -> Result<Bytes> {
        if entry.kind() != EntryKind::File {
            exn::bail!(ErrorKind::NotAFile(entry.url().to_string()));
        }
        read_range(self.transport.as_ref(), entry, offset, length).await
    }

    /// Fill as much of `buf` as the file allows, starting at `offset`.
    /// Returns the number of bytes written.
    pub async fn read_into(&self, path: &str, buf: &mut [u8], offset: u64) -> Result<usize> {
        let bytes = self.read(path, offset, buf.len()).await?;
        buf[..bytes.len()].copy_from_slice(&bytes);
        Ok(bytes.len())
    }

    /// Depth-first walk below the directory at `path`, in listing order.
    ///
    /// Directories deeper than `max_depth` are yielded but not listed. A
    /// subdirectory that can't be listed yields an error and the walk moves
    /// on to its siblings.
    pub fn walk<'a>(
        &'a self,
        path: &'a str,
        max_depth: Option<usize>,
    ) -> impl Stream<Item = Result<WalkItem>> + Send + 'a {
        stream! {
            let table = match self.directory(path).await {
                Ok(table) => table,
                Err(err) => {
                    yield Err(err);
                    return;
                },
            };
            let base = format!("/{}", path::trim(path));
            let mut stack = Vec::new();
            push_children(&mut stack, &table, &base, 1);

            while let Some((path, depth, entry)) = stack.pop() {
                yield Ok(WalkItem {
                    path: path.clone(),
                    depth,
                    info: entry.info(),
                });
                if entry.kind() != EntryKind::Directory || max_depth.is_some_and(|max| depth >= max) {
                    continue;
                }
                match self.children_of(&entry).await {
                    Ok(table) => push_children(&mut stack, &table, &path, depth + 1),
                    Err(err) => yield Err(err),
                }
            }
        }
    }

    /// The child table of a directory entry, built at most once.
    async fn children_of(&self, entry: &Entry) -> Result<Arc<EntryTable>> {
        if entry.kind() != EntryKind::Directory {
            exn::bail!(ErrorKind::NotADirectory(entry.url().to_string()));
        }
        let table = entry
            .children
            .get_or_try_init(|| async {
                let table = EntryTable::build(self.transport.as_ref(), entry.url()).await?;
                tracing::info!(url = %entry.url(), entries = table.len(), "Listed directory");
                Ok::<_, Error>(Arc::new(table))
            })
            .await?;
        Ok(Arc::clone(table))
    }
}

/// Push a table's children so that popping yields them in listing order.
fn push_children(stack: &mut Vec<(String, usize, Arc<Entry>)>, table: &EntryTable, base: &str, depth: usize) {
    let base = base.strip_suffix('/').unwrap_or(base);
    let children: Vec<_> = table.children().collect();
    for entry in children.into_iter().rev() {
        stack.push((format!("{base}/{}", entry.name()), depth, Arc::clone(entry)));
    }
}
