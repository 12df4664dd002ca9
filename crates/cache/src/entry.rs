//! A single remote object in the cache tree.

use crate::models::EntryInfo;
use crate::table::EntryTable;
use derive_more::Display;
use std::fmt;
use std::sync::Arc;
use time::OffsetDateTime;
use tokio::sync::OnceCell;
use url::Url;

/// What an [`Entry`] refers to.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// The directory record at index 0 of every [`EntryTable`].
    #[display("head")]
    Head,
    #[display("file")]
    File,
    #[display("directory")]
    Directory,
    /// Metadata probing failed; never listed and never resolvable.
    #[display("invalid")]
    Invalid,
}

impl EntryKind {
    /// Single-character tag used by table dumps.
    pub fn symbol(self) -> char {
        match self {
            Self::Head => 'H',
            Self::File => 'F',
            Self::Directory => 'D',
            Self::Invalid => 'I',
        }
    }
}

/// One remote object: a file, a directory, or a directory's head record.
///
/// Everything except the child table is fixed by the time an entry is
/// published inside an [`EntryTable`]. The child table of a directory is
/// filled in at most once, on first access, and never replaced.
pub struct Entry {
    pub(crate) name: String,
    pub(crate) url: Url,
    pub(crate) kind: EntryKind,
    pub(crate) size: u64,
    pub(crate) modified: Option<OffsetDateTime>,
    pub(crate) children: OnceCell<Arc<EntryTable>>,
}

impl Entry {
    /// The record describing the directory at `url` itself.
    pub(crate) fn head(url: Url, modified: Option<OffsetDateTime>) -> Self {
        Self {
            name: String::new(),
            url,
            kind: EntryKind::Head,
            size: 0,
            modified,
            children: OnceCell::new(),
        }
    }

    /// A freshly listed child, before any metadata has been resolved.
    pub(crate) fn child(name: String, url: Url, kind: EntryKind) -> Self {
        Self {
            name,
            url,
            kind,
            size: 0,
            modified: None,
            children: OnceCell::new(),
        }
    }

    /// Percent-decoded name. Empty for a head entry.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Absolute address of the object. Directory addresses end with `/`.
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    /// Size in bytes; `0` for anything that isn't a file.
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn modified(&self) -> Option<OffsetDateTime> {
        self.modified
    }

    /// Whether paths can descend through this entry. The root's head entry
    /// counts as a directory.
    pub fn is_dir(&self) -> bool {
        matches!(self.kind, EntryKind::Head | EntryKind::Directory)
    }

    /// The directory's table, if it has been built already.
    pub fn loaded_children(&self) -> Option<&Arc<EntryTable>> {
        self.children.get()
    }

    pub fn info(&self) -> EntryInfo {
        EntryInfo {
            name: self.name.clone(),
            kind: self.kind,
            size: self.size,
            modified: self.modified,
        }
    }
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("name", &self.name)
            .field("url", &self.url.as_str())
            .field("kind", &self.kind)
            .field("size", &self.size)
            .field("modified", &self.modified)
            .field("loaded", &self.children.initialized())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[rstest]
    #[case(EntryKind::Head, 'H', "head")]
    #[case(EntryKind::File, 'F', "file")]
    #[case(EntryKind::Directory, 'D', "directory")]
    #[case(EntryKind::Invalid, 'I', "invalid")]
    fn kind_labels(#[case] kind: EntryKind, #[case] symbol: char, #[case] display: &str) {
        assert_eq!(kind.symbol(), symbol);
        assert_eq!(kind.to_string(), display);
    }

    #[test]
    fn new_child_has_unresolved_metadata() {
        let entry = Entry::child("a.txt".into(), url("http://mock/a.txt"), EntryKind::File);
        assert_eq!(entry.size(), 0);
        assert_eq!(entry.modified(), None);
        assert!(!entry.is_dir());
        assert!(entry.loaded_children().is_none());
    }

    #[test]
    fn head_counts_as_directory() {
        let entry = Entry::head(url("http://mock/"), None);
        assert_eq!(entry.name(), "");
        assert!(entry.is_dir());
    }

    #[test]
    fn debug_omits_child_tables() {
        let entry = Entry::child("docs".into(), url("http://mock/docs/"), EntryKind::Directory);
        let debug = format!("{entry:?}");
        assert!(debug.contains("\"docs\""));
        assert!(debug.contains("loaded: false"));
    }
}
