//! Cache models.

use crate::entry::EntryKind;
use time::OffsetDateTime;

/// A single row of a directory listing.
///
/// This is a detached snapshot of an [`Entry`](crate::Entry), suitable for
/// handing to a filesystem adapter or printing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    /// Percent-decoded name, unique within its directory.
    pub name: String,
    pub kind: EntryKind,
    /// Size in bytes. Always `0` for directories.
    pub size: u64,
    /// Last modified timestamp reported by the server, if any.
    pub modified: Option<OffsetDateTime>,
}

/// One step of a depth-first [`Tree::walk`](crate::Tree::walk).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkItem {
    /// Root-relative path, always starting with `/`.
    pub path: String,
    /// `1` for the children of the directory the walk started from.
    pub depth: usize,
    pub info: EntryInfo,
}
