//! Lazily-populated cache tree mirroring a remote HTTP directory index.
//!
//! The remote side is nothing more than a web server rendering one HTML
//! index page per directory. The cache mirrors it as a tree of
//! [`EntryTable`]s, one per directory, built the first time a path inside
//! that directory is touched and kept for the lifetime of the [`Tree`].
//!
//! # Architecture
//! - **[`Entry`]**: one remote object (file, directory, or the directory's
//!   own "head" record at index 0 of its table).
//! - **[`EntryTable`]**: a directory's head plus its children, in listing
//!   order. Building one costs a fetch of the index page plus one
//!   concurrent batch of `HEAD` probes for the files it lists.
//! - **[`Tree`]**: owns the root table and the transport; resolves paths,
//!   lists directories, and reads byte ranges of files.
//!
//! Nothing is ever invalidated: a directory's table is built at most once
//! per [`Tree`]. Failures are never cached, so a directory that couldn't be
//! listed is retried on the next access.

mod entry;
pub mod error;
mod models;
mod path;
mod read;
mod resolver;
mod table;
mod tree;

pub use crate::entry::{Entry, EntryKind};
pub use crate::models::{EntryInfo, WalkItem};
pub use crate::table::EntryTable;
pub use crate::tree::Tree;
