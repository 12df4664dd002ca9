//! Hyperlink extraction for HTTP directory index pages.
//!
//! Web servers with directory indexing enabled (Apache `mod_autoindex`,
//! nginx `autoindex`, `python -m http.server`, ...) render each directory as
//! an HTML page full of anchors. This crate turns such a page into an ordered
//! list of [`Link`]s, each classified as a file or a directory, dropping
//! anything that can't be a child of the listing: sort-order links, parent
//! links, and links to other sites.

mod consts;
pub mod error;
mod extract;
mod link;

pub use crate::extract::{Extractor, extract};
pub use crate::link::{Link, LinkKind};
