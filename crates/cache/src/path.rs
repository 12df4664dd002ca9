//! Path splitting for the resolver.
//!
//! Paths are `/`-separated and relative to the tree root. A single leading
//! and a single trailing separator are ignored, so `/a/b`, `a/b` and `/a/b/`
//! all name the same entry.

/// Strip at most one leading and one trailing `/`.
pub(crate) fn trim(path: &str) -> &str {
    let path = path.strip_prefix('/').unwrap_or(path);
    path.strip_suffix('/').unwrap_or(path)
}

/// Split a trimmed path into its first segment and whatever follows it.
pub(crate) fn split_first(path: &str) -> (&str, Option<&str>) {
    match path.split_once('/') {
        Some((first, rest)) => (first, Some(rest)),
        None => (path, None),
    }
}
