//! Classification of a single listing anchor.

use crate::consts;
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use percent_encoding::percent_decode_str;

/// What a listing anchor points at, judged purely from its address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LinkKind {
    /// Address does not end with a separator.
    File,
    /// Address ends with a separator.
    Directory,
}

/// An anchor accepted from a directory listing.
///
/// The address is kept exactly as it appeared in the markup (still
/// percent-encoded, trailing separator intact) so that it can be joined onto
/// the listing's own address without losing information.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Link {
    href: String,
    kind: LinkKind,
}
impl Link {
    /// Classify an anchor address, returning `None` for anything that is not
    /// a child of the listing it appeared in.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use webdir_extract::{Link, LinkKind};
    ///
    /// assert_eq!(Link::classify("docs/").map(|l| l.kind()), Some(LinkKind::Directory));
    /// assert_eq!(Link::classify("readme.txt").map(|l| l.kind()), Some(LinkKind::File));
    /// // Parent, sort-order, and off-site links are all rejected.
    /// assert!(Link::classify("../").is_none());
    /// assert!(Link::classify("?C=N;O=D").is_none());
    /// assert!(Link::classify("https://example.com/").is_none());
    /// ```
    pub fn classify(href: &str) -> Option<Self> {
        // The name has to start with an alphanumeric character. Servers that
        // list awkward names prefix them with `./` so they still parse as
        // relative references; those are skipped along with `../` and `?C=`.
        if !href.chars().next().is_some_and(char::is_alphanumeric) {
            return None;
        }
        if consts::SCHEME_REGEX.is_match(href) {
            return None;
        }
        let kind = match href.ends_with('/') {
            true => LinkKind::Directory,
            false => LinkKind::File,
        };
        Some(Self { href: href.to_string(), kind })
    }

    /// The address exactly as written in the listing.
    pub fn href(&self) -> &str {
        &self.href
    }

    pub fn kind(&self) -> LinkKind {
        self.kind
    }

    /// The entry name this link introduces: trailing separator removed, then
    /// percent-decoded.
    ///
    /// # Errors
    ///
    /// Returns [`Malformed`](ErrorKind::Malformed) if the decoded name is not
    /// UTF-8, is empty, or still contains a separator (a nested address such
    /// as `a/b.txt` can never be reached one path segment at a time).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use webdir_extract::Link;
    ///
    /// let link = Link::classify("My%20Photos/").unwrap();
    /// assert_eq!(link.name().unwrap(), "My Photos");
    /// ```
    pub fn name(&self) -> Result<String> {
        let trimmed = self.href.strip_suffix('/').unwrap_or(&self.href);
        let decoded = percent_decode_str(trimmed)
            .decode_utf8()
            .or_raise(|| ErrorKind::Malformed(self.href.clone()))?;
        if decoded.is_empty() || decoded.contains('/') {
            exn::bail!(ErrorKind::Malformed(self.href.clone()));
        }
        Ok(decoded.into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("readme.txt", LinkKind::File)]
    #[case("2024-01-01.log", LinkKind::File)]
    #[case("docs/", LinkKind::Directory)]
    #[case("My%20Photos/", LinkKind::Directory)]
    #[case("Ünïcode.bin", LinkKind::File)]
    fn test_classify_accepts(#[case] href: &str, #[case] expected: LinkKind) {
        let link = Link::classify(href).unwrap();
        assert_eq!(link.kind(), expected);
        assert_eq!(link.href(), href);
    }

    #[rstest]
    #[case("")]
    #[case("/")]
    #[case("../")]
    #[case("./weird:name.txt")]
    #[case("?C=M;O=A")]
    #[case("#top")]
    #[case("/absolute/path/")]
    #[case("http://elsewhere/x")]
    #[case("https://elsewhere/x/")]
    #[case("HTTPS://ELSEWHERE/")]
    #[case("ftp://mirror.example.org/pub/")]
    #[case("mailto:webmaster@example.org")]
    fn test_classify_rejects(#[case] href: &str) {
        assert!(Link::classify(href).is_none());
    }

    #[rstest]
    #[case("readme.txt", "readme.txt")]
    #[case("docs/", "docs")]
    #[case("a%20b.txt", "a b.txt")]
    #[case("caf%C3%A9/", "café")]
    #[case("100%25.txt", "100%.txt")]
    fn test_name(#[case] href: &str, #[case] expected: &str) {
        assert_eq!(Link::classify(href).unwrap().name().unwrap(), expected);
    }

    #[rstest]
    #[case("a/b.txt")]
    #[case("a%2Fb")]
    #[case("bad%FF.txt")]
    fn test_name_malformed(#[case] href: &str) {
        let err = Link::classify(href).unwrap().name().unwrap_err();
        assert!(matches!(&*err, ErrorKind::Malformed(_)));
    }
}
