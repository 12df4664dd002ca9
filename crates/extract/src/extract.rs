//! Listing extraction from a parsed HTML document.

use crate::consts;
use crate::link::Link;
use scraper::Html;
use tracing::instrument;

/// Top-level entrypoint: parse raw index page bytes and return every
/// accepted [`Link`], in document order.
///
/// Accepts raw bytes, instead of requiring HTML to be valid UTF-8. Invalid
/// byte sequences are replaced with U+FFFD during parsing, which only affects
/// hrefs that were never going to decode anyway.
#[instrument(skip(html), fields(html_size = html.as_ref().len()))]
pub fn extract(html: impl AsRef<[u8]>) -> Vec<Link> {
    Extractor::from_bytes(html.as_ref()).links()
}

#[derive(Debug)]
pub struct Extractor {
    document: Html,
}
impl Extractor {
    pub fn from_document(document: Html) -> Self {
        Self { document }
    }

    pub fn from_html(html: &str) -> Self {
        Self::from_document(Html::parse_document(html))
    }

    pub fn from_bytes(html: &[u8]) -> Self {
        Self::from_html(&String::from_utf8_lossy(html))
    }

    /// Walk every anchor carrying an `href` and keep the ones that name a
    /// child of this listing. Rejected anchors are dropped silently.
    pub fn links(&self) -> Vec<Link> {
        let mut links = Vec::new();
        for element in self.document.select(&consts::ANCHOR_SELECTOR) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };
            match Link::classify(href) {
                Some(link) => links.push(link),
                None => tracing::trace!(href, "Ignoring anchor"),
            }
        }
        links
    }
}
