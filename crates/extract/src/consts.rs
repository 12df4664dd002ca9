use regex::Regex;
use scraper::Selector;
use std::sync::LazyLock;

macro_rules! selector {
    ($name:ident, $css:expr) => {
        pub(crate) static $name: LazyLock<Selector> = LazyLock::new(|| Selector::parse($css).unwrap());
    };
}

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

// Every anchor that carries an address, in document order.
selector!(ANCHOR_SELECTOR, "a[href]");
// RFC 3986 `scheme ":"` prefix. Anything matching is an absolute address
// (`http://elsewhere/`, `mailto:someone`) and never a child of the listing.
regex!(SCHEME_REGEX, r"^[A-Za-z][A-Za-z0-9+.\-]*:");
