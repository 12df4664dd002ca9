//! Cache Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. Failures from the transport crate
//! are kept as child frames underneath these.

use derive_more::{Display, Error};

/// A cache error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for cache operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A path segment isn't in its directory's listing, or one of the
    /// directories along the way couldn't be listed.
    #[display("not found: {_0}")]
    NotFound(#[error(not(source))] String),
    /// A listing was requested for something that isn't a directory.
    #[display("not a directory: {_0}")]
    NotADirectory(#[error(not(source))] String),
    /// Content was requested for something that isn't a file.
    #[display("not a file: {_0}")]
    NotAFile(#[error(not(source))] String),
    /// The request failed before any status was received.
    #[display("transfer failed: {_0}")]
    TransportFailure(#[error(not(source))] String),
    /// The server answered with a status we can't use.
    #[display("{url} answered HTTP {status}")]
    RemoteRejected {
        /// Address that was requested.
        url: String,
        /// Status code received.
        status: u16,
    },
    /// A listing link couldn't be turned into an entry name or address.
    #[display("malformed entry: {_0}")]
    Malformed(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::TransportFailure(_) => true,
            Self::RemoteRejected { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn error_kind_display() {
        let rejected = ErrorKind::RemoteRejected {
            url: "http://mock/x".to_string(),
            status: 403,
        };
        assert_eq!(rejected.to_string(), "http://mock/x answered HTTP 403");
        assert_eq!(ErrorKind::NotFound("/a/b".to_string()).to_string(), "not found: /a/b");
    }

    #[rstest]
    #[case(ErrorKind::TransportFailure(String::new()), true)]
    #[case(ErrorKind::RemoteRejected { url: String::new(), status: 503 }, true)]
    #[case(ErrorKind::RemoteRejected { url: String::new(), status: 404 }, false)]
    #[case(ErrorKind::NotFound(String::new()), false)]
    #[case(ErrorKind::Malformed(String::new()), false)]
    fn error_kind_retryable(#[case] kind: ErrorKind, #[case] expected: bool) {
        assert_eq!(kind.is_retryable(), expected);
    }
}
