//! Transport Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.
//!
//! Only failures that happen *before* a status line is received are errors
//! here. A `404` or a `416` is a perfectly good [`Response`](crate::Response);
//! deciding what a status means is the caller's business.

use derive_more::{Display, Error};

/// A transport error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for transport operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Connection, DNS, TLS, or redirect-limit failure.
    #[display("network error: {_0}")]
    Network(#[error(not(source))] String),
    /// The connection or the transfer took too long.
    #[display("request timed out")]
    Timeout,
    /// The client could not be constructed from the configuration, or a
    /// request could not be built.
    #[display("HTTP client error: {_0}")]
    Client(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout)
    }
}
