//! HTTP transport for webdir.
//!
//! Everything the cache layer needs from the network fits in two calls:
//! fetch a resource (optionally restricted to a byte range) and probe a
//! resource for its headers. [`Transport`] is that contract;
//! [`HttpTransport`](backend::HttpTransport) implements it with `reqwest`,
//! and `MockTransport` (behind the `mock` feature) emulates a directory
//! listing server in memory for tests.

pub mod backend;
pub mod error;
mod headers;
mod models;

pub use crate::backend::Transport;
pub use crate::models::{ByteRange, Probe, Response, ResponseMeta};
pub use http::StatusCode;
use std::sync::Arc;

pub type TransportHandle = Arc<dyn Transport + Send + Sync>;
