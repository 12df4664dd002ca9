//! CLI Error Types

use derive_more::{Display, Error};

pub type Error = exn::Exn<ErrorKind>;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    #[display("configuration error")]
    Config,
    #[display("failed to set up the HTTP client")]
    Transport,
    #[display("could not list the root directory {_0}")]
    Connect(#[error(not(source))] String),
    #[display("{_0} failed")]
    Command(#[error(not(source))] &'static str),
    #[display("failed to write output")]
    Output,
}
