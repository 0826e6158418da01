//! Error types for modsync-fetch.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("network error: {0}")]
    Network(String),

    #[error("file I/O error on '{path}': {source}")]
    Io {
        path:   PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("destination '{0}' has no parent directory")]
    NoParent(PathBuf),

    #[error("operation cancelled")]
    Cancelled,
}

impl Error {
    pub(crate) fn network<E: std::error::Error>(e: E) -> Self { Error::Network(e.to_string()) }

    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Error::Io { path, source }
    }

    /// Whether another attempt could reasonably succeed.
    pub fn is_transient(&self) -> bool { matches!(self, Error::Network(_) | Error::Io { .. }) }
}

pub type Result<T> = std::result::Result<T, Error>;
