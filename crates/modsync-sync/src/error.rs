use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(Box<figment::Error>),

    #[error("failed to prepare download directory '{path}': {source}")]
    Directory {
        path:   PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to persist probe decisions: {0}")]
    PersistCache(#[source] modsync_fs::Error),

    #[error("failed to encode probe decisions: {0}")]
    EncodeCache(#[from] serde_json::Error),

    #[error("failed to persist catalog snapshot: {0}")]
    PersistSnapshot(#[source] modsync_catalog::Error),

    #[error(transparent)]
    Fs(#[from] modsync_fs::Error),

    #[error("sync cancelled")]
    Cancelled,
}

impl From<figment::Error> for Error {
    fn from(e: figment::Error) -> Self { Error::Config(Box::new(e)) }
}

pub type Result<T> = std::result::Result<T, Error>;
