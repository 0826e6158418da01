use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Fs(#[from] modsync_fs::Error),

    #[error("failed to parse '{path}': {message}")]
    Parse { path: PathBuf, message: String },

    #[error("failed to serialize: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to fetch catalog page '{url}': {source}")]
    Fetch {
        url:    String,
        #[source]
        source: modsync_fetch::Error,
    },

    #[error("catalog page '{url}' is not a valid mod list: {source}")]
    Page {
        url:    String,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
