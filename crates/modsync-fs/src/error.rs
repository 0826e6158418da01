use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to write '{path}': {source}")]
    Write {
        path:   PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read '{path}': {source}")]
    Read {
        path:   PathBuf,
        source: std::io::Error,
    },

    #[error("failed to remove '{path}': {source}")]
    Remove {
        path:   PathBuf,
        source: std::io::Error,
    },

    #[error("failed to resolve '{path}': {source}")]
    Resolve {
        path:   PathBuf,
        source: std::io::Error,
    },

    #[error("file name '{name}' resolves to '{resolved}', outside of '{base}'")]
    PathEscape {
        name:     String,
        base:     PathBuf,
        resolved: PathBuf,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
