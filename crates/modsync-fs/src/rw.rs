use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;

use crate::{Error, Result};

#[derive(Clone, Copy, Debug, Default)]
pub struct AtomicWriteOptions {
    pub create_parents: bool,
    pub sync:           bool,
}

impl AtomicWriteOptions {
    pub fn new() -> Self { Self::default() }

    pub fn create_parents(mut self, create_parents: bool) -> Self {
        self.create_parents = create_parents;
        self
    }

    pub fn sync(mut self, sync: bool) -> Self {
        self.sync = sync;
        self
    }
}

/// Write `content` to `path` by way of a hidden temp file in the same directory.
///
/// The previous file (if any) stays intact until the final rename.
pub fn atomic_write(path: impl AsRef<Path>, content: &[u8], options: AtomicWriteOptions) -> Result<()> {
    let path = path.as_ref();
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    if options.create_parents {
        fs::create_dir_all(parent).map_err(|e| Error::Write {
            path:   parent.to_path_buf(),
            source: e,
        })?;
    }

    let mut tmp = tempfile::Builder::new()
        .prefix(".")
        .suffix(".tmp")
        .tempfile_in(parent)
        .map_err(|e| Error::Write {
            path:   parent.to_path_buf(),
            source: e,
        })?;

    tmp.write_all(content).map_err(|e| Error::Write {
        path:   tmp.path().to_path_buf(),
        source: e,
    })?;

    if options.sync {
        tmp.as_file().sync_all().map_err(|e| Error::Write {
            path:   tmp.path().to_path_buf(),
            source: e,
        })?;
    }

    tmp.persist(path).map_err(|e| Error::Write {
        path:   path.to_path_buf(),
        source: e.error,
    })?;

    tracing::trace!(path = %path.display(), bytes = content.len(), "atomically replaced file");
    Ok(())
}

/// Read a whole file, mapping "not found" to `None`.
pub fn read_if_exists(path: impl AsRef<Path>) -> Result<Option<Vec<u8>>> {
    let path = path.as_ref();
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::Read {
            path:   path.to_path_buf(),
            source: e,
        }),
    }
}

/// Remove a file, returning whether anything was there.
pub fn remove_if_exists(path: impl AsRef<Path>) -> Result<bool> {
    let path = path.as_ref();
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::Remove {
            path:   path.to_path_buf(),
            source: e,
        }),
    }
}

/// Length of the regular file at `path`, or `None` if there is none.
pub fn file_len(path: impl AsRef<Path>) -> Option<u64> {
    fs::metadata(path.as_ref())
        .ok()
        .filter(|m| m.is_file())
        .map(|m| m.len())
}
