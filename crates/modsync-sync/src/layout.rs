//! Where artifacts live inside the download directory.

use std::path::{Path, PathBuf};

use modsync_catalog::ModFile;

/// A file on disk that belongs to the current sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalArtifact {
    pub path: PathBuf,
    pub size: u64,
}

/// Maps catalog files to paths directly inside one root directory.
#[derive(Debug, Clone)]
pub struct ArtifactLayout {
    root: PathBuf,
}

impl ArtifactLayout {
    /// The root is made absolute and normalized once, so every path handed out
    /// compares equal to the entries the reconciler enumerates.
    pub fn new(root: impl AsRef<Path>) -> modsync_fs::Result<Self> {
        let root = root.as_ref();
        let absolute = std::path::absolute(root).map_err(|source| modsync_fs::Error::Resolve {
            path: root.to_path_buf(),
            source,
        })?;
        Ok(Self {
            root: modsync_fs::normalize_path(&absolute),
        })
    }

    pub fn root(&self) -> &Path { &self.root }

    /// Fails with [`modsync_fs::Error::PathEscape`] when the name would land
    /// anywhere but directly inside the root.
    pub fn path_for(&self, file: &ModFile) -> modsync_fs::Result<PathBuf> {
        modsync_fs::contained_path(&self.root, &file.name)
    }

    /// The artifact at `path`, if it exists with exactly the declared size.
    ///
    /// A file without a declared size is never considered present.
    pub fn artifact_at(&self, path: &Path, file: &ModFile) -> Option<LocalArtifact> {
        let declared = file.size?;
        let size = modsync_fs::file_len(path)?;
        (size == declared).then(|| LocalArtifact {
            path: path.to_path_buf(),
            size,
        })
    }

    pub fn local_artifact(&self, file: &ModFile) -> Option<LocalArtifact> {
        let path = self.path_for(file).ok()?;
        self.artifact_at(&path, file)
    }

    pub fn is_present(&self, file: &ModFile) -> bool { self.local_artifact(file).is_some() }
}
