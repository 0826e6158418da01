//! Removal of artifacts that are no longer part of the catalog.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// An artifact that should have been deleted but is still on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedRemoval {
    pub path:   PathBuf,
    pub reason: String,
}

/// What a reconcile pass did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReconcileReport {
    pub removed: Vec<PathBuf>,
    pub failed:  Vec<FailedRemoval>,
    pub kept:    usize,
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}

/// Delete every regular `*.extension` file directly inside `dir` whose path
/// is not in `keep`.
///
/// Paths in `keep` must be absolute and normalized, as handed out by
/// [`ArtifactLayout`](crate::ArtifactLayout). Files with other extensions and
/// subdirectories are never touched. A file that cannot be deleted is logged
/// and reported, and the pass carries on.
pub fn reconcile(dir: &Path, keep: &HashSet<PathBuf>, extension: &str) -> modsync_fs::Result<ReconcileReport> {
    let absolute = std::path::absolute(dir).map_err(|source| modsync_fs::Error::Resolve {
        path: dir.to_path_buf(),
        source,
    })?;
    let dir = modsync_fs::normalize_path(&absolute);
    let entries = fs::read_dir(&dir).map_err(|source| modsync_fs::Error::Read {
        path: dir.clone(),
        source,
    })?;

    let mut report = ReconcileReport::default();
    for entry in entries {
        let entry = entry.map_err(|source| modsync_fs::Error::Read {
            path: dir.clone(),
            source,
        })?;
        let path = dir.join(entry.file_name());

        if !entry.file_type().is_ok_and(|t| t.is_file()) || !has_extension(&path, extension) {
            continue;
        }
        if keep.contains(&path) {
            report.kept += 1;
            continue;
        }

        tracing::info!(path = %path.display(), "deleting artifact no longer in the catalog");
        match fs::remove_file(&path) {
            Ok(()) => report.removed.push(path),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to delete artifact");
                report.failed.push(FailedRemoval {
                    path,
                    reason: e.to_string(),
                });
            }
        }
    }

    report.removed.sort();
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn removes_only_unkept_artifacts() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        for name in ["keep.zip", "stale.zip", "LOUD.ZIP", "notes.txt", modsync_catalog::Blacklist::FILE_NAME] {
            std::fs::write(root.join(name), b"x").unwrap();
        }
        std::fs::create_dir(root.join("nested.zip")).unwrap();

        let keep: HashSet<_> = [root.join("keep.zip")].into_iter().collect();
        let report = reconcile(root, &keep, "zip").unwrap();

        assert_eq!(report.removed, vec![root.join("LOUD.ZIP"), root.join("stale.zip")]);
        assert_eq!(report.kept, 1);
        assert!(report.failed.is_empty());
        assert!(root.join("keep.zip").exists());
        assert!(root.join("notes.txt").exists());
        assert!(root.join(modsync_catalog::Blacklist::FILE_NAME).exists());
        assert!(root.join("nested.zip").is_dir());
    }

    #[test]
    fn empty_keep_set_clears_all_artifacts() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("a.zip"), b"x").unwrap();
        std::fs::write(dir.path().join("b.zip"), b"x").unwrap();

        let report = reconcile(dir.path(), &HashSet::new(), "zip").unwrap();

        assert_eq!(report.removed.len(), 2);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn undeletable_artifact_is_reported() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let locked = dir.path().join("locked");
        std::fs::create_dir(&locked).unwrap();
        std::fs::write(locked.join("stale.zip"), b"x").unwrap();
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o555)).unwrap();
        // root ignores directory permissions
        let privileged = std::fs::write(locked.join("canary"), b"").is_ok();

        let report = reconcile(&locked, &HashSet::new(), "zip").unwrap();
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();
        if privileged {
            return;
        }

        assert!(report.removed.is_empty());
        assert_eq!(report.failed.len(), 1);
        assert!(report.failed[0].path.ends_with("stale.zip"));
        assert!(locked.join("stale.zip").exists());
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(reconcile(&dir.path().join("absent"), &HashSet::new(), "zip").is_err());
    }
}
