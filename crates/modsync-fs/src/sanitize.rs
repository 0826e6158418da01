use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Characters that are rejected in a file name on at least one supported platform.
const INVALID_FILE_NAME_CHARS: &[char] = &['"', '<', '>', '|', ':', '*', '?', '\\', '/'];

/// Replace characters that cannot appear in a file name with `_`.
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_control() || INVALID_FILE_NAME_CHARS.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect()
}

/// Resolve `name` (after sanitizing) against `base` and make sure the result
/// is strictly inside `base`.
///
/// `base` is made absolute first, so the returned path is always absolute.
/// Names such as `..` or `.` that survive sanitizing are rejected here.
pub fn contained_path(base: impl AsRef<Path>, name: &str) -> Result<PathBuf> {
    let base = base.as_ref();
    let absolute = std::path::absolute(base).map_err(|e| Error::Resolve {
        path:   base.to_path_buf(),
        source: e,
    })?;
    let base = normalize_path(&absolute);
    let resolved = normalize_path(&base.join(sanitize_file_name(name)));

    if resolved == base || !resolved.starts_with(&base) {
        return Err(Error::PathEscape {
            name: name.to_string(),
            base,
            resolved,
        });
    }

    Ok(resolved)
}

/// Lexically resolve `.` and `..` components without touching the filesystem.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();

    for component in path.components() {
        match component {
            Component::ParentDir => {
                result.pop();
            }
            Component::Normal(part) => result.push(part),
            Component::RootDir => result.push(component.as_os_str()),
            Component::Prefix(prefix) => result.push(prefix.as_os_str()),
            Component::CurDir => {}
        }
    }

    result
}
