//! Picks the one file of a mod that the sync should track.

use crate::model::{Mod, ModFile};

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// A file is eligible when its URL is trusted, it ships the loader manifest
/// and its name contains none of the `banned` substrings (case-insensitive).
pub fn is_eligible(file: &ModFile, banned: &[String]) -> bool {
    file.is_url_trusted()
        && file.has_manifest()
        && !banned.iter().any(|b| contains_ignore_case(&file.name, b))
}

/// The newest eligible file of `m`, if any.
///
/// Files without a creation date count as oldest. On equal dates the file
/// listed last wins.
pub fn select_latest_file<'a>(m: &'a Mod, banned: &[String]) -> Option<&'a ModFile> {
    m.files
        .iter()
        .filter(|f| is_eligible(f, banned))
        .max_by_key(|f| f.created_at())
}
