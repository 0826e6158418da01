use std::collections::BTreeSet;
use std::path::Path;

use modsync_fs::AtomicWriteOptions;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::lenient::from_lenient_slice;
use crate::model::Mod;

/// User-maintained exclusions, stored next to the downloads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blacklist {
    #[serde(default)]
    pub banned_mods: BTreeSet<i64>,

    /// Case-insensitive substrings of file names that are never downloaded.
    #[serde(default)]
    pub banned_filenames: Vec<String>,
}

impl Blacklist {
    pub const FILE_NAME: &'static str = "modDownloaderBlacklist.json";

    /// Read the blacklist at `path`, writing an empty one first if it is missing.
    pub fn load_or_create(path: &Path) -> Result<Self> {
        match modsync_fs::read_if_exists(path)? {
            Some(bytes) => from_lenient_slice(&bytes, path),
            None => {
                let blacklist = Self::default();
                let json = serde_json::to_vec_pretty(&blacklist)?;
                modsync_fs::atomic_write(path, &json, AtomicWriteOptions::new().create_parents(true))?;
                tracing::info!(path = %path.display(), "created empty blacklist");
                Ok(blacklist)
            }
        }
    }

    pub fn is_mod_banned(&self, m: &Mod) -> bool { self.banned_mods.contains(&m.id_or_sentinel()) }
}
