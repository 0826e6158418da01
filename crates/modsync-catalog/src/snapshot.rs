//! The raw catalog as fetched, kept beside the downloads for auditing and for
//! offline runs through [`FileCatalog`](crate::FileCatalog).

use std::path::Path;

use modsync_fs::AtomicWriteOptions;

use crate::error::Result;
use crate::lenient::from_lenient_slice;
use crate::model::Mod;

pub const SNAPSHOT_FILE_NAME: &str = "modList.json";

/// Write `mods` as an indented JSON array, replacing any previous snapshot.
pub fn write_snapshot(path: &Path, mods: &[Mod]) -> Result<()> {
    let json = serde_json::to_vec_pretty(mods)?;
    modsync_fs::atomic_write(path, &json, AtomicWriteOptions::new().create_parents(true))?;
    tracing::debug!(path = %path.display(), mods = mods.len(), "wrote catalog snapshot");
    Ok(())
}

/// Read a snapshot back; `None` if the file does not exist.
pub fn read_snapshot(path: &Path) -> Result<Option<Vec<Mod>>> {
    modsync_fs::read_if_exists(path)?
        .map(|bytes| from_lenient_slice(&bytes, path))
        .transpose()
}
