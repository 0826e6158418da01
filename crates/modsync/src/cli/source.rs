//! Turns the `--mod-list` argument into a catalog source.

use std::path::PathBuf;

use modsync_catalog::{CatalogSource, FileCatalog, Mod, RemoteCatalog};
use modsync_fetch::HttpClient;
use thiserror::Error;

use crate::cli::status::ExitStatus;

/// `--mod-list` value selecting the public remote list.
pub const REMOTE: &str = "maddie";

#[derive(Debug, Error)]
pub enum ModListError {
    #[error("unknown mod list source '{0}', expected '{REMOTE}' or a .json file")]
    Unknown(String),

    #[error("mod list file '{}' does not exist", .0.display())]
    Missing(PathBuf),
}

impl ModListError {
    pub fn status(&self) -> ExitStatus {
        match self {
            ModListError::Unknown(_) => ExitStatus::UnknownModList,
            ModListError::Missing(_) => ExitStatus::MissingModList,
        }
    }
}

pub enum ModList<C: HttpClient> {
    Remote(RemoteCatalog<C>),
    File(FileCatalog),
}

impl<C: HttpClient> ModList<C> {
    pub fn resolve(value: &str, client: C, categories: Vec<i64>) -> Result<Self, ModListError> {
        if value == REMOTE {
            return Ok(ModList::Remote(RemoteCatalog::new(client, categories)));
        }
        if !value.ends_with(".json") {
            return Err(ModListError::Unknown(value.to_string()));
        }
        let path = PathBuf::from(value);
        if !path.is_file() {
            return Err(ModListError::Missing(path));
        }
        Ok(ModList::File(FileCatalog::new(path, categories)))
    }
}

impl<C: HttpClient> CatalogSource for ModList<C> {
    async fn all_mods(&self) -> modsync_catalog::Result<Vec<Mod>> {
        match self {
            ModList::Remote(remote) => remote.all_mods().await,
            ModList::File(file) => file.all_mods().await,
        }
    }
}
