#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex};

use modsync_catalog::{CatalogSource, Mod, ModFile};
use modsync_sync::SyncConfig;

/// A catalog held in memory; tests can swap its contents between runs.
#[derive(Clone, Default)]
pub struct StaticCatalog {
    mods:  Arc<Mutex<Vec<Mod>>>,
    fails: Arc<Mutex<bool>>,
}

impl StaticCatalog {
    pub fn new(mods: Vec<Mod>) -> Self {
        Self {
            mods:  Arc::new(Mutex::new(mods)),
            fails: Arc::default(),
        }
    }

    pub fn set(&self, mods: Vec<Mod>) { *self.mods.lock().unwrap() = mods; }

    pub fn fail(&self) { *self.fails.lock().unwrap() = true; }
}

impl CatalogSource for StaticCatalog {
    async fn all_mods(&self) -> modsync_catalog::Result<Vec<Mod>> {
        if *self.fails.lock().unwrap() {
            return Err(modsync_catalog::Error::Parse {
                path:    "catalog".into(),
                message: "unavailable".to_string(),
            });
        }
        Ok(self.mods.lock().unwrap().clone())
    }
}

pub fn download_url(file_id: i64) -> String { format!("https://gamebanana.com/dl/{file_id}") }

pub fn listing_url(file_id: i64) -> String { format!("https://gamebanana.com/apiv11/File/{file_id}/RawFileList") }

pub fn body(file_id: i64) -> Vec<u8> { vec![file_id as u8; 100 + file_id as usize] }

pub fn mod_file(file_id: i64, name: &str) -> ModFile {
    ModFile {
        name: name.to_string(),
        url: download_url(file_id),
        size: Some(body(file_id).len() as u64),
        created_date: Some(1_700_000_000 + file_id),
        has_everest_yaml: Some(true),
        ..Default::default()
    }
}

pub fn catalog_mod(id: i64, files: Vec<ModFile>) -> Mod {
    Mod {
        id: Some(id),
        name: format!("Mod {id}"),
        category_id: Some(5081),
        files,
        ..Default::default()
    }
}

/// Retries without waiting, so tests run in real time.
pub fn fast_config() -> SyncConfig {
    SyncConfig {
        probe_retry_delay_ms: 0,
        download_retry_step_ms: 0,
        ..Default::default()
    }
}

pub fn zip_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|n| n.ends_with(".zip"))
        .collect();
    names.sort();
    names
}
