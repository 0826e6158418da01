use modsync_catalog::{Mod, ModFile};
use modsync_fetch::Progress;

/// Hooks for presenting a sync run. Every method defaults to doing nothing.
pub trait SyncObserver: Send + Sync {
    fn catalog_fetched(&self, _mods: usize) {}

    fn download_started(&self, _m: &Mod, _file: &ModFile) {}

    /// Called after every chunk of the current download.
    fn download_progress(&self, _progress: &Progress) {}

    fn download_finished(&self, _m: &Mod, _file: &ModFile, _succeeded: bool) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl SyncObserver for NoopObserver {}
