//! The orchestrator: fetch, filter, download, reconcile.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use modsync_catalog::{Blacklist, CatalogSource, Mod, ModFile, select_latest_file, snapshot};
use modsync_fetch::HttpClient;
use tokio_util::sync::CancellationToken;

use crate::config::SyncConfig;
use crate::download::{DownloadError, Downloader};
use crate::error::{Error, Result};
use crate::filter::ContentFilter;
use crate::layout::ArtifactLayout;
use crate::observer::{NoopObserver, SyncObserver};
use crate::probe::{EntryPredicate, ProbeCache};
use crate::reconcile::{FailedRemoval, ReconcileReport, reconcile};

#[derive(Debug, Clone, PartialEq)]
pub struct SyncedMod {
    pub catalog_mod: Mod,
    pub file:        ModFile,
    pub path:        PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FailedMod {
    pub catalog_mod: Mod,
    pub url:         String,
    pub reason:      String,
}

/// Outcome of a completed run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncResult {
    /// `false` when the catalog could not be fetched or was empty; nothing on
    /// disk was changed in that case.
    pub fetched: bool,
    pub synced:  Vec<SyncedMod>,
    pub failed:  Vec<FailedMod>,
    pub removed: Vec<PathBuf>,
    /// Stale artifacts the reconciler could not delete.
    pub removal_failed: Vec<FailedRemoval>,
}

impl SyncResult {
    fn not_fetched() -> Self { Self::default() }

    /// Everything was fetched, downloaded and cleaned up. A stale artifact
    /// left behind counts as a failure, since the directory is out of sync.
    pub fn is_success(&self) -> bool { self.fetched && self.failed.is_empty() && self.removal_failed.is_empty() }

    fn absorb(&mut self, report: ReconcileReport) {
        if !report.failed.is_empty() {
            tracing::error!(count = report.failed.len(), "some stale artifacts could not be deleted");
        }
        tracing::debug!(kept = report.kept, removed = report.removed.len(), "reconciled download directory");
        self.removed = report.removed;
        self.removal_failed = report.failed;
    }
}

/// Brings a download directory in line with a catalog.
pub struct Syncer<S: CatalogSource, C: HttpClient> {
    source:     S,
    client:     C,
    downloader: Downloader<C>,
    filter:     Option<ContentFilter<C>>,
    blacklist:  Blacklist,
    config:     SyncConfig,
}

impl<S: CatalogSource, C: HttpClient + Clone> Syncer<S, C> {
    pub fn new(source: S, client: C, dir: &Path, blacklist: Blacklist, config: SyncConfig) -> Result<Self> {
        let layout = ArtifactLayout::new(dir)?;
        let downloader = Downloader::new(client.clone(), layout, config.download_policy(), Arc::new(NoopObserver));
        Ok(Self {
            source,
            client,
            downloader,
            filter: None,
            blacklist,
            config,
        })
    }

    /// Only keep mods whose latest file's archive listing satisfies `predicate`.
    #[must_use]
    pub fn with_content_filter(mut self, cache: ProbeCache, predicate: EntryPredicate) -> Self {
        self.filter = Some(ContentFilter::new(
            self.client.clone(),
            self.downloader.layout().clone(),
            cache,
            predicate,
            self.blacklist.clone(),
            &self.config,
        ));
        self
    }

    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn SyncObserver>) -> Self {
        self.downloader.set_observer(observer);
        self
    }
}

impl<S: CatalogSource, C: HttpClient> Syncer<S, C> {
    pub fn root(&self) -> &Path { self.downloader.layout().root() }

    async fn fetch(&self, cancel: &CancellationToken) -> Result<Option<Vec<Mod>>> {
        let fetched = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(Error::Cancelled),
            fetched = self.source.all_mods() => fetched,
        };

        match fetched {
            Ok(mods) if !mods.is_empty() => Ok(Some(mods)),
            Ok(_) => {
                tracing::error!("catalog is empty");
                Ok(None)
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to fetch catalog");
                Ok(None)
            }
        }
    }

    /// Run one full sync.
    ///
    /// A failed or empty fetch ends the run early without touching the
    /// directory. Per-mod download failures are collected in the result.
    /// Cancellation returns [`Error::Cancelled`] and skips reconciliation.
    pub async fn run(&self, cancel: &CancellationToken) -> Result<SyncResult> {
        let root = self.root();
        std::fs::create_dir_all(root).map_err(|source| Error::Directory {
            path: root.to_path_buf(),
            source,
        })?;

        let Some(mut mods) = self.fetch(cancel).await? else {
            return Ok(SyncResult::not_fetched());
        };
        tracing::info!(count = mods.len(), "fetched catalog");

        if let Some(filter) = &self.filter {
            mods = filter.filter_mods(mods, cancel).await?;
            if mods.is_empty() {
                tracing::error!("no mods left after content filtering");
                return Ok(SyncResult::not_fetched());
            }
        }
        self.downloader.observer().catalog_fetched(mods.len());

        snapshot::write_snapshot(&root.join(&self.config.snapshot_file_name), &mods)
            .map_err(Error::PersistSnapshot)?;

        let mut result = SyncResult {
            fetched: true,
            ..Default::default()
        };
        let mut keep = HashSet::new();

        for m in &mods {
            if cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }
            if self.blacklist.is_mod_banned(m) {
                tracing::debug!(%m, "skipping blacklisted mod");
                continue;
            }
            let Some(file) = select_latest_file(m, &self.blacklist.banned_filenames) else {
                tracing::debug!(%m, "no eligible file");
                continue;
            };

            match self.downloader.download(m, file, cancel).await {
                Ok(artifact) => {
                    keep.insert(artifact.path.clone());
                    result.synced.push(SyncedMod {
                        catalog_mod: m.clone(),
                        file:        file.clone(),
                        path:        artifact.path,
                    });
                }
                Err(DownloadError::Cancelled) => return Err(Error::Cancelled),
                Err(DownloadError::UnsafeName(e)) => {
                    tracing::warn!(%m, error = %e, "skipping file with unsafe name");
                }
                Err(e) => {
                    tracing::warn!(%m, url = %file.url, error = %e, "download failed");
                    result.failed.push(FailedMod {
                        catalog_mod: m.clone(),
                        url:         file.url.clone(),
                        reason:      e.to_string(),
                    });
                }
            }
        }

        if !result.failed.is_empty() {
            tracing::error!(count = result.failed.len(), "some mods failed to download");
            for failed in &result.failed {
                tracing::error!(name = %failed.catalog_mod, url = %failed.url, reason = %failed.reason, "failed mod");
            }
        }

        result.absorb(reconcile(root, &keep, &self.config.artifact_extension)?);

        tracing::info!(
            synced = result.synced.len(),
            failed = result.failed.len(),
            removed = result.removed.len(),
            removal_failed = result.removal_failed.len(),
            "finished sync"
        );
        Ok(result)
    }
}
