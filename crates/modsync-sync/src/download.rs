//! Idempotent, retried downloads into the artifact layout.

use std::sync::Arc;

use modsync_catalog::{Mod, ModFile};
use modsync_fetch::{FetchOptions, Fetcher, HttpClient, RetryError, RetryPolicy, retry_when};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::layout::{ArtifactLayout, LocalArtifact};
use crate::observer::SyncObserver;

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("'{0}' is not a trusted download URL")]
    UntrustedUrl(String),

    /// The file name cannot be placed inside the download directory.
    #[error(transparent)]
    UnsafeName(modsync_fs::Error),

    #[error("failed to clear the previous copy: {0}")]
    Stale(#[source] modsync_fs::Error),

    #[error("download failed after {attempts} attempts: {source}")]
    Failed {
        attempts: u32,
        #[source]
        source:   modsync_fetch::Error,
    },

    #[error("download cancelled")]
    Cancelled,
}

pub struct Downloader<C: HttpClient> {
    fetcher:  Fetcher<C>,
    layout:   ArtifactLayout,
    policy:   RetryPolicy,
    observer: Arc<dyn SyncObserver>,
}

impl<C: HttpClient> Downloader<C> {
    pub fn new(client: C, layout: ArtifactLayout, policy: RetryPolicy, observer: Arc<dyn SyncObserver>) -> Self {
        Self {
            fetcher: Fetcher::new(client),
            layout,
            policy,
            observer,
        }
    }

    pub fn layout(&self) -> &ArtifactLayout { &self.layout }

    pub fn observer(&self) -> &dyn SyncObserver { self.observer.as_ref() }

    pub(crate) fn set_observer(&mut self, observer: Arc<dyn SyncObserver>) { self.observer = observer; }

    /// Make sure `file` of `m` is on disk and return where it is.
    ///
    /// An existing file with the declared size is reused without touching the
    /// network. Otherwise any stale copy is deleted first, and the body is
    /// staged and renamed into place, so the final path only ever holds a
    /// complete download.
    pub async fn download(
        &self,
        m: &Mod,
        file: &ModFile,
        cancel: &CancellationToken,
    ) -> Result<LocalArtifact, DownloadError> {
        if !file.is_url_trusted() {
            return Err(DownloadError::UntrustedUrl(file.url.clone()));
        }

        let path = self.layout.path_for(file).map_err(DownloadError::UnsafeName)?;
        if let Some(existing) = self.layout.artifact_at(&path, file) {
            tracing::trace!(%m, path = %path.display(), "already up to date");
            return Ok(existing);
        }

        if modsync_fs::remove_if_exists(&path).map_err(DownloadError::Stale)? {
            tracing::debug!(path = %path.display(), "removed outdated copy");
        }

        tracing::info!(
            %m,
            url = %file.url,
            path = %path.display(),
            size_kib = file.size.map(|s| s / 1024),
            "downloading"
        );
        self.observer.download_started(m, file);

        let observer = Arc::clone(&self.observer);
        let options = FetchOptions::default()
            .expected_len(file.size)
            .on_progress(move |progress| observer.download_progress(progress));

        let fetcher = &self.fetcher;
        let url = file.url.as_str();
        let destination = path.as_path();
        let options = &options;
        let outcome = retry_when(
            &self.policy,
            cancel,
            move |attempt| {
                if attempt > 0 {
                    tracing::info!(url, attempt, "retrying download");
                }
                fetcher.fetch_to(url, destination, options)
            },
            modsync_fetch::Error::is_transient,
        )
        .await;

        self.observer.download_finished(m, file, outcome.is_ok());

        match outcome {
            Ok(size) => Ok(LocalArtifact { path, size }),
            Err(RetryError::Cancelled) => Err(DownloadError::Cancelled),
            Err(RetryError::Exhausted { attempts, last } | RetryError::Fatal { attempts, last }) => {
                Err(DownloadError::Failed { attempts, source: last })
            }
        }
    }
}
