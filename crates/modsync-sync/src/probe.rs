//! Content probing: deciding from an archive's entry listing whether a mod
//! belongs in the sync, with decisions remembered across runs.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use modsync_catalog::{FileId, Mod, ModFile};
use modsync_fetch::{Fetcher, HttpClient, RetryError, RetryPolicy, retry};
use modsync_fs::AtomicWriteOptions;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};
use crate::layout::ArtifactLayout;

/// Decides whether a mod is wanted given its file and the archive's entry paths.
pub type EntryPredicate = Arc<dyn Fn(&Mod, &ModFile, &[String]) -> bool + Send + Sync>;

/// Accept files whose archive contains at least one entry matching `pattern`.
pub fn entry_matches(pattern: Regex) -> EntryPredicate {
    Arc::new(move |_, _, entries| entries.iter().any(|entry| pattern.is_match(entry)))
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CacheFile {
    #[serde(rename = "knownInvalidFileIds", default)]
    decisions: BTreeMap<FileId, CacheEntry>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct CacheEntry {
    #[serde(rename = "isValid", alias = "IsValid")]
    is_valid: bool,
}

/// Persisted probe decisions keyed by file id.
///
/// The first decision recorded for an id wins; later ones are ignored, so
/// concurrent probes of the same file cannot flip a result.
#[derive(Debug)]
pub struct ProbeCache {
    path:      PathBuf,
    decisions: RwLock<HashMap<FileId, bool>>,
    dirty:     AtomicBool,
}

impl ProbeCache {
    /// An empty cache that will be saved to `path`.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path:      path.into(),
            decisions: RwLock::new(HashMap::new()),
            dirty:     AtomicBool::new(false),
        }
    }

    /// Load decisions from `path`.
    ///
    /// A missing file gives an empty cache. So does a file that cannot be
    /// parsed: it is logged and overwritten at the next save.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let cache = Self::empty(path);
        let Some(bytes) = modsync_fs::read_if_exists(&cache.path)? else {
            return Ok(cache);
        };

        match serde_json::from_slice::<CacheFile>(&bytes) {
            Ok(file) => {
                let mut decisions = cache.write();
                decisions.extend(file.decisions.into_iter().map(|(id, entry)| (id, entry.is_valid)));
                tracing::debug!(path = %cache.path.display(), entries = decisions.len(), "loaded probe cache");
            }
            Err(e) => {
                tracing::warn!(path = %cache.path.display(), error = %e, "ignoring unreadable probe cache");
            }
        }
        Ok(cache)
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<FileId, bool>> {
        self.decisions.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<FileId, bool>> {
        self.decisions.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn path(&self) -> &Path { &self.path }

    pub fn get(&self, id: FileId) -> Option<bool> { self.read().get(&id).copied() }

    /// Record a decision unless one already exists. Returns whether it was stored.
    pub fn record(&self, id: FileId, is_valid: bool) -> bool {
        let mut decisions = self.write();
        if decisions.contains_key(&id) {
            return false;
        }
        decisions.insert(id, is_valid);
        self.dirty.store(true, Ordering::Release);
        true
    }

    pub fn len(&self) -> usize { self.read().len() }

    pub fn is_empty(&self) -> bool { self.read().is_empty() }

    pub fn is_dirty(&self) -> bool { self.dirty.load(Ordering::Acquire) }

    /// Write the cache if anything was recorded since the last save.
    ///
    /// Returns whether a file was written.
    pub fn persist(&self) -> Result<bool> {
        if !self.is_dirty() {
            return Ok(false);
        }

        let file = CacheFile {
            decisions: self
                .read()
                .iter()
                .map(|(&id, &is_valid)| (id, CacheEntry { is_valid }))
                .collect(),
        };
        let json = serde_json::to_vec(&file)?;
        modsync_fs::atomic_write(&self.path, &json, AtomicWriteOptions::new().create_parents(true))
            .map_err(Error::PersistCache)?;

        self.dirty.store(false, Ordering::Release);
        tracing::debug!(path = %self.path.display(), entries = file.decisions.len(), "saved probe cache");
        Ok(true)
    }
}

/// How a mod's latest file was accepted or rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acceptance {
    /// A decision from an earlier probe.
    Cached(bool),
    /// The artifact is already on disk with the declared size.
    PresentLocally,
    /// The listing was fetched and the predicate evaluated.
    Probed(bool),
    /// The listing could not be fetched; nothing was cached.
    ProbeFailed,
    Cancelled,
}

impl Acceptance {
    pub fn is_accepted(self) -> bool {
        matches!(self, Acceptance::Cached(true) | Acceptance::PresentLocally | Acceptance::Probed(true))
    }
}

/// Evaluates the [`EntryPredicate`] against remote archive listings.
pub struct Prober<C: HttpClient> {
    fetcher:   Fetcher<C>,
    cache:     Arc<ProbeCache>,
    layout:    ArtifactLayout,
    predicate: EntryPredicate,
    policy:    RetryPolicy,
}

impl<C: HttpClient> Prober<C> {
    pub fn new(
        client: C,
        cache: Arc<ProbeCache>,
        layout: ArtifactLayout,
        predicate: EntryPredicate,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            fetcher: Fetcher::new(client),
            cache,
            layout,
            predicate,
            policy,
        }
    }

    /// Decide whether `file`, the latest eligible file of `m`, should be kept.
    ///
    /// Cached decisions and files already on disk short-circuit the network.
    /// Files whose URL carries no id are judged on an empty listing and never
    /// cached, since they all share the same sentinel id.
    pub async fn should_accept(&self, m: &Mod, file: &ModFile, cancel: &CancellationToken) -> Acceptance {
        let id = file.file_id();

        if id.is_trusted()
            && let Some(decision) = self.cache.get(id)
        {
            tracing::trace!(%m, file_id = %id, decision, "using cached probe decision");
            return Acceptance::Cached(decision);
        }

        if self.layout.is_present(file) {
            tracing::debug!(%m, file = %file.name, "already downloaded, skipping probe");
            return Acceptance::PresentLocally;
        }

        if !id.is_trusted() {
            return Acceptance::Probed((self.predicate)(m, file, &[]));
        }

        tracing::info!(%m, file_id = %id, "checking archive listing");
        let listing = retry(&self.policy, cancel, |attempt| {
            if attempt > 0 {
                tracing::info!(%m, file_id = %id, attempt, "retrying archive listing");
            }
            self.listing(file)
        })
        .await;

        match listing {
            Ok(entries) => {
                let accepted = (self.predicate)(m, file, &entries);
                self.cache.record(id, accepted);
                Acceptance::Probed(accepted)
            }
            Err(RetryError::Cancelled) => Acceptance::Cancelled,
            Err(e) => {
                tracing::warn!(%m, file_id = %id, error = %e, "failed to get archive listing");
                Acceptance::ProbeFailed
            }
        }
    }

    async fn listing(&self, file: &ModFile) -> modsync_fetch::Result<Vec<String>> {
        let Some(url) = file.listing_url() else {
            return Ok(Vec::new());
        };
        let body = self.fetcher.fetch_text(&url).await?;
        Ok(body
            .split('\n')
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }
}
