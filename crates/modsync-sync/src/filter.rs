//! Concurrent content filtering of a fetched catalog.

use std::sync::Arc;

use futures_util::{StreamExt, stream};
use modsync_catalog::{Blacklist, Mod, select_latest_file};
use modsync_fetch::HttpClient;
use tokio_util::sync::CancellationToken;

use crate::config::SyncConfig;
use crate::error::{Error, Result};
use crate::layout::ArtifactLayout;
use crate::probe::{Acceptance, EntryPredicate, ProbeCache, Prober};

#[derive(Debug, Default)]
struct Tally {
    cached:  usize,
    present: usize,
    probed:  usize,
    failed:  usize,
}

impl Tally {
    fn count(&mut self, acceptance: Acceptance) {
        match acceptance {
            Acceptance::Cached(_) => self.cached += 1,
            Acceptance::PresentLocally => self.present += 1,
            Acceptance::Probed(_) => self.probed += 1,
            Acceptance::ProbeFailed => self.failed += 1,
            Acceptance::Cancelled => {}
        }
    }
}

/// Keeps the mods whose latest eligible file passes the [`Prober`].
pub struct ContentFilter<C: HttpClient> {
    prober:      Prober<C>,
    cache:       Arc<ProbeCache>,
    blacklist:   Blacklist,
    concurrency: usize,
}

impl<C: HttpClient> ContentFilter<C> {
    pub fn new(
        client: C,
        layout: ArtifactLayout,
        cache: ProbeCache,
        predicate: EntryPredicate,
        blacklist: Blacklist,
        config: &SyncConfig,
    ) -> Self {
        let cache = Arc::new(cache);
        Self {
            prober: Prober::new(client, Arc::clone(&cache), layout, predicate, config.probe_policy()),
            cache,
            blacklist,
            concurrency: config.probe_concurrency.max(1),
        }
    }

    async fn judge(&self, m: &Mod, cancel: &CancellationToken) -> Option<Acceptance> {
        if self.blacklist.is_mod_banned(m) {
            return None;
        }
        let file = select_latest_file(m, &self.blacklist.banned_filenames)?;
        Some(self.prober.should_accept(m, file, cancel).await)
    }

    /// Probe every mod with up to `probe_concurrency` listings in flight and
    /// return the accepted ones in catalog order.
    ///
    /// The cache is saved before returning, also when the run was cancelled.
    pub async fn filter_mods(&self, mods: Vec<Mod>, cancel: &CancellationToken) -> Result<Vec<Mod>> {
        let total = mods.len();
        let mut judged: Vec<(usize, Mod, Option<Acceptance>)> = stream::iter(mods.into_iter().enumerate())
            .map(|(index, m)| async move {
                let acceptance = self.judge(&m, cancel).await;
                (index, m, acceptance)
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        if self.cache.persist()? {
            tracing::info!(path = %self.cache.path().display(), "saved probe decisions");
        }

        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        judged.sort_unstable_by_key(|(index, ..)| *index);

        let mut tally = Tally::default();
        let accepted: Vec<Mod> = judged
            .into_iter()
            .filter_map(|(_, m, acceptance)| {
                let acceptance = acceptance?;
                tally.count(acceptance);
                acceptance.is_accepted().then_some(m)
            })
            .collect();

        tracing::info!(
            total,
            accepted = accepted.len(),
            cached = tally.cached,
            present = tally.present,
            probed = tally.probed,
            failed = tally.failed,
            "filtered catalog by archive contents"
        );
        Ok(accepted)
    }
}
