use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use modsync_catalog::Blacklist;
use modsync_fetch::ReqwestClient;
use modsync_sync::{Error as SyncError, ProbeCache, SyncConfig, SyncResult, Syncer, entry_matches};
use regex::Regex;
use tokio_util::sync::CancellationToken;

use crate::cli::source::{ModList, REMOTE};
use crate::cli::status::ExitStatus;
use crate::ui::table::{FailedRow, Formatter, RemovalRow};
use crate::ui::tracker::ProgressTracker;

/// Categories fetched by `update-helpers`: helpers, other/misc, tools.
pub const HELPER_CATEGORIES: [i64; 3] = [5081, 4632, 575];

const PROBE_CACHE_FILE_NAME: &str = "binDownloadCache.json";

#[derive(Args, Clone, Debug)]
pub struct UpdateArg {
    /// Directory to download mods into.
    #[arg(short, long)]
    pub dir: PathBuf,

    /// Catalog category ids to sync; -1 selects every category.
    #[arg(short, long, required = true, num_args = 1.., value_delimiter = ',', allow_negative_numbers = true)]
    pub categories: Vec<i64>,

    /// Where the mod list comes from: 'maddie' for the public list, or a .json file.
    #[arg(long, default_value = REMOTE)]
    pub mod_list: String,

    /// Only keep mods whose latest archive contains an entry matching this regex.
    #[arg(long)]
    pub require_entry: Option<Regex>,

    /// Where content probe decisions are remembered [default: <dir>/binDownloadCache.json].
    #[arg(long, requires = "require_entry")]
    pub probe_cache: Option<PathBuf>,
}

#[derive(Args, Clone, Debug)]
pub struct HelpersArg {
    /// Directory to download mods into.
    #[arg(short, long)]
    pub dir: PathBuf,

    /// Where the mod list comes from: 'maddie' for the public list, or a .json file.
    #[arg(long, default_value = REMOTE)]
    pub mod_list: String,
}

impl HelpersArg {
    pub fn into_update(self) -> UpdateArg {
        UpdateArg {
            dir:           self.dir,
            categories:    HELPER_CATEGORIES.to_vec(),
            mod_list:      self.mod_list,
            require_entry: None,
            probe_cache:   None,
        }
    }
}

pub async fn update(arg: UpdateArg, cancel: &CancellationToken) -> Result<ExitStatus> {
    std::fs::create_dir_all(&arg.dir)
        .with_context(|| format!("failed to create download directory '{}'", arg.dir.display()))?;

    let blacklist = match Blacklist::load_or_create(&arg.dir.join(Blacklist::FILE_NAME)) {
        Ok(blacklist) => blacklist,
        Err(e) => {
            tracing::error!("error while reading blacklist file: {e}");
            return Ok(ExitStatus::BlacklistUnreadable);
        }
    };

    let config = SyncConfig::load(&arg.dir).context("failed to load configuration")?;
    let client = ReqwestClient::new(&config.user_agent, config.connect_timeout())
        .context("failed to build HTTP client")?;

    let source = match ModList::resolve(&arg.mod_list, client.clone(), arg.categories.clone()) {
        Ok(source) => source,
        Err(e) => {
            tracing::error!("{e}");
            return Ok(e.status());
        }
    };

    let mut syncer = Syncer::new(source, client, &arg.dir, blacklist, config)?
        .with_observer(Arc::new(ProgressTracker::new()));
    if let Some(pattern) = arg.require_entry {
        let cache_path = arg
            .probe_cache
            .unwrap_or_else(|| arg.dir.join(PROBE_CACHE_FILE_NAME));
        let cache = ProbeCache::load(&cache_path)
            .with_context(|| format!("failed to read probe cache '{}'", cache_path.display()))?;
        tracing::info!(pattern = %pattern, cache = %cache_path.display(), "filtering mods by archive contents");
        syncer = syncer.with_content_filter(cache, entry_matches(pattern));
    }

    match syncer.run(cancel).await {
        Ok(result) => Ok(report(&result)),
        Err(SyncError::Cancelled) => {
            tracing::warn!("sync cancelled, download directory left as is");
            Ok(ExitStatus::Failed)
        }
        Err(e) => Err(e).context("sync failed"),
    }
}

fn report(result: &SyncResult) -> ExitStatus {
    if !result.fetched {
        tracing::error!("failed to fetch mods");
        return ExitStatus::Failed;
    }

    if !result.failed.is_empty() {
        let rows = result.failed.iter().map(FailedRow::from);
        let table = Formatter {
            header: Some(format!("{} mod(s) failed to download", result.failed.len())),
        }
        .build(rows);
        println!("{table}");
    }

    if !result.removal_failed.is_empty() {
        let rows = result.removal_failed.iter().map(RemovalRow::from);
        let table = Formatter {
            header: Some(format!(
                "{} stale artifact(s) could not be deleted",
                result.removal_failed.len()
            )),
        }
        .build(rows);
        println!("{table}");
    }

    println!(
        "{} synced, {} failed, {} removed, {} not removed",
        result.synced.len(),
        result.failed.len(),
        result.removed.len(),
        result.removal_failed.len()
    );

    if result.is_success() { ExitStatus::Success } else { ExitStatus::Failed }
}
