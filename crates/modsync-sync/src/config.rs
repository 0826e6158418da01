//! Tunables for a sync run.
//!
//! Values are layered: built-in defaults, then `modsync.toml` in the download
//! directory, then `MODSYNC_*` environment variables.

use std::path::Path;
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use modsync_catalog::snapshot::SNAPSHOT_FILE_NAME;
use modsync_fetch::RetryPolicy;
use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Retries after the first failed listing probe.
    pub probe_retries:          u32,
    pub probe_retry_delay_ms:   u64,
    /// Retries after the first failed download.
    pub download_retries:       u32,
    /// The n-th download retry waits `n * download_retry_step_ms`.
    pub download_retry_step_ms: u64,
    /// Listing probes in flight at once.
    pub probe_concurrency:      usize,
    /// Only files with this extension are considered by the reconciler.
    pub artifact_extension:     String,
    pub snapshot_file_name:     String,
    pub user_agent:             String,
    pub connect_timeout_secs:   u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            probe_retries:          3,
            probe_retry_delay_ms:   1000,
            download_retries:       3,
            download_retry_step_ms: 1000,
            probe_concurrency:      16,
            artifact_extension:     "zip".to_string(),
            snapshot_file_name:     SNAPSHOT_FILE_NAME.to_string(),
            user_agent:             concat!("modsync/", env!("CARGO_PKG_VERSION")).to_string(),
            connect_timeout_secs:   30,
        }
    }
}

impl SyncConfig {
    pub const FILE_NAME: &'static str = "modsync.toml";
    pub const ENV_PREFIX: &'static str = "MODSYNC_";

    /// Layer `<dir>/modsync.toml` and the environment over the defaults.
    ///
    /// A missing file is not an error.
    pub fn load(dir: &Path) -> Result<Self> {
        let config = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(dir.join(Self::FILE_NAME)))
            .merge(Env::prefixed(Self::ENV_PREFIX))
            .extract()?;
        Ok(config)
    }

    pub fn probe_policy(&self) -> RetryPolicy {
        RetryPolicy::fixed(self.probe_retries, Duration::from_millis(self.probe_retry_delay_ms))
    }

    pub fn download_policy(&self) -> RetryPolicy {
        RetryPolicy::linear(self.download_retries, Duration::from_millis(self.download_retry_step_ms))
    }

    pub fn connect_timeout(&self) -> Duration { Duration::from_secs(self.connect_timeout_secs) }
}
