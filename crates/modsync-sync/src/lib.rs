//! The synchronization engine.
//!
//! A run goes through these stages, each in its own module:
//!
//! 1. fetch the catalog through a [`CatalogSource`](modsync_catalog::CatalogSource)
//! 2. optionally keep only mods whose latest file passes a content probe
//!    ([`filter`], backed by the persisted decisions in [`probe`])
//! 3. download the latest eligible file of every remaining mod ([`download`])
//! 4. delete local artifacts that were not part of this run ([`reconcile`])
//!
//! [`Syncer`] sequences the stages and collects a [`SyncResult`].

pub mod config;
pub mod download;
mod error;
pub mod filter;
pub mod layout;
pub mod observer;
pub mod probe;
pub mod reconcile;
pub mod sync;

pub use config::SyncConfig;
pub use download::{DownloadError, Downloader};
pub use error::{Error, Result};
pub use filter::ContentFilter;
pub use layout::{ArtifactLayout, LocalArtifact};
pub use observer::{NoopObserver, SyncObserver};
pub use probe::{Acceptance, EntryPredicate, ProbeCache, Prober, entry_matches};
pub use reconcile::{FailedRemoval, ReconcileReport, reconcile};
pub use sync::{FailedMod, SyncResult, SyncedMod, Syncer};
