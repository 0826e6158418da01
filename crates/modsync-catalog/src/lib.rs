//! The mod catalog: what can be downloaded, and which file of each mod to pick.
//!
//! - [`model`] - `Mod` / `ModFile` records as served by the catalog API
//! - [`select`] - the eligibility rules picking one file per mod
//! - [`blacklist`] - banned mod ids and file-name substrings
//! - [`source`] - where the candidate list comes from (remote API or a local file)
//! - [`snapshot`] - the raw catalog written next to the downloads

pub mod blacklist;
mod error;
mod lenient;
pub mod model;
pub mod select;
pub mod snapshot;
pub mod source;

pub use blacklist::Blacklist;
pub use error::{Error, Result};
pub use lenient::from_lenient_slice;
pub use model::{FileId, Mod, ModFile};
pub use select::{is_eligible, select_latest_file};
pub use source::{ALL_CATEGORIES, CatalogSource, FileCatalog, RemoteCatalog};
