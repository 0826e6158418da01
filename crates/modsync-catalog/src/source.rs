//! Where the list of candidate mods comes from.

use std::future::Future;
use std::path::PathBuf;

use modsync_fetch::{Fetcher, HttpClient};

use crate::error::{Error, Result};
use crate::model::Mod;
use crate::snapshot::read_snapshot;

/// Category id meaning "every category".
pub const ALL_CATEGORIES: i64 = -1;

const DEFAULT_LIST_URL: &str = "https://maddie480.ovh/celeste/gamebanana-list";

/// Supplies the full candidate list for one sync run.
///
/// An error and an empty list are treated the same by the sync: as a failed
/// fetch that must not touch the download directory.
pub trait CatalogSource: Send + Sync {
    fn all_mods(&self) -> impl Future<Output = Result<Vec<Mod>>> + Send;
}

fn matches_category(categories: &[i64], m: &Mod) -> bool {
    categories.contains(&ALL_CATEGORIES) || categories.contains(&m.category_id.unwrap_or(0))
}

/// The paginated public mod list, walked category by category.
pub struct RemoteCatalog<C: HttpClient> {
    fetcher:    Fetcher<C>,
    base_url:   String,
    categories: Vec<i64>,
}

impl<C: HttpClient> RemoteCatalog<C> {
    pub fn new(client: C, categories: Vec<i64>) -> Self {
        Self {
            fetcher: Fetcher::new(client),
            base_url: DEFAULT_LIST_URL.to_string(),
            categories,
        }
    }

    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn page_url(&self, category: i64, page: u32) -> String {
        match category {
            ALL_CATEGORIES => format!("{}?sort=latest&page={page}", self.base_url),
            _ => format!("{}?sort=latest&category={category}&page={page}", self.base_url),
        }
    }

    async fn page(&self, category: i64, page: u32) -> Result<Vec<Mod>> {
        let url = self.page_url(category, page);
        let body = self
            .fetcher
            .fetch_text(&url)
            .await
            .map_err(|source| Error::Fetch {
                url: url.clone(),
                source,
            })?;
        let mods: Option<Vec<Mod>> =
            serde_json::from_str(&body).map_err(|source| Error::Page { url, source })?;
        Ok(mods.unwrap_or_default())
    }
}

impl<C: HttpClient> CatalogSource for RemoteCatalog<C> {
    async fn all_mods(&self) -> Result<Vec<Mod>> {
        let mut all = Vec::new();

        for &category in &self.categories {
            let mut page = 1;
            loop {
                let mods = self.page(category, page).await?;
                if mods.is_empty() {
                    break;
                }
                tracing::debug!(category, page, count = mods.len(), "fetched catalog page");
                all.extend(mods);
                page += 1;
            }
        }

        tracing::info!(count = all.len(), "fetched remote catalog");
        Ok(all)
    }
}

/// A previously saved mod list, filtered by category.
pub struct FileCatalog {
    path:       PathBuf,
    categories: Vec<i64>,
}

impl FileCatalog {
    pub fn new(path: impl Into<PathBuf>, categories: Vec<i64>) -> Self {
        Self {
            path: path.into(),
            categories,
        }
    }
}

impl CatalogSource for FileCatalog {
    async fn all_mods(&self) -> Result<Vec<Mod>> {
        let Some(mods) = read_snapshot(&self.path)? else {
            tracing::warn!(path = %self.path.display(), "mod list file does not exist");
            return Ok(Vec::new());
        };

        let total = mods.len();
        let mods: Vec<Mod> = mods
            .into_iter()
            .filter(|m| matches_category(&self.categories, m))
            .collect();
        tracing::info!(path = %self.path.display(), total, selected = mods.len(), "loaded mod list file");
        Ok(mods)
    }
}
