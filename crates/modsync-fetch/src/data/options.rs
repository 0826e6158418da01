use std::fmt;
use std::sync::Arc;

use super::progress::Progress;

/// Per-request options for [`Fetcher::fetch_to`](crate::Fetcher::fetch_to).
#[derive(Clone)]
pub struct FetchOptions {
    /// Size the caller expects, used for progress totals and a mismatch warning.
    pub expected_len: Option<u64>,

    /// Invoked after every chunk written to the staging file.
    pub on_progress: Option<Arc<dyn Fn(&Progress) + Send + Sync>>,
}

impl fmt::Debug for FetchOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchOptions")
            .field("expected_len", &self.expected_len)
            .field("on_progress", &"{ ... }")
            .finish()
    }
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            expected_len: None,
            on_progress:  None,
        }
    }
}

impl FetchOptions {
    #[must_use]
    pub fn expected_len(mut self, expected_len: Option<u64>) -> Self {
        self.expected_len = expected_len;
        self
    }

    #[must_use]
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Progress) + Send + Sync + 'static,
    {
        self.on_progress = Some(Arc::new(callback));
        self
    }

    pub(crate) fn report(&self, progress: Progress) {
        if let Some(ref callback) = self.on_progress {
            callback(&progress);
        }
    }
}
