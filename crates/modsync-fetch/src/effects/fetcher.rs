use std::path::Path;

use futures_util::StreamExt;
use tokio::io::AsyncWriteExt;

use crate::data::{FetchOptions, Progress};
use crate::effects::http::HttpClient;
use crate::error::{Error, Result};

/// Downloads bodies through an [`HttpClient`].
pub struct Fetcher<C: HttpClient> {
    client: C,
}

impl<C: HttpClient> Fetcher<C> {
    pub fn new(client: C) -> Self { Self { client } }

    /// GET a small text document.
    pub async fn fetch_text(&self, url: &str) -> Result<String> {
        self.client.get_text(url).await.map_err(Error::network)
    }

    /// Stream `url` into `destination` and return the number of bytes written.
    ///
    /// The body goes to a hidden `.part` file beside `destination` that is
    /// renamed over it only after the last chunk has been flushed and synced.
    /// If the transfer fails or the future is dropped, the staging file is
    /// removed and `destination` is left untouched.
    pub async fn fetch_to(&self, url: &str, destination: &Path, options: &FetchOptions) -> Result<u64> {
        let parent = destination
            .parent()
            .ok_or_else(|| Error::NoParent(destination.to_path_buf()))?;

        let staging = tempfile::Builder::new()
            .prefix(".")
            .suffix(".part")
            .tempfile_in(parent)
            .map_err(Error::io(parent))?;
        let (std_file, staging_path) = staging.into_parts();
        let mut file = tokio::fs::File::from_std(std_file);

        let mut stream = self
            .client
            .stream(url)
            .await
            .map_err(Error::network)?;

        let mut bytes_downloaded = 0u64;
        options.report(Progress::new(0, options.expected_len));

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(Error::network)?;
            file.write_all(&chunk)
                .await
                .map_err(Error::io(staging_path.to_path_buf()))?;
            bytes_downloaded += chunk.len() as u64;
            options.report(Progress::new(bytes_downloaded, options.expected_len));
        }

        file.flush().await.map_err(Error::io(staging_path.to_path_buf()))?;
        file.sync_all().await.map_err(Error::io(staging_path.to_path_buf()))?;
        drop(file);

        staging_path
            .persist(destination)
            .map_err(|e| Error::Io {
                path:   destination.to_path_buf(),
                source: e.error,
            })?;

        if let Some(expected) = options.expected_len
            && expected != bytes_downloaded
        {
            tracing::warn!(
                url,
                expected,
                actual = bytes_downloaded,
                "downloaded size differs from the declared size"
            );
        }

        Ok(bytes_downloaded)
    }
}
