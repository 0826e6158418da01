use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use futures_util::Stream;

/// A boxed stream type for HTTP response bodies.
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = T> + Send + 'a>>;

/// Asynchronous HTTP client abstraction.
///
/// This is the minimal surface the sync engine needs: a streaming GET for
/// artifacts and a buffered GET for small text documents (listings, catalog
/// pages). Implementations follow redirects and turn non-success statuses
/// into errors.
///
/// # Implementations
///
/// - [`ReqwestClient`]: Production implementation using `reqwest`
/// - [`MockClient`](crate::MockClient): In-memory routes for tests
pub trait HttpClient: Send + Sync {
    /// Error type for HTTP operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Open a streaming GET and return the response body as a stream.
    fn stream(
        &self,
        url: &str,
    ) -> impl Future<Output = Result<BoxStream<'static, Result<Bytes, Self::Error>>, Self::Error>> + Send;

    /// GET a small document and return its body as text.
    fn get_text(&self, url: &str) -> impl Future<Output = Result<String, Self::Error>> + Send;
}

#[cfg(feature = "reqwest")]
mod reqwest_impl {
    use super::*;
    use futures_util::TryStreamExt;
    use std::time::Duration;

    /// Production HTTP client implementation using reqwest.
    ///
    /// Cloning is cheap; clones share the connection pool.
    #[derive(Clone, Debug)]
    pub struct ReqwestClient {
        client: reqwest::Client,
    }

    impl ReqwestClient {
        pub fn new(user_agent: &str, connect_timeout: Duration) -> Result<Self, reqwest::Error> {
            let client = reqwest::Client::builder()
                .user_agent(user_agent)
                .connect_timeout(connect_timeout)
                .build()?;
            Ok(Self { client })
        }
    }

    impl HttpClient for ReqwestClient {
        type Error = reqwest::Error;

        async fn stream(&self, url: &str) -> Result<BoxStream<'static, Result<Bytes, Self::Error>>, Self::Error> {
            let response = self.client.get(url).send().await?.error_for_status()?;
            Ok(Box::pin(response.bytes_stream().map_ok(Bytes::from)))
        }

        async fn get_text(&self, url: &str) -> Result<String, Self::Error> {
            self.client
                .get(url)
                .send()
                .await?
                .error_for_status()?
                .text()
                .await
        }
    }
}

#[cfg(feature = "reqwest")]
pub use reqwest_impl::ReqwestClient;
