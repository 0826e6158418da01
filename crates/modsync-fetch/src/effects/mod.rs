//! I/O operations: the HTTP client seam, staged downloads and the retry loop.

mod fetcher;
mod http;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
mod retry;

pub use fetcher::Fetcher;
pub use http::{BoxStream, HttpClient};
pub use retry::{RetryError, retry, retry_when};

#[cfg(feature = "reqwest")]
pub use http::ReqwestClient;
