//! In-memory [`HttpClient`] for tests.
//!
//! Routes are keyed by exact URL. Every request counts as a hit, including
//! failed ones, so tests can assert how many network round-trips happened.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use bytes::Bytes;
use futures_util::{StreamExt, stream};

use super::http::{BoxStream, HttpClient};

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct MockError(pub String);

#[derive(Debug, Default)]
struct Route {
    body:           Bytes,
    failures_left:  u32,
    broken_streams: u32,
    stalled:        bool,
}

/// How a streamed body ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Ending {
    Complete,
    /// Half the body, then an error.
    Broken,
    /// Half the body, then nothing ever again.
    Stalled,
}

#[derive(Debug, Default)]
struct State {
    routes: HashMap<String, Route>,
    hits:   HashMap<String, u32>,
}

#[derive(Clone, Debug, Default)]
pub struct MockClient {
    state: Arc<Mutex<State>>,
}

impl MockClient {
    pub fn new() -> Self { Self::default() }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Serve `body` for `url`.
    pub fn route(&self, url: &str, body: impl Into<Bytes>) -> &Self {
        self.state().routes.entry(url.to_string()).or_default().body = body.into();
        self
    }

    /// Fail the next `n` requests to `url` before the body is sent.
    pub fn fail_first(&self, url: &str, n: u32) -> &Self {
        self.state().routes.entry(url.to_string()).or_default().failures_left = n;
        self
    }

    /// Cut the next `n` streamed bodies of `url` off halfway with an error.
    pub fn break_streams(&self, url: &str, n: u32) -> &Self {
        self.state().routes.entry(url.to_string()).or_default().broken_streams = n;
        self
    }

    /// Send the first half of every body of `url`, then hang forever.
    pub fn stall_streams(&self, url: &str) -> &Self {
        self.state().routes.entry(url.to_string()).or_default().stalled = true;
        self
    }

    pub fn hits(&self, url: &str) -> u32 { self.state().hits.get(url).copied().unwrap_or(0) }

    pub fn total_hits(&self) -> u32 { self.state().hits.values().sum() }

    fn take(&self, url: &str) -> Result<(Bytes, Ending), MockError> {
        let mut state = self.state();
        *state.hits.entry(url.to_string()).or_default() += 1;

        let route = state
            .routes
            .get_mut(url)
            .ok_or_else(|| MockError(format!("404 Not Found: {url}")))?;

        if route.failures_left > 0 {
            route.failures_left -= 1;
            return Err(MockError(format!("503 Service Unavailable: {url}")));
        }

        let ending = if route.stalled {
            Ending::Stalled
        } else if route.broken_streams > 0 {
            route.broken_streams -= 1;
            Ending::Broken
        } else {
            Ending::Complete
        };
        Ok((route.body.clone(), ending))
    }
}

impl HttpClient for MockClient {
    type Error = MockError;

    async fn stream(&self, url: &str) -> Result<BoxStream<'static, Result<Bytes, Self::Error>>, Self::Error> {
        let (body, ending) = self.take(url)?;
        let half = Ok(body.slice(..body.len() / 2));

        let chunks: BoxStream<'static, Result<Bytes, MockError>> = match ending {
            Ending::Complete => {
                let pieces: Vec<Result<Bytes, MockError>> =
                    body.chunks(1024).map(|c| Ok(Bytes::copy_from_slice(c))).collect();
                Box::pin(stream::iter(pieces))
            }
            Ending::Broken => {
                let reset = Err(MockError(format!("connection reset: {url}")));
                Box::pin(stream::iter([half, reset]))
            }
            Ending::Stalled => Box::pin(stream::iter([half]).chain(stream::pending())),
        };
        Ok(chunks)
    }

    async fn get_text(&self, url: &str) -> Result<String, Self::Error> {
        let (body, _) = self.take(url)?;
        String::from_utf8(body.to_vec()).map_err(|e| MockError(e.to_string()))
    }
}
