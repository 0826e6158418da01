//! HTTP downloading with bounded retry and staged placement.
//!
//! # Architecture
//!
//! This crate follows the three-layer pattern:
//! - [`data`] - Immutable options and progress types
//! - [`core`] - Pure retry schedules
//! - [`effects`] - I/O: the HTTP client seam, the fetcher and the retry loop
//!
//! Downloads are streamed into a hidden staging file next to the destination
//! and renamed into place once complete, so an interrupted transfer never
//! leaves a file at the final path.

pub mod core;
pub mod data;
pub mod effects;
mod error;

pub use core::{Backoff, RetryPolicy};
pub use data::{FetchOptions, Progress};
pub use effects::{BoxStream, Fetcher, HttpClient, RetryError, retry, retry_when};

#[cfg(feature = "reqwest")]
pub use effects::ReqwestClient;

#[cfg(any(test, feature = "mock"))]
pub use effects::mock::{MockClient, MockError};

pub use error::{Error, Result};
