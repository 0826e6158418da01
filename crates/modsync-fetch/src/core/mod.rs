//! Pure transformations for fetching: retry schedules.

mod retry;

pub use retry::{Backoff, RetryPolicy};
