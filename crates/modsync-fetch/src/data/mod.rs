//! Immutable data types for fetch operations.

pub mod options;
pub mod progress;

pub use options::FetchOptions;
pub use progress::Progress;
