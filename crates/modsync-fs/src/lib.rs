//! Filesystem primitives shared by the modsync crates.
//!
//! - [`atomic_write`] replaces a file through a sibling temp file and a rename,
//!   so readers never observe a half-written snapshot.
//! - [`contained_path`] maps an untrusted display name to a path that is
//!   guaranteed to live directly inside a base directory.

mod error;
mod rw;
mod sanitize;

pub use error::{Error, Result};
pub use rw::{AtomicWriteOptions, atomic_write, file_len, read_if_exists, remove_if_exists};
pub use sanitize::{contained_path, normalize_path, sanitize_file_name};
