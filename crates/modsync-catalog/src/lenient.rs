use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

/// Parse a hand-edited JSON document: comments and trailing commas are allowed.
///
/// Strict JSON goes through `serde_json`; only documents it rejects are retried
/// with the json5 parser, which is much slower on large catalogs.
/// `path` is only used for error messages.
pub fn from_lenient_slice<T: DeserializeOwned>(bytes: &[u8], path: &Path) -> Result<T> {
    let parse_error = |message: String| Error::Parse {
        path: path.to_path_buf(),
        message,
    };

    let text = std::str::from_utf8(bytes).map_err(|e| parse_error(e.to_string()))?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    match serde_json::from_str(text) {
        Ok(value) => Ok(value),
        Err(strict) => {
            tracing::trace!(path = %path.display(), error = %strict, "not strict json, retrying leniently");
            json5::from_str(text).map_err(|e| parse_error(e.to_string()))
        }
    }
}
