//! Path resolution helpers.
//!
//! Archive entry names are always `/`-separated, so every path the codec touches goes through
//! [`resolve_absolute`] first.

use crate::error::{Error, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::path::Path;

/// Rewrites platform separators to `/`.
pub fn to_slash(path: &str) -> String {
    if std::path::MAIN_SEPARATOR == '/' {
        path.to_string()
    } else {
        path.replace(std::path::MAIN_SEPARATOR, "/")
    }
}

/// Resolves `path` against the current directory and normalizes separators.
///
/// The path does not need to exist. Non-UTF-8 results are rejected.
pub fn resolve_absolute(path: impl AsRef<Path>) -> Result<Utf8PathBuf> {
    let path = path.as_ref();
    let absolute = std::path::absolute(path)
        .map_err(|e| Error::path_resolution(path.to_string_lossy(), e.to_string()))?;

    let absolute = Utf8PathBuf::try_from(absolute).map_err(|e| {
        Error::path_resolution(path.to_string_lossy(), format!("not valid UTF-8: {}", e))
    })?;

    Ok(Utf8PathBuf::from(to_slash(absolute.as_str())))
}

/// Returns `path` relative to `root` as a `/`-joined name.
///
/// The root itself maps to the empty string. Returns `None` when `path` is not under `root`.
pub fn relative_name(root: &Utf8Path, path: &Utf8Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let name = relative
        .components()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join("/");
    Some(name)
}
