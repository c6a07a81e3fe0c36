//! Command implementations

pub mod archive;
pub mod backup;
pub mod list;
pub mod restore;
pub mod version;

use camino::{Utf8Path, Utf8PathBuf};

/// Picks a working directory: explicit flag, then config file, then the current directory.
fn resolve_dir(flag: Option<&Utf8Path>, configured: Option<&Utf8Path>) -> Utf8PathBuf {
    flag.or(configured)
        .map(Utf8Path::to_path_buf)
        .unwrap_or_else(|| Utf8PathBuf::from("."))
}
