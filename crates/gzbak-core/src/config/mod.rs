//! Configuration management for gzbak

mod loader;

pub use loader::*;

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

/// Default gzip compression level (6 = balanced speed/ratio).
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;

/// Contents of a `gzbak.yaml` file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GzbakConfigFile {
    /// Directory new backups are written to and listed from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_dir: Option<Utf8PathBuf>,

    /// Directory projects are restored into
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restore_dir: Option<Utf8PathBuf>,

    /// Gzip compression level (1-9)
    pub compression_level: u32,
}

impl Default for GzbakConfigFile {
    fn default() -> Self {
        Self {
            backup_dir: None,
            restore_dir: None,
            compression_level: DEFAULT_COMPRESSION_LEVEL,
        }
    }
}
