//! Build and format information reported by `gzbak version`

use gzbak_backup::{ARCHIVE_SUFFIX, TIMESTAMP_FORMAT};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What this binary is and which archives it writes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionInfo {
    pub version: String,

    /// gzbak-backup release linked into the binary
    pub library: String,

    /// Backup file name layout, e.g. `<project>.%Y%m%d%H%M%S.tar.gz`
    pub name_format: String,

    /// Short commit hash, when the build exported `GIT_SHA`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

impl VersionInfo {
    pub fn current() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            library: gzbak_backup::VERSION.to_string(),
            name_format: format!("<project>.{}{}", TIMESTAMP_FORMAT, ARCHIVE_SUFFIX),
            commit: option_env!("GIT_SHA").map(String::from),
            target: option_env!("TARGET").map(String::from),
        }
    }
}

impl fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gzbak {}", self.version)?;
        if let Some(commit) = &self.commit {
            write!(f, " ({})", commit)?;
        }
        if let Some(target) = &self.target {
            write!(f, " {}", target)?;
        }
        Ok(())
    }
}
