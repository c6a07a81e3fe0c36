//! Backup file naming: `<project>.<YYYYMMDDHHMMSS>.tar.gz`.

use camino::Utf8Path;
use chrono::NaiveDateTime;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// chrono format of the timestamp segment.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Suffix shared by every backup archive.
pub const ARCHIVE_SUFFIX: &str = ".tar.gz";

// Greedy project capture: the timestamp is always the last 14-digit segment before the suffix.
static BACKUP_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<project>.+)\.(?P<timestamp>[0-9]{14})\.tar\.gz$")
        .expect("backup name regex is valid")
});

/// A project name paired with the moment its backup was taken.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BackupName {
    project: String,
    timestamp: String,
}

impl BackupName {
    /// Creates a name for a backup of `project` taken at `created_at`.
    pub fn new(project: impl Into<String>, created_at: NaiveDateTime) -> Self {
        Self {
            project: project.into(),
            timestamp: created_at.format(TIMESTAMP_FORMAT).to_string(),
        }
    }

    /// Parses a base file name such as `web.20240131235959.tar.gz`.
    ///
    /// Returns `None` when the name does not follow the convention.
    pub fn parse(file_name: &str) -> Option<Self> {
        let captures = BACKUP_NAME_RE.captures(file_name)?;
        Some(Self {
            project: captures["project"].to_string(),
            timestamp: captures["timestamp"].to_string(),
        })
    }

    /// Parses the base name of `path`.
    pub fn from_path(path: &Utf8Path) -> Option<Self> {
        path.file_name().and_then(Self::parse)
    }

    /// Project the backup belongs to
    pub fn project(&self) -> &str {
        &self.project
    }

    /// The 14-digit timestamp segment
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// Timestamp as a local date-time, `None` if the digits are not a real calendar time.
    pub fn created_at(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.timestamp, TIMESTAMP_FORMAT).ok()
    }

    /// The archive file name
    pub fn file_name(&self) -> String {
        format!("{}.{}{}", self.project, self.timestamp, ARCHIVE_SUFFIX)
    }
}

impl fmt::Display for BackupName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.file_name())
    }
}
