//! Backup orchestration: named archives of a project, restored by name.

use crate::clock::{Clock, SystemClock};
use crate::codec::{ArchiveCodec, ArchiveStats};
use crate::error::{Error, Result};
use crate::naming::BackupName;
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use std::io;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Result of a backup operation.
#[derive(Debug, Clone)]
pub struct BackupResult {
    /// Path to the created archive
    pub archive_path: Utf8PathBuf,

    /// Parsed archive name
    pub name: BackupName,

    /// What went into the archive
    pub stats: ArchiveStats,

    /// Duration of the operation
    pub duration: Duration,
}

/// Result of a restore operation.
#[derive(Debug, Clone)]
pub struct RestoreResult {
    /// Project recovered from the archive name
    pub project: String,

    /// Directory the project was restored into
    pub target: Utf8PathBuf,

    /// What came out of the archive
    pub stats: ArchiveStats,

    /// Duration of the operation
    pub duration: Duration,
}

/// A backup archive found on disk.
#[derive(Debug, Clone)]
pub struct BackupEntry {
    /// Full path to the archive
    pub path: Utf8PathBuf,

    /// Parsed archive name
    pub name: BackupName,

    /// Archive size in bytes
    pub size_bytes: u64,
}

/// Creates and restores project backups through an [`ArchiveCodec`].
pub struct BackupManager<C, K = SystemClock> {
    codec: C,
    clock: K,
}

impl<C: ArchiveCodec> BackupManager<C> {
    /// Creates a manager that names backups with wall-clock time.
    pub fn new(codec: C) -> Self {
        Self {
            codec,
            clock: SystemClock,
        }
    }
}

impl<C: ArchiveCodec, K: Clock> BackupManager<C, K> {
    /// Replaces the time source used for naming.
    pub fn with_clock<K2: Clock>(self, clock: K2) -> BackupManager<C, K2> {
        BackupManager {
            codec: self.codec,
            clock,
        }
    }

    /// The underlying codec
    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Archives `source` as `destination_dir/<project>.<YYYYMMDDHHMMSS>.tar.gz`.
    pub fn create(
        &self,
        source: &Utf8Path,
        project: &str,
        destination_dir: &Utf8Path,
    ) -> Result<BackupResult> {
        validate_project_name(project)?;

        let start = Instant::now();
        let name = BackupName::new(project, self.clock.now());
        let archive_path = destination_dir.join(name.file_name());

        info!("Creating backup of {} as {}", source, archive_path);
        let stats = self.codec.compress(&archive_path, source)?;

        Ok(BackupResult {
            archive_path,
            name,
            stats,
            duration: start.elapsed(),
        })
    }

    /// Replaces `destination_dir/<project>/` with the contents of `archive`.
    ///
    /// The project comes from the archive's file name and must be a single plain path
    /// component. The existing target is removed before extraction; if that removal fails
    /// nothing is extracted.
    pub fn restore(&self, archive: &Utf8Path, destination_dir: &Utf8Path) -> Result<RestoreResult> {
        let start = Instant::now();
        let name = BackupName::from_path(archive)
            .ok_or_else(|| Error::name_parse(archive.file_name().unwrap_or(archive.as_str())))?;
        validate_project_name(name.project())?;
        let target = destination_dir.join(name.project());

        info!("Restoring {} into {}", archive, target);
        remove_target(&target)?;

        let stats = self.codec.uncompress(archive, &target)?;

        Ok(RestoreResult {
            project: name.project().to_string(),
            target,
            stats,
            duration: start.elapsed(),
        })
    }
}

fn validate_project_name(project: &str) -> Result<()> {
    if project.is_empty() {
        return Err(Error::invalid_project_name(project, "must not be empty"));
    }
    if project.contains(['/', '\\']) {
        return Err(Error::invalid_project_name(
            project,
            "must not contain path separators",
        ));
    }
    if project == "." || project == ".." {
        return Err(Error::invalid_project_name(project, "reserved name"));
    }
    Ok(())
}

fn remove_target(target: &Utf8Path) -> Result<()> {
    let metadata = match fs::symlink_metadata(target) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("Nothing to remove at {}", target);
            return Ok(());
        }
        Err(e) => return Err(Error::removal(target, e)),
    };

    let removed = if metadata.is_dir() {
        fs::remove_dir_all(target)
    } else {
        fs::remove_file(target)
    };
    removed.map_err(|e| Error::removal(target, e))?;

    debug!("Removed {}", target);
    Ok(())
}

/// Lists backups in `directory`, oldest first, optionally limited to one project.
///
/// Files whose names do not follow the backup naming convention are ignored.
pub fn list_backups(directory: &Utf8Path, project: Option<&str>) -> Result<Vec<BackupEntry>> {
    let mut backups = Vec::new();

    for entry in directory
        .read_dir_utf8()
        .map_err(|e| Error::stream_open(directory, e))?
    {
        let entry = entry.map_err(|e| Error::stream_open(directory, e))?;
        let Some(name) = BackupName::parse(entry.file_name()) else {
            continue;
        };
        if project.is_some_and(|p| p != name.project()) {
            continue;
        }

        let metadata = entry
            .metadata()
            .map_err(|e| Error::stream_open(entry.path(), e))?;
        if !metadata.is_file() {
            continue;
        }

        backups.push(BackupEntry {
            path: entry.path().to_owned(),
            name,
            size_bytes: metadata.len(),
        });
    }

    backups.sort_by(|a, b| {
        a.name
            .timestamp()
            .cmp(b.name.timestamp())
            .then_with(|| a.name.project().cmp(b.name.project()))
    });

    Ok(backups)
}
