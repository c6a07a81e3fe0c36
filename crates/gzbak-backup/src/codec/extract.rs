//! Archive extraction.

use super::{ArchiveStats, EXTRACTED_DIR_MODE};
use crate::closeable::{close_stream, Closeable};
use crate::error::{Error, Result};
use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use flate2::read::GzDecoder;
use gzbak_core::paths::{resolve_absolute, to_slash};
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Read};
use tar::Archive;
use tracing::{debug, info, warn};

type ArchiveReader = Archive<GzDecoder<BufReader<File>>>;

pub(super) fn uncompress(source: &Utf8Path, destination: &Utf8Path) -> Result<ArchiveStats> {
    let source = resolve_absolute(source)?;

    let file = File::open(&source).map_err(|e| Error::stream_open(&source, e))?;
    let decoder = GzDecoder::new(BufReader::new(file));
    let mut archive = Archive::new(decoder);

    let result = resolve_absolute(destination)
        .map_err(Error::from)
        .and_then(|destination| {
            info!("Extracting {} into {}", source, destination);
            extract_entries(&mut archive, &source, &destination)
        });

    release(archive, &source);

    let stats = result?;
    info!(
        "Extracted {} files and {} directories ({} bytes) from {}",
        stats.files, stats.directories, stats.bytes, source
    );
    Ok(stats)
}

/// Releases the read layers innermost first.
fn release(archive: ArchiveReader, source: &Utf8Path) {
    let log = |layer: &'static str, e: io::Error| {
        warn!("Failed to close {} stream for {}: {}", layer, source, e);
    };

    if let Some(decoder) = close_stream(archive, Some(&log)) {
        close_stream(decoder, Some(&log));
    }
}

fn extract_entries<R: Read>(
    archive: &mut Archive<R>,
    source: &Utf8Path,
    destination: &Utf8Path,
) -> Result<ArchiveStats> {
    let mut stats = ArchiveStats::default();

    let entries = archive
        .entries()
        .map_err(|e| Error::archive_read(source, e))?;

    for entry in entries {
        let mut entry = entry.map_err(|e| Error::archive_read(source, e))?;

        let name = {
            let path = entry.path().map_err(|e| Error::archive_read(source, e))?;
            to_slash(&path.to_string_lossy())
        };
        let target = entry_target(destination, &name)?;
        let entry_type = entry.header().entry_type();

        if entry_type.is_dir() {
            create_dir(&target)?;
            stats.directories += 1;
            continue;
        }

        if !entry_type.is_file() {
            warn!("Skipping '{}': unsupported entry type {:?}", name, entry_type);
            continue;
        }

        let mode = entry
            .header()
            .mode()
            .map_err(|e| Error::archive_read(source, e))?;
        let declared = entry.size();

        if let Some(parent) = target.parent() {
            if !parent.is_dir() {
                create_dir(parent)?;
            }
        }

        let copied = write_file(&mut entry, &target, mode)?;
        if copied != declared {
            return Err(Error::size_mismatch(&target, declared, copied));
        }

        debug!("x {}", target);
        stats.files += 1;
        stats.bytes += copied;
    }

    Ok(stats)
}

/// Maps an entry name onto the destination. The empty name is the destination itself.
fn entry_target(destination: &Utf8Path, name: &str) -> Result<Utf8PathBuf> {
    if name.is_empty() {
        return Ok(destination.to_owned());
    }

    let relative = Utf8Path::new(name);
    let escapes = relative.components().any(|c| {
        matches!(
            c,
            Utf8Component::ParentDir | Utf8Component::RootDir | Utf8Component::Prefix(_)
        )
    });
    if escapes {
        return Err(Error::unsafe_entry_path(name, destination));
    }

    Ok(destination.join(relative))
}

/// Copies one entry into `target` and closes the file before returning the copied byte count.
fn write_file(entry: &mut impl Read, target: &Utf8Path, mode: u32) -> Result<u64> {
    let file = open_options(mode)
        .open(target)
        .map_err(|e| Error::stream_open(target, e))?;
    let mut writer = BufWriter::new(file);

    let copied = io::copy(entry, &mut writer);

    // A failed flush here means the file on disk is incomplete, so it outranks the copy error.
    let file = writer
        .close()
        .map_err(|e| Error::stream_close(BufWriter::<File>::LAYER, target, e))?;
    drop(file);

    copied.map_err(|e| Error::content_copy(target, e))
}

#[cfg(unix)]
fn open_options(mode: u32) -> OpenOptions {
    use std::os::unix::fs::OpenOptionsExt;

    let mut options = OpenOptions::new();
    options
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .mode(mode & 0o7777);
    options
}

#[cfg(not(unix))]
fn open_options(_mode: u32) -> OpenOptions {
    let mut options = OpenOptions::new();
    options.read(true).write(true).create(true).truncate(true);
    options
}

#[cfg(unix)]
fn create_dir(path: &Utf8Path) -> Result<()> {
    use std::os::unix::fs::DirBuilderExt;

    fs::DirBuilder::new()
        .recursive(true)
        .mode(EXTRACTED_DIR_MODE)
        .create(path)
        .map_err(|e| Error::directory_creation(path, e))
}

#[cfg(not(unix))]
fn create_dir(path: &Utf8Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| Error::directory_creation(path, e))
}
