//! Archive creation.

use super::{ArchiveStats, SINGLE_FILE_MODE};
use crate::closeable::{close_stream, Closeable};
use crate::error::{Error, Result};
use camino::Utf8Path;
use flate2::write::GzEncoder;
use flate2::Compression;
use gzbak_core::paths::{relative_name, resolve_absolute};
use std::fs::{self, File, Metadata};
use std::io::{self, Read, Write};
use std::time::UNIX_EPOCH;
use tar::{Builder as TarBuilder, EntryType, Header};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

type ArchiveWriter = TarBuilder<GzEncoder<File>>;

pub(super) fn compress(
    destination: &Utf8Path,
    source: &Utf8Path,
    level: u32,
) -> Result<ArchiveStats> {
    let destination = resolve_absolute(destination)?;
    let source = resolve_absolute(source)?;

    let metadata = fs::metadata(&source).map_err(|e| Error::stream_open(&source, e))?;

    if let Some(parent) = destination.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| Error::directory_creation(parent, e))?;
        }
    }

    info!("Compressing {} into {}", source, destination);

    let file = File::create(&destination).map_err(|e| Error::stream_open(&destination, e))?;
    let encoder = GzEncoder::new(file, Compression::new(level));
    let mut builder = TarBuilder::new(encoder);
    let mut stats = ArchiveStats::default();

    let written = if metadata.is_dir() {
        append_tree(&mut builder, &source, &destination, &mut stats)
    } else {
        append_single_file(&mut builder, &source, &metadata, &mut stats)
    };

    if let Err(e) = written {
        abandon(builder, &destination);
        return Err(e);
    }

    let encoder = builder
        .close()
        .map_err(|e| Error::stream_close(ArchiveWriter::LAYER, &destination, e))?;
    let file = encoder
        .close()
        .map_err(|e| Error::stream_close(GzEncoder::<File>::LAYER, &destination, e))?;
    file.close()
        .map_err(|e| Error::stream_close(File::LAYER, &destination, e))?;

    info!(
        "Archived {} files and {} directories ({} bytes) into {}",
        stats.files, stats.directories, stats.bytes, destination
    );

    Ok(stats)
}

/// Releases every layer after a failed write. Close errors are logged so the write error wins.
fn abandon(builder: ArchiveWriter, destination: &Utf8Path) {
    let log = |layer: &'static str, e: io::Error| {
        warn!("Failed to close {} stream for {}: {}", layer, destination, e);
    };

    if let Some(encoder) = close_stream(builder, Some(&log)) {
        if let Some(file) = close_stream(encoder, Some(&log)) {
            close_stream(file, Some(&log));
        }
    }
}

/// Appends every node under `root`, except the archive being written when it lies inside.
fn append_tree(
    builder: &mut ArchiveWriter,
    root: &Utf8Path,
    destination: &Utf8Path,
    stats: &mut ArchiveStats,
) -> Result<()> {
    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|e| Error::walk(root, e))?;

        let path = Utf8Path::from_path(entry.path()).ok_or_else(|| {
            Error::path_resolution(entry.path().to_string_lossy(), "not valid UTF-8")
        })?;
        if path == destination {
            debug!("Skipping {}: archive being written", path);
            continue;
        }
        let name = relative_name(root, path)
            .ok_or_else(|| Error::path_resolution(path.as_str(), format!("not under {}", root)))?;
        let metadata = entry.metadata().map_err(|e| Error::walk(root, e))?;

        if metadata.is_dir() {
            let mut header = new_header(EntryType::Directory, 0, entry_mode(&metadata), &metadata);
            append_entry(builder, &mut header, &name, io::empty())
                .map_err(|e| Error::header_write(name.as_str(), e))?;
            stats.directories += 1;
        } else if metadata.is_file() {
            append_file(builder, path, &name, &metadata)?;
            stats.files += 1;
            stats.bytes += metadata.len();
        } else {
            warn!("Skipping {}: not a regular file or directory", path);
            continue;
        }

        debug!("a {}", if name.is_empty() { "." } else { name.as_str() });
    }

    Ok(())
}

fn append_single_file(
    builder: &mut ArchiveWriter,
    source: &Utf8Path,
    metadata: &Metadata,
    stats: &mut ArchiveStats,
) -> Result<()> {
    let mut header = new_header(EntryType::Regular, metadata.len(), SINGLE_FILE_MODE, metadata);
    append_content(builder, &mut header, source, "", metadata.len())?;

    stats.files += 1;
    stats.bytes += metadata.len();
    Ok(())
}

fn append_file(
    builder: &mut ArchiveWriter,
    path: &Utf8Path,
    name: &str,
    metadata: &Metadata,
) -> Result<()> {
    let mut header = new_header(
        EntryType::Regular,
        metadata.len(),
        entry_mode(metadata),
        metadata,
    );
    append_content(builder, &mut header, path, name, metadata.len())
}

/// Streams the file at `path` into a new entry, requiring exactly `size` bytes.
fn append_content(
    builder: &mut ArchiveWriter,
    header: &mut Header,
    path: &Utf8Path,
    name: &str,
    size: u64,
) -> Result<()> {
    let file = File::open(path).map_err(|e| Error::stream_open(path, e))?;
    let mut reader = CountingReader::new(file.take(size));

    if let Err(e) = append_entry(builder, header, name, &mut reader) {
        // Nothing was read yet, so the header itself could not be written.
        return Err(if reader.count == 0 && !reader.failed {
            Error::header_write(name, e)
        } else {
            Error::content_copy(path, e)
        });
    }

    if reader.count != size {
        return Err(Error::content_copy(
            path,
            io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("file shrank while archiving: read {} of {} bytes", reader.count, size),
            ),
        ));
    }

    Ok(())
}

fn append_entry<W: Write, R: Read>(
    builder: &mut TarBuilder<W>,
    header: &mut Header,
    name: &str,
    data: R,
) -> io::Result<()> {
    if name.is_empty() {
        // append_data rejects paths without components; the zeroed name field is the empty name.
        header.set_cksum();
        builder.append(header, data)
    } else {
        builder.append_data(header, name, data)
    }
}

fn new_header(entry_type: EntryType, size: u64, mode: u32, metadata: &Metadata) -> Header {
    let mtime = metadata
        .modified()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let mut header = Header::new_gnu();
    header.set_entry_type(entry_type);
    header.set_size(size);
    header.set_mode(mode);
    header.set_mtime(mtime);
    header
}

#[cfg(unix)]
fn entry_mode(metadata: &Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
fn entry_mode(metadata: &Metadata) -> u32 {
    match (metadata.is_dir(), metadata.permissions().readonly()) {
        (true, _) => 0o755,
        (false, true) => 0o444,
        (false, false) => 0o644,
    }
}

/// Reader that tracks how many bytes passed through and whether a read failed.
struct CountingReader<R> {
    inner: R,
    count: u64,
    failed: bool,
}

impl<R> CountingReader<R> {
    fn new(inner: R) -> Self {
        Self {
            inner,
            count: 0,
            failed: false,
        }
    }
}

impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.inner.read(buf) {
            Ok(n) => {
                self.count += n as u64;
                Ok(n)
            }
            Err(e) => {
                self.failed = true;
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use flate2::read::GzDecoder;
    use tempfile::TempDir;

    fn utf8(path: &std::path::Path) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(path.to_path_buf()).unwrap()
    }

    /// Reads back `(name, entry type, size, mode)` for every entry of an archive.
    fn list_entries(archive: &Utf8Path) -> Vec<(String, EntryType, u64, u32)> {
        let file = File::open(archive).unwrap();
        let mut archive = tar::Archive::new(GzDecoder::new(file));
        archive
            .entries()
            .unwrap()
            .map(|entry| {
                let entry = entry.unwrap();
                let name = entry.path().unwrap().to_string_lossy().into_owned();
                let header = entry.header();
                (
                    name,
                    header.entry_type(),
                    entry.size(),
                    header.mode().unwrap(),
                )
            })
            .collect()
    }

    #[test]
    fn test_tree_entries_are_relative_and_sorted() {
        let temp_dir = TempDir::new().unwrap();
        let source = utf8(&temp_dir.path().join("project"));
        fs::create_dir_all(source.join("src/nested")).unwrap();
        fs::write(source.join("b.txt"), "bbb").unwrap();
        fs::write(source.join("a.txt"), "a").unwrap();
        fs::write(source.join("src/nested/lib.rs"), "fn main() {}").unwrap();

        let archive = utf8(&temp_dir.path().join("out/project.tar.gz"));
        let stats = compress(&archive, &source, 6).unwrap();

        let names: Vec<String> = list_entries(&archive)
            .into_iter()
            .map(|(name, ..)| name)
            .collect();
        assert_eq!(
            names,
            vec!["", "a.txt", "b.txt", "src", "src/nested", "src/nested/lib.rs"]
        );
        assert_eq!(stats.directories, 3);
        assert_eq!(stats.files, 3);
        assert_eq!(stats.bytes, 16);
    }

    #[test]
    fn test_directory_entries_have_no_content() {
        let temp_dir = TempDir::new().unwrap();
        let source = utf8(&temp_dir.path().join("tree"));
        fs::create_dir_all(source.join("empty")).unwrap();

        let archive = utf8(&temp_dir.path().join("tree.tar.gz"));
        compress(&archive, &source, 6).unwrap();

        let entries = list_entries(&archive);
        assert_eq!(entries.len(), 2);
        for (_, entry_type, size, _) in entries {
            assert!(entry_type.is_dir());
            assert_eq!(size, 0);
        }
    }

    #[test]
    fn test_single_file_is_one_nameless_entry() {
        let temp_dir = TempDir::new().unwrap();
        let source = utf8(&temp_dir.path().join("notes"));
        fs::write(&source, "no extension needed").unwrap();

        let archive = utf8(&temp_dir.path().join("notes.tar.gz"));
        let stats = compress(&archive, &source, 6).unwrap();

        let entries = list_entries(&archive);
        assert_eq!(entries.len(), 1);
        let (name, entry_type, size, mode) = &entries[0];
        assert_eq!(name, "");
        assert!(entry_type.is_file());
        assert_eq!(*size, 19);
        assert_eq!(*mode, SINGLE_FILE_MODE);
        assert_eq!(stats.files, 1);
        assert_eq!(stats.directories, 0);
    }

    #[test]
    fn test_dotted_directory_is_treated_as_directory() {
        let temp_dir = TempDir::new().unwrap();
        let source = utf8(&temp_dir.path().join("site.v2"));
        fs::create_dir_all(&source).unwrap();
        fs::write(source.join("index.html"), "<html/>").unwrap();

        let archive = utf8(&temp_dir.path().join("site.tar.gz"));
        let stats = compress(&archive, &source, 6).unwrap();

        assert_eq!(stats.directories, 1);
        assert_eq!(stats.files, 1);
    }

    #[test]
    fn test_long_entry_names() {
        let temp_dir = TempDir::new().unwrap();
        let source = utf8(&temp_dir.path().join("deep"));
        let long_dir = "d".repeat(60);
        let nested = source.join(&long_dir).join(&long_dir);
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("file.txt"), "deep").unwrap();

        let archive = utf8(&temp_dir.path().join("deep.tar.gz"));
        compress(&archive, &source, 6).unwrap();

        let expected = format!("{}/{}/file.txt", long_dir, long_dir);
        assert!(list_entries(&archive)
            .iter()
            .any(|(name, ..)| *name == expected));
    }

    #[test]
    fn test_creates_destination_parent() {
        let temp_dir = TempDir::new().unwrap();
        let source = utf8(&temp_dir.path().join("file.txt"));
        fs::write(&source, "content").unwrap();

        let archive = utf8(&temp_dir.path().join("a/b/c/file.tar.gz"));
        compress(&archive, &source, 6).unwrap();

        assert!(archive.is_file());
    }

    #[test]
    fn test_archive_inside_source_is_not_archived() {
        let temp_dir = TempDir::new().unwrap();
        let source = utf8(&temp_dir.path().join("proj"));
        fs::create_dir_all(source.join("backups")).unwrap();
        fs::write(source.join("a.txt"), "0123456789a").unwrap();

        let archive = source.join("backups/x.tar.gz");
        let stats = compress(&archive, &source, 6).unwrap();

        assert_eq!(stats.files, 1);
        assert_eq!(stats.bytes, 11);
        let names: Vec<String> = list_entries(&archive)
            .into_iter()
            .map(|(name, ..)| name)
            .collect();
        assert_eq!(names, vec!["", "a.txt", "backups"]);
    }

    #[test]
    fn test_missing_source_fails_before_creating_archive() {
        let temp_dir = TempDir::new().unwrap();
        let source = utf8(&temp_dir.path().join("missing"));
        let archive = utf8(&temp_dir.path().join("missing.tar.gz"));

        let err = compress(&archive, &source, 6).unwrap_err();
        assert!(matches!(err, Error::StreamOpen { .. }));
        assert!(!archive.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_records_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let source = utf8(&temp_dir.path().join("tree"));
        fs::create_dir_all(&source).unwrap();
        let script = source.join("run.sh");
        fs::write(&script, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o750)).unwrap();

        let archive = utf8(&temp_dir.path().join("tree.tar.gz"));
        compress(&archive, &source, 6).unwrap();

        let (_, _, _, mode) = list_entries(&archive)
            .into_iter()
            .find(|(name, ..)| name == "run.sh")
            .unwrap();
        assert_eq!(mode, 0o750);
    }

    #[test]
    fn test_counting_reader() {
        let mut reader = CountingReader::new(&b"twelve bytes"[..]);
        let mut sink = Vec::new();
        io::copy(&mut reader, &mut sink).unwrap();
        assert_eq!(reader.count, 12);
        assert!(!reader.failed);
    }
}
