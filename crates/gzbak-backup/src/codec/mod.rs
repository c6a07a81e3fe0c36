//! Gzip-compressed tar codec.
//!
//! [`GzipTarCodec::compress`] turns a directory tree (or a single file) into a `.tar.gz` whose
//! entry names are relative to the compressed root, and [`GzipTarCodec::uncompress`] rebuilds
//! the tree under a destination directory. A lone file is stored as a single nameless entry, so
//! the name it gets back is whatever destination path the caller extracts it to.

mod compress;
mod extract;

use crate::error::Result;
use camino::Utf8Path;

/// Default gzip compression level (6 = balanced speed/ratio).
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;

/// Mode recorded for the entry of a single-file archive.
pub const SINGLE_FILE_MODE: u32 = 0o600;

/// Mode used for directories created during extraction.
pub const EXTRACTED_DIR_MODE: u32 = 0o755;

/// Counts gathered while writing or reading an archive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArchiveStats {
    /// Directory entries (including the root entry of a tree)
    pub directories: usize,

    /// File entries
    pub files: usize,

    /// Total file content in bytes
    pub bytes: u64,
}

impl ArchiveStats {
    /// Total number of entries
    pub fn entries(&self) -> usize {
        self.directories + self.files
    }
}

/// Compresses filesystem trees into archives and restores them.
pub trait ArchiveCodec {
    /// Writes every descendant of `source` into a new archive at `destination`.
    fn compress(&self, destination: &Utf8Path, source: &Utf8Path) -> Result<ArchiveStats>;

    /// Recreates the archived tree under `destination`.
    fn uncompress(&self, source: &Utf8Path, destination: &Utf8Path) -> Result<ArchiveStats>;
}

/// The `.tar.gz` codec.
#[derive(Debug, Clone)]
pub struct GzipTarCodec {
    compression_level: u32,
}

impl GzipTarCodec {
    /// Creates a codec with the default compression level.
    pub fn new() -> Self {
        Self {
            compression_level: DEFAULT_COMPRESSION_LEVEL,
        }
    }

    /// Sets the compression level.
    pub fn with_compression_level(mut self, level: u32) -> Self {
        self.compression_level = level.clamp(1, 9);
        self
    }

    /// Returns the compression level used for new archives.
    pub fn compression_level(&self) -> u32 {
        self.compression_level
    }
}

impl Default for GzipTarCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveCodec for GzipTarCodec {
    fn compress(&self, destination: &Utf8Path, source: &Utf8Path) -> Result<ArchiveStats> {
        compress::compress(destination, source, self.compression_level)
    }

    fn uncompress(&self, source: &Utf8Path, destination: &Utf8Path) -> Result<ArchiveStats> {
        extract::uncompress(source, destination)
    }
}
