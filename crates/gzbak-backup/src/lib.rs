//! Gzbak backup library
//!
//! This crate provides the archive side of gzbak:
//! - A gzip-compressed tar codec for directory trees and single files
//! - Timestamped backup naming (`<project>.<YYYYMMDDHHMMSS>.tar.gz`)
//! - Backup creation, restore-by-name and listing
//! - SHA-256 checksums of finished archives
//!
//! # Example
//!
//! ```no_run
//! use camino::Utf8Path;
//! use gzbak_backup::{BackupManager, GzipTarCodec};
//!
//! # fn main() -> gzbak_backup::Result<()> {
//! let manager = BackupManager::new(GzipTarCodec::new());
//! let backup = manager.create(
//!     Utf8Path::new("./site"),
//!     "site",
//!     Utf8Path::new("/var/backups"),
//! )?;
//! manager.restore(&backup.archive_path, Utf8Path::new("/srv"))?;
//! # Ok(())
//! # }
//! ```

pub mod checksum;
pub mod clock;
pub mod closeable;
pub mod codec;
pub mod error;
pub mod manager;
pub mod naming;

pub use checksum::calculate_checksum;
pub use clock::{Clock, FixedClock, SystemClock};
pub use closeable::{close_stream, Closeable};
pub use codec::{
    ArchiveCodec, ArchiveStats, GzipTarCodec, DEFAULT_COMPRESSION_LEVEL, EXTRACTED_DIR_MODE,
    SINGLE_FILE_MODE,
};
pub use error::{Error, Result};
pub use manager::{list_backups, BackupEntry, BackupManager, BackupResult, RestoreResult};
pub use naming::{BackupName, ARCHIVE_SUFFIX, TIMESTAMP_FORMAT};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
