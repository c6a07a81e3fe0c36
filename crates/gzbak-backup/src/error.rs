//! Error types for gzbak-backup

use camino::{Utf8Path, Utf8PathBuf};
use std::io;
use thiserror::Error;

/// Result type alias using gzbak-backup's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Archive codec and backup orchestration errors
#[derive(Error, Debug)]
pub enum Error {
    /// A path could not be made absolute
    #[error("Cannot resolve path {path}: {message}")]
    PathResolution { path: String, message: String },

    /// A destination directory could not be created
    #[error("Failed to create directory {path}: {source}")]
    DirectoryCreation {
        path: Utf8PathBuf,
        source: io::Error,
    },

    /// A file or stream could not be opened
    #[error("Failed to open {path}: {source}")]
    StreamOpen {
        path: Utf8PathBuf,
        source: io::Error,
    },

    /// Writing an entry header failed
    #[error("Failed to write archive header for '{name}': {source}")]
    HeaderWrite { name: String, source: io::Error },

    /// Copying entry content failed
    #[error("Failed to copy content of {path}: {source}")]
    ContentCopy {
        path: Utf8PathBuf,
        source: io::Error,
    },

    /// Extracted byte count differs from the size declared in the archive
    #[error("Size mismatch for {path}: wrote {actual} bytes, archive declares {expected}")]
    SizeMismatch {
        path: Utf8PathBuf,
        expected: u64,
        actual: u64,
    },

    /// Archive file name does not follow `<project>.<YYYYMMDDHHMMSS>.tar.gz`
    #[error("Unable to retrieve project name from backup file name: {file_name}")]
    NameParse { file_name: String },

    /// Project name cannot be used to build a backup file name
    #[error("Invalid project name '{name}': {reason}")]
    InvalidProjectName { name: String, reason: String },

    /// Clearing the restore target failed
    #[error("Unable to restore backup, failed to remove {path}: {source}")]
    Removal {
        path: Utf8PathBuf,
        source: io::Error,
    },

    /// The archive stream is corrupt or unreadable
    #[error("Failed to read archive {path}: {source}")]
    ArchiveRead {
        path: Utf8PathBuf,
        source: io::Error,
    },

    /// Directory traversal failed
    #[error("Failed to walk {path}: {source}")]
    Walk {
        path: Utf8PathBuf,
        source: walkdir::Error,
    },

    /// Finishing a stream layer failed
    #[error("Failed to finish {layer} stream for {path}: {source}")]
    StreamClose {
        layer: &'static str,
        path: Utf8PathBuf,
        source: io::Error,
    },

    /// Archive entry would be written outside of the destination
    #[error("Refusing to extract entry '{name}' outside of {destination}")]
    UnsafeEntryPath {
        name: String,
        destination: Utf8PathBuf,
    },
}

impl Error {
    /// Create a path resolution error
    pub fn path_resolution(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::PathResolution {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a directory creation error
    pub fn directory_creation(path: &Utf8Path, source: io::Error) -> Self {
        Self::DirectoryCreation {
            path: path.to_owned(),
            source,
        }
    }

    /// Create a stream open error
    pub fn stream_open(path: &Utf8Path, source: io::Error) -> Self {
        Self::StreamOpen {
            path: path.to_owned(),
            source,
        }
    }

    /// Create a header write error
    pub fn header_write(name: impl Into<String>, source: io::Error) -> Self {
        Self::HeaderWrite {
            name: name.into(),
            source,
        }
    }

    /// Create a content copy error
    pub fn content_copy(path: &Utf8Path, source: io::Error) -> Self {
        Self::ContentCopy {
            path: path.to_owned(),
            source,
        }
    }

    /// Create a size mismatch error
    pub fn size_mismatch(path: &Utf8Path, expected: u64, actual: u64) -> Self {
        Self::SizeMismatch {
            path: path.to_owned(),
            expected,
            actual,
        }
    }

    /// Create a name parse error
    pub fn name_parse(file_name: impl Into<String>) -> Self {
        Self::NameParse {
            file_name: file_name.into(),
        }
    }

    /// Create an invalid project name error
    pub fn invalid_project_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidProjectName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a removal error
    pub fn removal(path: &Utf8Path, source: io::Error) -> Self {
        Self::Removal {
            path: path.to_owned(),
            source,
        }
    }

    /// Create an archive read error
    pub fn archive_read(path: &Utf8Path, source: io::Error) -> Self {
        Self::ArchiveRead {
            path: path.to_owned(),
            source,
        }
    }

    /// Create a walk error
    pub fn walk(path: &Utf8Path, source: walkdir::Error) -> Self {
        Self::Walk {
            path: path.to_owned(),
            source,
        }
    }

    /// Create a stream close error
    pub fn stream_close(layer: &'static str, path: &Utf8Path, source: io::Error) -> Self {
        Self::StreamClose {
            layer,
            path: path.to_owned(),
            source,
        }
    }

    /// Create an unsafe entry path error
    pub fn unsafe_entry_path(name: impl Into<String>, destination: &Utf8Path) -> Self {
        Self::UnsafeEntryPath {
            name: name.into(),
            destination: destination.to_owned(),
        }
    }
}

impl From<gzbak_core::Error> for Error {
    fn from(err: gzbak_core::Error) -> Self {
        match err {
            gzbak_core::Error::PathResolution { path, message } => {
                Self::PathResolution { path, message }
            }
            other => Self::PathResolution {
                path: String::new(),
                message: other.to_string(),
            },
        }
    }
}
