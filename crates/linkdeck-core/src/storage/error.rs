//! Snapshot error types
//!
//! The storage layer fails in a small number of ways a user can actually fix
//! (permissions, a full disk, a snapshot mangled by hand-editing). Raw io
//! errors are classified into those buckets at the point of failure.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors raised while reading or writing the bookmarks snapshot
#[derive(Error, Debug)]
pub enum StorageError {
    /// The data directory could not be created
    #[error("Could not create data directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Missing read or write permission on the snapshot or its directory
    #[error("No permission to access '{path}'")]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The disk ran out of space mid-write
    #[error("No space left on device while writing '{path}'")]
    DiskFull {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A file that should exist is gone
    #[error("No such file: '{path}'")]
    NotFound { path: PathBuf },

    /// Reading the snapshot failed
    #[error("Could not read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing a file failed for a reason with no more specific bucket
    #[error("Could not write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The snapshot exists but does not parse as bookmark groups
    #[error("Snapshot '{path}' is not valid bookmark JSON: {details}")]
    InvalidSnapshot { path: PathBuf, details: String },

    /// The final rename of an atomic write failed
    #[error("Could not move '{from}' into place at '{to}': {source}")]
    ReplaceFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StorageError {
    /// Classify a raw io error against the path it happened on
    pub fn from_io(source: io::Error, path: PathBuf) -> Self {
        match source.kind() {
            io::ErrorKind::PermissionDenied => Self::PermissionDenied { path, source },
            io::ErrorKind::NotFound => Self::NotFound { path },
            // Disk-full has no portable ErrorKind, so match on the text
            _ if out_of_space(&source) => Self::DiskFull { path, source },
            _ => Self::Write { path, source },
        }
    }
}

fn out_of_space(source: &io::Error) -> bool {
    let text = source.to_string().to_lowercase();
    text.contains("no space left") || text.contains("disk full") || text.contains("quota exceeded")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(kind: io::ErrorKind, text: &str) -> io::Error {
        io::Error::new(kind, text.to_string())
    }

    #[test]
    fn test_from_io_permission_denied() {
        let err = StorageError::from_io(
            raw(io::ErrorKind::PermissionDenied, "denied"),
            PathBuf::from("/deck/bookmarks.json"),
        );
        assert!(matches!(err, StorageError::PermissionDenied { .. }));
        assert!(err.to_string().contains("/deck/bookmarks.json"));
    }

    #[test]
    fn test_from_io_not_found() {
        let err = StorageError::from_io(
            raw(io::ErrorKind::NotFound, "gone"),
            PathBuf::from("/deck/bookmarks.json"),
        );
        assert!(matches!(err, StorageError::NotFound { .. }));
    }

    #[test]
    fn test_from_io_detects_full_disk() {
        let err = StorageError::from_io(
            raw(io::ErrorKind::Other, "No space left on device (os error 28)"),
            PathBuf::from("/deck/bookmarks.json"),
        );
        assert!(matches!(err, StorageError::DiskFull { .. }));
    }

    #[test]
    fn test_from_io_fallback_is_write() {
        let err = StorageError::from_io(
            raw(io::ErrorKind::Interrupted, "interrupted"),
            PathBuf::from("/deck/bookmarks.json"),
        );
        assert!(matches!(err, StorageError::Write { .. }));
    }

    #[test]
    fn test_invalid_snapshot_message() {
        let err = StorageError::InvalidSnapshot {
            path: PathBuf::from("/deck/bookmarks.json"),
            details: "expected an array".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("not valid bookmark JSON"));
        assert!(text.contains("expected an array"));
    }
}
