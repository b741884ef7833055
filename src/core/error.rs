//! Error types for the way store
//!
//! I/O and format errors are fatal to a store: no partially usable store is
//! ever returned, and a failed read on a slim-cache miss is not retried.
//! Index errors are caller contract violations and are reported immediately.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Main error type for way store operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// File could not be opened, mapped, or read
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// File contents do not describe a valid way table
    #[error("Invalid way file {}: {reason}", .path.display())]
    Format { path: PathBuf, reason: String },

    /// Way index outside `[0, count)`
    #[error("Way index {index} out of range (store holds {count} ways)")]
    Index { index: u32, count: u32 },

    /// Name offset outside the name table
    #[error("Name offset {offset} out of range (name table is {len} bytes)")]
    NameOffset { offset: u32, len: u64 },

    /// Invalid store options
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl StoreError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn format(path: &Path, reason: impl Into<String>) -> Self {
        StoreError::Format {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    /// True for errors that invalidate the whole store (I/O and format)
    pub fn is_fatal(&self) -> bool {
        matches!(self, StoreError::Io { .. } | StoreError::Format { .. })
    }
}

/// Convenience result type for way store operations
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_names_file_and_os_error() {
        let err = StoreError::io(
            Path::new("/data/ways.mem"),
            io::Error::new(io::ErrorKind::NotFound, "No such file or directory"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/data/ways.mem"));
        assert!(msg.contains("No such file or directory"));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_index_error_is_not_fatal() {
        let err = StoreError::Index { index: 3, count: 3 };
        assert_eq!(
            err.to_string(),
            "Way index 3 out of range (store holds 3 ways)"
        );
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_format_error_source_is_none() {
        use std::error::Error as _;
        let err = StoreError::format(Path::new("ways.mem"), "bad magic");
        assert!(err.source().is_none());
        assert!(err.to_string().ends_with("bad magic"));
    }
}
