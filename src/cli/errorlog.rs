//! Append-only error log
//!
//! Problems found while scanning a store are written one per line to a log
//! file named on the command line. The log is an explicit object owned by
//! the command that uses it.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub struct ErrorLog {
    path: PathBuf,
    writer: BufWriter<File>,
    lines: u64,
}

impl ErrorLog {
    /// Open `path` for logging, truncating it unless `append` is set
    pub fn open<P: AsRef<Path>>(path: P, append: bool) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(append)
            .truncate(!append)
            .open(path)
            .with_context(|| format!("Failed to open error log {}", path.display()))?;

        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
            lines: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of lines written through this handle
    pub fn lines(&self) -> u64 {
        self.lines
    }

    pub fn log(&mut self, message: &str) -> Result<()> {
        writeln!(self.writer, "{}", message)
            .with_context(|| format!("Failed to write error log {}", self.path.display()))?;
        self.lines += 1;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer
            .flush()
            .with_context(|| format!("Failed to flush error log {}", self.path.display()))
    }
}

impl Drop for ErrorLog {
    fn drop(&mut self) {
        let _ = self.writer.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_truncate_then_append() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("errors.log");

        {
            let mut log = ErrorLog::open(&path, false).unwrap();
            log.log("first").unwrap();
            assert_eq!(log.lines(), 1);
        }
        {
            let mut log = ErrorLog::open(&path, true).unwrap();
            log.log("second").unwrap();
            log.flush().unwrap();
        }
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first\nsecond\n");

        {
            let mut log = ErrorLog::open(&path, false).unwrap();
            log.log("fresh").unwrap();
        }
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "fresh\n");
    }

    #[test]
    fn test_open_failure_names_file() {
        let err = ErrorLog::open("/nonexistent/dir/errors.log", false).err().unwrap();
        assert!(err.to_string().contains("/nonexistent/dir/errors.log"));
    }
}
