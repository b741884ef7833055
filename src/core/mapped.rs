//! Memory-mapped backend
//!
//! The whole file is mapped read-only. Records are served as typed views into
//! the mapping, so lookups are plain memory reads; the OS pages data in as
//! it is touched.

use std::borrow::Cow;
use std::fs::File;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use memmap2::Mmap;

use super::backend::{name_table_warning, terminated_len, WayBackend, WayRef};
use super::config::StoreMode;
use super::error::{Result, StoreError};
use super::layout::{FileHeader, WayRecord, HEADER_SIZE};

pub struct MappedBackend {
    path: PathBuf,
    mmap: Mmap,
    header: FileHeader,
}

impl MappedBackend {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| StoreError::io(path, e))?;
        let file_len = file.metadata().map_err(|e| StoreError::io(path, e))?.len();

        if file_len < HEADER_SIZE as u64 {
            return Err(StoreError::format(
                path,
                format!(
                    "file too short: {} bytes, header needs {}",
                    file_len, HEADER_SIZE
                ),
            ));
        }

        // SAFETY: the mapping is read-only and ways files are never modified
        // while a routing process has them loaded.
        let mmap = unsafe { Mmap::map(&file) }.map_err(|e| StoreError::io(path, e))?;

        let header = FileHeader::decode(&mmap[..HEADER_SIZE], path)?;
        header.check_file_len(mmap.len() as u64, path)?;

        // The record table must be addressable as a typed slice before any
        // view is handed out.
        bytemuck::try_cast_slice::<u8, WayRecord>(&mmap[header.records_range()]).map_err(
            |e| StoreError::format(path, format!("record table not addressable: {:?}", e)),
        )?;

        let names = &mmap[header.names_offset as usize..];
        if let Some(problem) = name_table_warning(header.count, names.last().copied()) {
            warn!("{}: {}", path.display(), problem);
        }

        debug!(
            "Mapped {} ({} ways, {} name bytes, {} bytes total)",
            path.display(),
            header.count,
            header.names_len(file_len),
            file_len
        );

        Ok(Self {
            path: path.to_path_buf(),
            mmap,
            header,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All records as one typed slice over the mapping
    pub fn records(&self) -> &[WayRecord] {
        bytemuck::cast_slice(&self.mmap[self.header.records_range()])
    }

    fn names(&self) -> &[u8] {
        &self.mmap[self.header.names_offset as usize..]
    }
}

impl WayBackend for MappedBackend {
    fn mode(&self) -> StoreMode {
        StoreMode::Mapped
    }

    fn header(&self) -> &FileHeader {
        &self.header
    }

    fn names_len(&self) -> u64 {
        self.names().len() as u64
    }

    fn way(&self, index: u32) -> Result<WayRef<'_>> {
        self.records()
            .get(index as usize)
            .map(WayRef::Mapped)
            .ok_or(StoreError::Index {
                index,
                count: self.header.count,
            })
    }

    fn name(&self, offset: u32) -> Result<Cow<'_, str>> {
        let names = self.names();
        let tail = names
            .get(offset as usize..)
            .filter(|tail| !tail.is_empty())
            .ok_or(StoreError::NameOffset {
                offset,
                len: names.len() as u64,
            })?;

        let len = terminated_len(tail).ok_or_else(|| {
            StoreError::format(
                &self.path,
                format!("name at offset {} is not NUL-terminated", offset),
            )
        })?;

        Ok(String::from_utf8_lossy(&tail[..len]))
    }
}
