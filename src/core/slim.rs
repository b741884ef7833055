//! Slim backend: bounded direct-mapped record cache over an open file
//!
//! Only the header is read at open time. Each record lookup maps to exactly
//! one cache slot (`index % slots`); a miss reads the record from disk and
//! replaces whatever the slot held. Memory use is fixed by the slot count,
//! whatever the size of the file.
//!
//! The slot table and the file cursor sit behind one lock, so the
//! check-read-install sequence is atomic and readers only ever see fully
//! installed records. Workers that should not contend can open their own
//! store on the same file.

use std::borrow::Cow;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use bytemuck::Zeroable;
use log::{debug, trace, warn};
use parking_lot::Mutex;
use serde::Serialize;

use super::backend::{name_table_warning, terminated_len, WayBackend, WayRef};
use super::config::StoreMode;
use super::error::{Result, StoreError};
use super::layout::{record_offset, FileHeader, WayRecord, HEADER_SIZE, RECORD_SIZE};

/// Bytes read per step when scanning for a name terminator
const NAME_CHUNK: usize = 64;

/// Hit/miss counters of a slim cache
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub slots: usize,
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    pub fn lookups(&self) -> u64 {
        self.hits + self.misses
    }

    pub fn hit_ratio(&self) -> f64 {
        if self.lookups() == 0 {
            0.0
        } else {
            self.hits as f64 / self.lookups() as f64
        }
    }
}

/// One cache slot: the resident record and the index it was read from
#[derive(Debug, Clone, Copy)]
struct CacheSlot {
    resident: Option<u32>,
    way: WayRecord,
}

impl CacheSlot {
    fn empty() -> Self {
        Self {
            resident: None,
            way: WayRecord::zeroed(),
        }
    }

    fn lookup(&self, index: u32) -> Option<WayRecord> {
        (self.resident == Some(index)).then_some(self.way)
    }
}

struct SlimState {
    file: File,
    slots: Box<[CacheSlot]>,
    stats: CacheStats,
}

pub struct SlimBackend {
    path: PathBuf,
    header: FileHeader,
    names_offset: u64,
    names_len: u64,
    state: Mutex<SlimState>,
}

impl SlimBackend {
    pub fn open<P: AsRef<Path>>(path: P, cache_slots: usize) -> Result<Self> {
        let path = path.as_ref();
        if cache_slots == 0 {
            return Err(StoreError::Config(
                "slim cache needs at least one slot".to_string(),
            ));
        }

        let mut file = File::open(path).map_err(|e| StoreError::io(path, e))?;
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

        let mut buf = [0u8; HEADER_SIZE];
        file.read_exact(&mut buf)
            .map_err(|e| StoreError::io(path, e))?;
        let header = FileHeader::decode(&buf, path)?;
        header.check_file_len(file_len, path)?;

        let names_offset = header.names_offset;
        let names_len = header.names_len(file_len);
        let last_byte = if names_len > 0 {
            let mut last = [0u8; 1];
            file.seek(SeekFrom::Start(file_len - 1))
                .and_then(|_| file.read_exact(&mut last))
                .map_err(|e| StoreError::io(path, e))?;
            Some(last[0])
        } else {
            None
        };
        if let Some(problem) = name_table_warning(header.count, last_byte) {
            warn!("{}: {}", path.display(), problem);
        }

        debug!(
            "Opened {} in slim mode ({} ways, {} name bytes, {} cache slots)",
            path.display(),
            header.count,
            names_len,
            cache_slots
        );

        Ok(Self {
            path: path.to_path_buf(),
            header,
            names_offset,
            names_len,
            state: Mutex::new(SlimState {
                file,
                slots: vec![CacheSlot::empty(); cache_slots].into_boxed_slice(),
                stats: CacheStats {
                    slots: cache_slots,
                    ..CacheStats::default()
                },
            }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn cache_slots(&self) -> usize {
        self.state.lock().slots.len()
    }

    /// Index currently resident in the slot that `index` maps to
    pub fn resident_for(&self, index: u32) -> Option<u32> {
        let state = self.state.lock();
        state.slots[index as usize % state.slots.len()].resident
    }

    fn read_record(&self, file: &mut File, index: u32) -> Result<WayRecord> {
        let mut buf = [0u8; RECORD_SIZE];
        file.seek(SeekFrom::Start(record_offset(index)))
            .and_then(|_| file.read_exact(&mut buf))
            .map_err(|e| StoreError::io(&self.path, e))?;
        Ok(WayRecord::decode(&buf))
    }
}

impl WayBackend for SlimBackend {
    fn mode(&self) -> StoreMode {
        StoreMode::Slim
    }

    fn header(&self) -> &FileHeader {
        &self.header
    }

    fn names_len(&self) -> u64 {
        self.names_len
    }

    fn way(&self, index: u32) -> Result<WayRef<'_>> {
        if index >= self.header.count {
            return Err(StoreError::Index {
                index,
                count: self.header.count,
            });
        }

        let mut guard = self.state.lock();
        let state = &mut *guard;
        let slot = index as usize % state.slots.len();

        if let Some(way) = state.slots[slot].lookup(index) {
            state.stats.hits += 1;
            return Ok(WayRef::Cached(way));
        }

        // A failed read leaves the slot untouched
        let way = self.read_record(&mut state.file, index)?;
        trace!(
            "slim cache miss: way {} into slot {} (evicting {:?})",
            index,
            slot,
            state.slots[slot].resident
        );
        state.slots[slot] = CacheSlot {
            resident: Some(index),
            way,
        };
        state.stats.misses += 1;

        Ok(WayRef::Cached(way))
    }

    fn name(&self, offset: u32) -> Result<Cow<'_, str>> {
        if offset as u64 >= self.names_len {
            return Err(StoreError::NameOffset {
                offset,
                len: self.names_len,
            });
        }

        let mut state = self.state.lock();
        let file = &mut state.file;
        file.seek(SeekFrom::Start(self.names_offset + offset as u64))
            .map_err(|e| StoreError::io(&self.path, e))?;

        let mut remaining = self.names_len - offset as u64;
        let mut name = Vec::new();
        let mut chunk = [0u8; NAME_CHUNK];

        while remaining > 0 {
            let want = remaining.min(NAME_CHUNK as u64) as usize;
            file.read_exact(&mut chunk[..want])
                .map_err(|e| StoreError::io(&self.path, e))?;

            if let Some(len) = terminated_len(&chunk[..want]) {
                name.extend_from_slice(&chunk[..len]);
                return Ok(Cow::Owned(String::from_utf8_lossy(&name).into_owned()));
            }

            name.extend_from_slice(&chunk[..want]);
            remaining -= want as u64;
        }

        Err(StoreError::format(
            &self.path,
            format!("name at offset {} is not NUL-terminated", offset),
        ))
    }

    fn cache_stats(&self) -> Option<CacheStats> {
        Some(self.state.lock().stats)
    }
}
