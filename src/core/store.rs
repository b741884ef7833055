//! WayStore - one access contract over the mapped and slim backends
//!
//! The backend is picked once, when the store is loaded. Both backends give
//! the same answers for the same file; the choice only trades resident
//! memory against lookup latency.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use log::debug;

use super::backend::{WayBackend, WayRef};
use super::compare;
use super::config::{StoreMode, StoreOptions};
use super::error::{Result, StoreError};
use super::layout::{FileHeader, WayRecord};
use super::mapped::MappedBackend;
use super::slim::{CacheStats, SlimBackend};

pub struct WayStore {
    path: PathBuf,
    backend: Box<dyn WayBackend>,
}

impl WayStore {
    /// Open `path` with the backend selected by `options`
    pub fn load<P: AsRef<Path>>(path: P, options: &StoreOptions) -> Result<Self> {
        options.validate()?;
        let path = path.as_ref();

        let backend: Box<dyn WayBackend> = match options.mode {
            StoreMode::Mapped => Box::new(MappedBackend::open(path)?),
            StoreMode::Slim => Box::new(SlimBackend::open(path, options.cache_slots)?),
        };

        debug!(
            "Loaded way store {} ({} backend, {} ways)",
            path.display(),
            backend.mode(),
            backend.header().count
        );

        Ok(Self {
            path: path.to_path_buf(),
            backend,
        })
    }

    pub fn open_mapped<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::load(path, &StoreOptions::mapped())
    }

    pub fn open_slim<P: AsRef<Path>>(path: P, cache_slots: usize) -> Result<Self> {
        Self::load(path, &StoreOptions::slim(cache_slots))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mode(&self) -> StoreMode {
        self.backend.mode()
    }

    pub fn header(&self) -> &FileHeader {
        self.backend.header()
    }

    /// Number of way records
    pub fn count(&self) -> u32 {
        self.backend.header().count
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Size of the name table in bytes
    pub fn names_len(&self) -> u64 {
        self.backend.names_len()
    }

    /// Way record at `index`, which must be in `[0, count)`
    pub fn way_at(&self, index: u32) -> Result<WayRef<'_>> {
        let count = self.count();
        if index >= count {
            return Err(StoreError::Index { index, count });
        }
        self.backend.way(index)
    }

    /// Name starting `offset` bytes into the name table
    pub fn name_at(&self, offset: u32) -> Result<Cow<'_, str>> {
        self.backend.name(offset)
    }

    /// Name of the way at `index`
    pub fn way_name(&self, index: u32) -> Result<Cow<'_, str>> {
        let offset = self.way_at(index)?.name_offset();
        self.name_at(offset)
    }

    /// Ways in index order
    pub fn iter(&self) -> impl Iterator<Item = Result<WayRef<'_>>> + '_ {
        (0..self.count()).map(move |index| self.backend.way(index))
    }

    /// Attribute ordering of the ways at two indices
    pub fn compare_at(&self, a: u32, b: u32) -> Result<Ordering> {
        let first = self.way_at(a)?.to_record();
        let second = self.way_at(b)?;
        Ok(compare::compare(&first, &second))
    }

    /// Slim cache counters; `None` for the mapped backend
    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.backend.cache_stats()
    }

    /// Attribute ordering used to deduplicate ways; see [`compare::compare`]
    pub fn compare(a: &WayRecord, b: &WayRecord) -> Ordering {
        compare::compare(a, b)
    }
}

impl std::fmt::Debug for WayStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WayStore")
            .field("path", &self.path)
            .field("mode", &self.mode())
            .field("count", &self.count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::layout::fixtures::write_ways;
    use tempfile::NamedTempFile;

    fn both_stores(file: &NamedTempFile) -> [WayStore; 2] {
        [
            WayStore::open_mapped(file.path()).unwrap(),
            WayStore::open_slim(file.path(), 2).unwrap(),
        ]
    }

    #[test]
    fn test_bounds_checked_on_both_backends() {
        let ways = [WayRecord::new(1, 1), WayRecord::new(2, 2), WayRecord::new(3, 4)];
        let file = write_ways(&ways, b"\0");
        for store in both_stores(&file) {
            assert_eq!(store.count(), 3);
            assert!(store.way_at(2).is_ok());
            for bad in [3, u32::MAX] {
                assert!(matches!(
                    store.way_at(bad),
                    Err(StoreError::Index { count: 3, .. })
                ));
            }
        }
    }

    #[test]
    fn test_way_name() {
        let ways = [
            WayRecord::new(7, 1).with_name(0),
            WayRecord::new(7, 1).with_name(1),
        ];
        let file = write_ways(&ways, b"\0Rue de la Loi\0");
        for store in both_stores(&file) {
            assert_eq!(store.way_name(0).unwrap(), "");
            assert_eq!(store.way_name(1).unwrap(), "Rue de la Loi");
            assert_eq!(store.names_len(), 15);
        }
    }

    #[test]
    fn test_backends_agree_on_every_name_offset() {
        let chunk_edge = format!("\0{}\0tail\0", "y".repeat(63));
        let tables: [&[u8]; 5] = [
            b"\0High Street\0",
            b"\0High Street",
            b"ab\xffc\0\xfe\0",
            chunk_edge.as_bytes(),
            b"",
        ];

        for names in tables {
            let file = write_ways(&[WayRecord::new(1, 1)], names);
            let [mapped, slim] = both_stores(&file);
            for offset in 0..=names.len() as u32 + 1 {
                match (mapped.name_at(offset), slim.name_at(offset)) {
                    (Ok(a), Ok(b)) => assert_eq!(a, b, "offset {offset}"),
                    (Err(a), Err(b)) => assert_eq!(
                        std::mem::discriminant(&a),
                        std::mem::discriminant(&b),
                        "offset {offset}: {a} vs {b}"
                    ),
                    (a, b) => panic!("offset {offset}: mapped {a:?}, slim {b:?}"),
                }
            }
        }
    }

    #[test]
    fn test_iter_and_compare_at() {
        let ways = [
            WayRecord::new(1, 1).with_speed(50),
            WayRecord::new(1, 1).with_speed(50).with_name(3),
            WayRecord::new(2, 3).with_props(1).with_speed(30),
        ];
        let file = write_ways(&ways, b"\0\0\0\0");
        for store in both_stores(&file) {
            let collected: Vec<WayRecord> = store
                .iter()
                .map(|w| w.unwrap().to_record())
                .collect();
            assert_eq!(collected, ways);
            assert_eq!(store.compare_at(0, 1).unwrap(), Ordering::Equal);
            assert_eq!(store.compare_at(0, 2).unwrap(), Ordering::Less);
            assert!(store.compare_at(0, 3).is_err());
        }
    }

    #[test]
    fn test_zero_slot_options_rejected_before_open() {
        let err = WayStore::load("/nonexistent", &StoreOptions::slim(0)).unwrap_err();
        assert!(matches!(err, StoreError::Config(_)));
    }

    #[test]
    fn test_cache_stats_only_for_slim() {
        let file = write_ways(&[WayRecord::new(1, 1)], b"\0");
        let [mapped, slim] = both_stores(&file);
        assert!(mapped.cache_stats().is_none());
        slim.way_at(0).unwrap();
        assert_eq!(slim.cache_stats().unwrap().misses, 1);
        assert_eq!(slim.mode(), StoreMode::Slim);
        assert_eq!(mapped.mode(), StoreMode::Mapped);
    }
}
