//! Storage backend abstraction
//!
//! A backend gives indexed access to way records and to the name table of
//! one ways file. Callers go through [`crate::WayStore`], which checks
//! indices before delegating; backends still refuse out-of-range requests
//! instead of reading outside their data.

use std::borrow::Cow;
use std::ops::Deref;

use super::config::StoreMode;
use super::error::Result;
use super::layout::{FileHeader, WayRecord};
use super::slim::CacheStats;

/// A way record handed out by a backend.
///
/// Mapped backends lend a view into the mapping; the slim backend hands out a
/// copy of its cached value. Either way the record dereferences to
/// [`WayRecord`].
#[derive(Debug, Clone, Copy)]
pub enum WayRef<'a> {
    Mapped(&'a WayRecord),
    Cached(WayRecord),
}

impl WayRef<'_> {
    /// Owned copy of the record
    pub fn to_record(&self) -> WayRecord {
        **self
    }

    /// True if the record is a zero-copy view into mapped memory
    pub fn is_borrowed(&self) -> bool {
        matches!(self, WayRef::Mapped(_))
    }
}

impl Deref for WayRef<'_> {
    type Target = WayRecord;

    fn deref(&self) -> &WayRecord {
        match self {
            WayRef::Mapped(way) => way,
            WayRef::Cached(way) => way,
        }
    }
}

/// Indexed access to records and names of one ways file
pub trait WayBackend: Send + Sync {
    fn mode(&self) -> StoreMode;

    fn header(&self) -> &FileHeader;

    /// Size of the name table in bytes
    fn names_len(&self) -> u64;

    /// Record at `index`; `index` must be below `header().count`
    fn way(&self, index: u32) -> Result<WayRef<'_>>;

    /// NUL-terminated name starting `offset` bytes into the name table
    fn name(&self, offset: u32) -> Result<Cow<'_, str>>;

    /// Hit/miss counters, for backends that cache
    fn cache_stats(&self) -> Option<CacheStats> {
        None
    }
}

/// Length of the string at the start of `bytes`, if a NUL terminates it
pub(crate) fn terminated_len(bytes: &[u8]) -> Option<usize> {
    bytes.iter().position(|&b| b == 0)
}

/// Problem with a name table that still lets the file load.
///
/// `last_byte` is the final byte of the table, `None` when it is empty.
pub(crate) fn name_table_warning(count: u32, last_byte: Option<u8>) -> Option<String> {
    match last_byte {
        Some(0) => None,
        Some(_) => Some("name table does not end with NUL; its last name is unreadable".to_string()),
        None if count > 0 => Some(format!("{} ways but no name table", count)),
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_way_ref_derefs_to_record() {
        let record = WayRecord::new(3, 0x7).with_speed(60);
        let mapped = WayRef::Mapped(&record);
        let cached = WayRef::Cached(record);
        assert_eq!(mapped.speed(), 60);
        assert_eq!(cached.speed(), 60);
        assert!(mapped.is_borrowed());
        assert!(!cached.is_borrowed());
        assert_eq!(mapped.to_record(), cached.to_record());
    }

    #[test]
    fn test_name_table_warning() {
        assert_eq!(name_table_warning(3, Some(0)), None);
        assert_eq!(name_table_warning(0, None), None);
        assert_eq!(
            name_table_warning(3, None).as_deref(),
            Some("3 ways but no name table")
        );
        assert!(name_table_warning(1, Some(b'x')).unwrap().contains("does not end with NUL"));
    }

    #[test]
    fn test_terminated_len() {
        assert_eq!(terminated_len(b"Main St\0Side St\0"), Some(7));
        assert_eq!(terminated_len(b"\0"), Some(0));
        assert_eq!(terminated_len(b"no end"), None);
    }
}
