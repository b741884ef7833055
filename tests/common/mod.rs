//! Shared fixtures: small ways files written to temporary storage

#![allow(dead_code)]

use std::io::Write;

use butterfly_waystore::{FileHeader, WayRecord, WayStore};
use tempfile::NamedTempFile;

/// Builds a ways file from records and names, assigning name offsets
#[derive(Default)]
pub struct WaysFileBuilder {
    ways: Vec<WayRecord>,
    names: Vec<u8>,
}

impl WaysFileBuilder {
    pub fn new() -> Self {
        // Offset 0 is the empty name
        Self {
            ways: Vec::new(),
            names: vec![0],
        }
    }

    /// Add a way without a name
    pub fn way(mut self, way: WayRecord) -> Self {
        self.ways.push(way.with_name(0));
        self
    }

    /// Add a way whose name is appended to the name table
    pub fn named(mut self, way: WayRecord, name: &str) -> Self {
        let offset = self.names.len() as u32;
        self.names.extend_from_slice(name.as_bytes());
        self.names.push(0);
        self.ways.push(way.with_name(offset));
        self
    }

    pub fn ways(&self) -> &[WayRecord] {
        &self.ways
    }

    pub fn write(&self) -> NamedTempFile {
        write_raw(&FileHeader::summarize(&self.ways).encode(), &self.ways, &self.names)
    }
}

/// Write a file from an already-encoded header, records and name bytes
pub fn write_raw(header: &[u8], ways: &[WayRecord], names: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(header).expect("write header");
    for way in ways {
        file.write_all(way.encode()).expect("write record");
    }
    file.write_all(names).expect("write names");
    file.flush().expect("flush temp file");
    file
}

/// Two identical motorway ways and a paved trunk way open to two transports
pub fn sample_ways() -> [WayRecord; 3] {
    [
        WayRecord::new(1, 0x1).with_speed(50),
        WayRecord::new(1, 0x1).with_speed(50),
        WayRecord::new(2, 0x3).with_props(1).with_speed(30),
    ]
}

/// Ways with distinct attributes, `n` of them
pub fn numbered_ways(n: u32) -> Vec<WayRecord> {
    (0..n)
        .map(|i| {
            WayRecord::new(1 + (i % 13) as u8, 1 << (i % 10))
                .with_props((i % 64) as u8)
                .with_speed((i % 250) as u8)
                .with_limits((i % 7) as u8, (i % 11) as u8, 0, (i % 3) as u8)
        })
        .collect()
}

/// Mapped and slim stores over the same file
pub fn both_stores(file: &NamedTempFile, cache_slots: usize) -> [WayStore; 2] {
    [
        WayStore::open_mapped(file.path()).expect("open mapped"),
        WayStore::open_slim(file.path(), cache_slots).expect("open slim"),
    ]
}
