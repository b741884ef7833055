//! ways.mem format - fixed-size way records plus a shared name table
//!
//! Format (little-endian, mmap-friendly):
//!
//! Header (32 bytes):
//!   magic:        u32 = 0x59415757  // "WWAY"
//!   version:      u16 = 1
//!   record_size:  u16 = 16
//!   count:        u32
//!   highways:     u16  // union of highway class bits
//!   allow:        u16  // union of transport bits
//!   props:        u8   // union of property bits
//!   reserved:     [7]u8
//!   names_offset: u64  // == 32 + count * 16
//!
//! Body (count records):
//!   name:     u32  // byte offset into the name table
//!   allow:    u16
//!   type:     u8   // highway class | ONEWAY | ROUNDABOUT
//!   props:    u8
//!   speed:    u8   // km/h
//!   weight:   u8   // 0.2 tonnes
//!   height:   u8   // 0.1 m
//!   width:    u8   // 0.1 m
//!   length:   u8   // 0.1 m
//!   reserved: [3]u8
//!
//! Name table (rest of file):
//!   NUL-terminated UTF-8 strings, referenced by byte offset

use std::ops::Range;
use std::path::Path;

use bytemuck::{Pod, Zeroable};

use super::error::{Result, StoreError};
use super::types::{Highway, Property, Transport, HIGHWAY_MASK, ONEWAY, ROUNDABOUT};

pub const MAGIC: u32 = 0x59415757; // "WWAY"
pub const VERSION: u16 = 1;
pub const HEADER_SIZE: usize = 32;
pub const RECORD_SIZE: usize = 16;

/// Byte offset of record `index`
pub fn record_offset(index: u32) -> u64 {
    HEADER_SIZE as u64 + index as u64 * RECORD_SIZE as u64
}

/// Byte offset of the name table for a file holding `count` records
pub fn names_offset(count: u32) -> u64 {
    record_offset(count)
}

/// One way's routing attributes, exactly as laid out on disk.
///
/// Multi-byte fields hold little-endian values; use the accessors.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct WayRecord {
    name: u32,
    allow: u16,
    way_type: u8,
    props: u8,
    speed: u8,
    weight: u8,
    height: u8,
    width: u8,
    length: u8,
    reserved: [u8; 3],
}

const _: () = assert!(std::mem::size_of::<WayRecord>() == RECORD_SIZE);

impl WayRecord {
    /// A way of the given type with no properties and no limits
    pub fn new(way_type: u8, allow: u16) -> Self {
        Self {
            allow: allow.to_le(),
            way_type,
            ..Self::zeroed()
        }
    }

    pub fn with_name(mut self, name_offset: u32) -> Self {
        self.name = name_offset.to_le();
        self
    }

    pub fn with_props(mut self, props: u8) -> Self {
        self.props = props;
        self
    }

    pub fn with_speed(mut self, speed: u8) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_limits(mut self, weight: u8, height: u8, width: u8, length: u8) -> Self {
        self.weight = weight;
        self.height = height;
        self.width = width;
        self.length = length;
        self
    }

    /// Decode a record from its on-disk bytes
    pub fn decode(bytes: &[u8; RECORD_SIZE]) -> Self {
        bytemuck::pod_read_unaligned(bytes)
    }

    /// On-disk bytes of this record
    pub fn encode(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }

    pub fn name_offset(&self) -> u32 {
        u32::from_le(self.name)
    }

    pub fn allow(&self) -> u16 {
        u16::from_le(self.allow)
    }

    pub fn way_type(&self) -> u8 {
        self.way_type
    }

    pub fn props(&self) -> u8 {
        self.props
    }

    pub fn speed(&self) -> u8 {
        self.speed
    }

    pub fn weight(&self) -> u8 {
        self.weight
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn length(&self) -> u8 {
        self.length
    }

    /// Highway class, `None` if the class code is unknown
    pub fn highway(&self) -> Option<Highway> {
        Highway::from_code(self.way_type)
    }

    pub fn highway_code(&self) -> u8 {
        self.way_type & HIGHWAY_MASK
    }

    pub fn is_oneway(&self) -> bool {
        self.way_type & ONEWAY != 0
    }

    pub fn is_roundabout(&self) -> bool {
        self.way_type & ROUNDABOUT != 0
    }

    pub fn allows(&self, transport: Transport) -> bool {
        self.allow() & transport.bit() != 0
    }

    pub fn has_property(&self, property: Property) -> bool {
        self.props & property.bit() != 0
    }

    pub fn speed_kph(&self) -> u32 {
        self.speed as u32
    }

    pub fn weight_tonnes(&self) -> f64 {
        self.weight as f64 / 5.0
    }

    pub fn height_metres(&self) -> f64 {
        self.height as f64 / 10.0
    }

    pub fn width_metres(&self) -> f64 {
        self.width as f64 / 10.0
    }

    pub fn length_metres(&self) -> f64 {
        self.length as f64 / 10.0
    }
}

/// Decoded file header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    pub count: u32,
    pub highways: u16,
    pub allow: u16,
    pub props: u8,
    pub names_offset: u64,
}

impl FileHeader {
    pub fn new(count: u32, highways: u16, allow: u16, props: u8) -> Self {
        Self {
            count,
            highways,
            allow,
            props,
            names_offset: names_offset(count),
        }
    }

    /// Header whose summary masks cover every record in `ways`
    pub fn summarize(ways: &[WayRecord]) -> Self {
        let mut highways = 0u16;
        let mut allow = 0u16;
        let mut props = 0u8;
        for way in ways {
            if let Some(h) = way.highway() {
                highways |= h.bit();
            }
            allow |= way.allow();
            props |= way.props();
        }
        Self::new(ways.len() as u32, highways, allow, props)
    }

    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let mut header = [0u8; HEADER_SIZE];
        header[0..4].copy_from_slice(&MAGIC.to_le_bytes());
        header[4..6].copy_from_slice(&VERSION.to_le_bytes());
        header[6..8].copy_from_slice(&(RECORD_SIZE as u16).to_le_bytes());
        header[8..12].copy_from_slice(&self.count.to_le_bytes());
        header[12..14].copy_from_slice(&self.highways.to_le_bytes());
        header[14..16].copy_from_slice(&self.allow.to_le_bytes());
        header[16] = self.props;
        header[24..32].copy_from_slice(&self.names_offset.to_le_bytes());
        header
    }

    /// Parse and validate the fixed-size header prefix of `path`
    pub fn decode(bytes: &[u8], path: &Path) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(StoreError::format(
                path,
                format!(
                    "file too short: {} bytes, header needs {}",
                    bytes.len(),
                    HEADER_SIZE
                ),
            ));
        }

        let magic = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        if magic != MAGIC {
            return Err(StoreError::format(
                path,
                format!("bad magic: expected 0x{:08x}, got 0x{:08x}", MAGIC, magic),
            ));
        }

        let version = u16::from_le_bytes([bytes[4], bytes[5]]);
        if version != VERSION {
            return Err(StoreError::format(
                path,
                format!("unsupported version {}", version),
            ));
        }

        let record_size = u16::from_le_bytes([bytes[6], bytes[7]]);
        if record_size as usize != RECORD_SIZE {
            return Err(StoreError::format(
                path,
                format!(
                    "record size {} does not match expected {}",
                    record_size, RECORD_SIZE
                ),
            ));
        }

        let count = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]);
        let highways = u16::from_le_bytes([bytes[12], bytes[13]]);
        let allow = u16::from_le_bytes([bytes[14], bytes[15]]);
        let props = bytes[16];
        let mut offset = [0u8; 8];
        offset.copy_from_slice(&bytes[24..32]);
        let stored_names_offset = u64::from_le_bytes(offset);

        let expected = names_offset(count);
        if stored_names_offset != expected {
            return Err(StoreError::format(
                path,
                format!(
                    "name table offset {} inconsistent with {} records (expected {})",
                    stored_names_offset, count, expected
                ),
            ));
        }

        Ok(Self {
            count,
            highways,
            allow,
            props,
            names_offset: stored_names_offset,
        })
    }

    /// Check the header against the actual file length
    pub fn check_file_len(&self, file_len: u64, path: &Path) -> Result<()> {
        if file_len < self.names_offset {
            return Err(StoreError::format(
                path,
                format!(
                    "truncated: {} records need {} bytes, file has {}",
                    self.count, self.names_offset, file_len
                ),
            ));
        }
        Ok(())
    }

    /// Size of the name table in a file of `file_len` bytes
    pub fn names_len(&self, file_len: u64) -> u64 {
        file_len.saturating_sub(self.names_offset)
    }

    /// Byte range of record `index` within the file
    pub fn record_range(&self, index: u32) -> Range<usize> {
        let start = record_offset(index) as usize;
        start..start + RECORD_SIZE
    }

    /// Byte range of the record array within the file
    pub fn records_range(&self) -> Range<usize> {
        HEADER_SIZE..self.names_offset as usize
    }
}
