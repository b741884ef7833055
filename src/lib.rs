//! # Butterfly-waystore
//!
//! Indexed, read-only access to the way attribute table of a compiled
//! routing network.
//!
//! A ways file holds fixed-size way records (highway class, permitted
//! transports, properties, physical limits) followed by a table of
//! NUL-terminated names. [`WayStore`] serves it through one of two backends:
//!
//! - **mapped**: the whole file is memory-mapped and records are zero-copy
//!   views into it.
//! - **slim**: the file stays open and a fixed number of decoded records is
//!   kept in a direct-mapped cache, bounding resident memory for very large
//!   networks.
//!
//! Both give identical answers; the choice is purely a memory/latency trade.
//!
//! ```rust,no_run
//! use butterfly_waystore::{StoreOptions, WayStore};
//!
//! # fn main() -> butterfly_waystore::Result<()> {
//! let store = WayStore::load("ways.mem", &StoreOptions::slim(4096))?;
//! for index in 0..store.count() {
//!     let way = store.way_at(index)?;
//!     println!("{} {:?} {}", index, way.highway(), store.name_at(way.name_offset())?);
//! }
//! # Ok(())
//! # }
//! ```

pub mod core;

pub use crate::core::compare::{compare, same_attributes, sort_by_attributes};
pub use crate::core::layout::{FileHeader, WayRecord, HEADER_SIZE, RECORD_SIZE};
pub use crate::core::slim::CacheStats;
pub use crate::core::summary::WaySummary;
pub use crate::core::types::{Highway, Property, Transport};
pub use crate::core::verify::{verify_store, Issue, VerifyReport};
pub use crate::core::{Result, StoreError, StoreMode, StoreOptions, WayBackend, WayRef, WayStore};
