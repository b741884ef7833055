//! Core modules of the way store
//!
//! Leaf-first: `types` and `layout` describe the file, `compare` orders
//! records, `mapped` and `slim` implement [`backend::WayBackend`], and
//! `store` puts one facade over both.

pub mod backend;
pub mod compare;
pub mod config;
pub mod error;
pub mod layout;
pub mod mapped;
pub mod slim;
pub mod store;
pub mod summary;
pub mod types;
pub mod verify;

pub use backend::{WayBackend, WayRef};
pub use config::{StoreMode, StoreOptions};
pub use error::{Result, StoreError};
pub use layout::{FileHeader, WayRecord};
pub use store::WayStore;
