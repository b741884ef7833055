//! Store options: backend selection and slim cache sizing
//!
//! Options can be given in code, loaded from a TOML file, or overridden from
//! the command line.
//!
//! ```toml
//! mode = "slim"
//! cache_slots = 4096
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::{Result, StoreError};

/// Default number of slim cache slots
pub const DEFAULT_CACHE_SLOTS: usize = 1024;

/// Backend used to serve a ways file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreMode {
    /// Map the whole file; zero-copy record access
    #[default]
    Mapped,
    /// Keep the file open and cache a bounded number of decoded records
    Slim,
}

impl StoreMode {
    pub fn name(&self) -> &'static str {
        match self {
            StoreMode::Mapped => "mapped",
            StoreMode::Slim => "slim",
        }
    }
}

impl fmt::Display for StoreMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StoreMode {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "mapped" | "mmap" => Ok(StoreMode::Mapped),
            "slim" => Ok(StoreMode::Slim),
            other => Err(StoreError::Config(format!(
                "unknown store mode '{other}' (expected 'mapped' or 'slim')"
            ))),
        }
    }
}

/// Options for [`crate::WayStore::load`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreOptions {
    pub mode: StoreMode,
    /// Slot count of the slim cache; ignored by the mapped backend
    pub cache_slots: usize,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            mode: StoreMode::Mapped,
            cache_slots: DEFAULT_CACHE_SLOTS,
        }
    }
}

impl StoreOptions {
    pub fn mapped() -> Self {
        Self::default()
    }

    pub fn slim(cache_slots: usize) -> Self {
        Self {
            mode: StoreMode::Slim,
            cache_slots,
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let options: StoreOptions =
            toml::from_str(text).map_err(|e| StoreError::Config(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.cache_slots == 0 {
            return Err(StoreError::Config(
                "cache_slots must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
