//! CLI-specific utilities for butterfly-waystore
//!
//! Progress display and the error log live here, separate from the core
//! library, which only reports through the `log` facade.

pub mod errorlog;
pub mod progress;

pub use errorlog::ErrorLog;
pub use progress::ProgressManager;
