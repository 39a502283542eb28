//! Display models for CLI output
//!
//! Converts fetched content into CLI-friendly rows for table and JSON output.

pub mod display;

pub use display::{CacheStatusDisplay, ProjectDisplay, WriteupDisplay};
