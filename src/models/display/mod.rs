//! Display model implementations for table and JSON output
//!
//! Display models transform fetched types into CLI-friendly formats
//! with appropriate column names and serialization.

mod cache;
mod project;
mod writeup;

pub use cache::CacheStatusDisplay;
pub use project::ProjectDisplay;
pub use writeup::WriteupDisplay;
