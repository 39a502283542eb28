//! Local cache for fetched listings
//!
//! Two categories of data are cached, each under a fixed key with a fixed
//! TTL. Validity is checked on every read; nothing sweeps in the background.

pub mod client;
pub mod clock;
pub mod local;
pub mod storage;

use std::fmt;
use std::time::Duration;

use serde::Serialize;

/// How long a cached listing stays valid
pub const CACHE_TTL: Duration = Duration::from_secs(10 * 60);

/// Kinds of cached data
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheCategory {
    /// Project repository metadata
    Repositories,
    /// Top-level write-up directories
    Writeups,
}

impl CacheCategory {
    pub const ALL: [CacheCategory; 2] = [CacheCategory::Repositories, CacheCategory::Writeups];

    /// Storage key
    pub fn key(&self) -> &'static str {
        match self {
            CacheCategory::Repositories => "github_repos_cache",
            CacheCategory::Writeups => "github_writeups_cache",
        }
    }
}

impl fmt::Display for CacheCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheCategory::Repositories => write!(f, "repositories"),
            CacheCategory::Writeups => write!(f, "writeups"),
        }
    }
}

// Re-export main types
pub use client::CachedContent;
pub use clock::{Clock, SystemClock};
pub use local::{CacheEntry, LocalCache};
pub use storage::{CacheStore, MemoryStore, SqliteStore};
