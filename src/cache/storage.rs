//! Cache storage backends
//!
//! A store maps a key to an opaque JSON payload. Validity is decided one
//! layer up, in [`super::LocalCache`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use rusqlite::{Connection, OptionalExtension, params};

use crate::error::CacheError;

/// Schema version - increment to trigger nuke-and-rebuild
const SCHEMA_VERSION: i32 = 2;

type Result<T> = std::result::Result<T, CacheError>;

/// Key/payload storage
pub trait CacheStore: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<String>>;

    /// Insert or replace the payload under `key`.
    fn store(&self, key: &str, payload: &str) -> Result<()>;

    /// Returns whether an entry was removed.
    fn remove(&self, key: &str) -> Result<bool>;

    /// On-disk location, for persistent stores
    fn location(&self) -> Option<&Path> {
        None
    }
}

/// SQLite-backed persistent store
pub struct SqliteStore {
    conn: Mutex<Connection>,
    db_path: PathBuf,
}

impl SqliteStore {
    /// Open or create the store at the default XDG cache location
    pub fn open() -> Result<Self> {
        let cache_dir = Self::cache_dir()?;
        Self::open_at(&cache_dir)
    }

    /// Get the cache directory path (~/.cache/folio on Linux)
    pub fn cache_dir() -> Result<PathBuf> {
        let cache_base = dirs::cache_dir().ok_or(CacheError::NoHome)?;
        Ok(cache_base.join("folio"))
    }

    /// Path of the database file inside `cache_dir`
    pub fn db_path(cache_dir: &Path) -> PathBuf {
        cache_dir.join("cache.db")
    }

    /// Open the store in a specific directory (for testing)
    pub fn open_at(cache_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(cache_dir)
            .map_err(|e| CacheError::Io(format!("Failed to create cache dir: {}", e)))?;

        let db_path = Self::db_path(cache_dir);
        let conn = Connection::open(&db_path)?;

        // Check schema version - nuke if mismatched
        let version: i32 = conn
            .pragma_query_value(None, "user_version", |r| r.get(0))
            .unwrap_or(0);

        if version != 0 && version != SCHEMA_VERSION {
            log::info!(
                "Cache schema version mismatch ({} != {}), rebuilding",
                version,
                SCHEMA_VERSION
            );
            drop(conn);
            Self::nuke(&db_path)?;
            return Self::open_at(cache_dir);
        }

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS cache_entries (
                cache_key TEXT PRIMARY KEY NOT NULL,
                payload TEXT NOT NULL
            );
            "#,
        )?;

        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;

        Ok(Self {
            conn: Mutex::new(conn),
            db_path,
        })
    }

    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let guard = self
            .conn
            .lock()
            .map_err(|_| CacheError::Io("Cache connection lock poisoned".to_string()))?;
        f(&guard)
    }

    /// Delete the database file
    fn nuke(db_path: &Path) -> Result<()> {
        if db_path.exists() {
            std::fs::remove_file(db_path)
                .map_err(|e| CacheError::Io(format!("Failed to remove cache DB: {}", e)))?;
        }
        Ok(())
    }
}

impl CacheStore for SqliteStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        self.with_conn(|conn| {
            let payload = conn
                .query_row(
                    "SELECT payload FROM cache_entries WHERE cache_key = ?1",
                    [key],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(payload)
        })
    }

    fn store(&self, key: &str, payload: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT OR REPLACE INTO cache_entries (cache_key, payload) VALUES (?1, ?2)",
                params![key, payload],
            )?;
            Ok(())
        })
    }

    fn remove(&self, key: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let deleted = conn.execute("DELETE FROM cache_entries WHERE cache_key = ?1", [key])?;
            Ok(deleted > 0)
        })
    }

    fn location(&self) -> Option<&Path> {
        Some(&self.db_path)
    }
}

/// Session-only store
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| CacheError::Io("Memory cache lock poisoned".to_string()))
    }
}

impl CacheStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn store(&self, key: &str, payload: &str) -> Result<()> {
        self.entries()?.insert(key.to_string(), payload.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        Ok(self.entries()?.remove(key).is_some())
    }
}
