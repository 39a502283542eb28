//! Cache management commands

use crate::cache::{LocalCache, SqliteStore};
use crate::cli::OutputFormat;
use crate::error::Result;
use crate::models::CacheStatusDisplay;
use crate::output::Formattable;

/// Show validity of each cached listing
pub fn status(format: OutputFormat) -> Result<()> {
    let cache = LocalCache::open_default();
    let rows: Vec<CacheStatusDisplay> = cache
        .status()
        .into_iter()
        .map(CacheStatusDisplay::from)
        .collect();

    match format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "entries": rows,
                "path": location(&cache),
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        _ => {
            println!("Location: {}", location(&cache));
            rows.print(format)?;
        }
    }

    Ok(())
}

/// Clear all cache entries
pub fn clear(format: OutputFormat) -> Result<()> {
    let removed = LocalCache::open_default().invalidate_all()?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "entries_removed": removed,
                "success": true,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        _ => {
            if removed > 0 {
                println!("Cleared {} cache entries", removed);
            } else {
                println!("Cache was already empty");
            }
        }
    }

    Ok(())
}

/// Show cache path
pub fn path() -> Result<()> {
    let dir = SqliteStore::cache_dir()?;
    println!("{}", SqliteStore::db_path(&dir).display());
    Ok(())
}

fn location(cache: &LocalCache) -> String {
    cache
        .location()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "memory (session only)".to_string())
}
