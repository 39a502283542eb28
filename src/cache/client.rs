//! Read-through caching for listings
//!
//! Wraps a [`ContentClient`]. The cache is optional: with `--no-cache` every
//! call goes straight to the hosting API and nothing is written.

use log::{debug, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{CacheCategory, LocalCache};
use crate::client::{RepoHostApi, RepoId, RepositoryMetadata};
use crate::content::{ContentClient, WriteupDir};

/// Cached wrapper around a [`ContentClient`].
pub struct CachedContent<C> {
    content: ContentClient<C>,
    cache: Option<LocalCache>,
}

impl<C: RepoHostApi + 'static> CachedContent<C> {
    /// `cache: None` disables caching entirely.
    pub fn new(content: ContentClient<C>, cache: Option<LocalCache>) -> Self {
        Self { content, cache }
    }

    /// The uncached client, for operations that are never cached
    pub fn content(&self) -> &ContentClient<C> {
        &self.content
    }

    /// Try to get cached data
    fn get_cached<T: DeserializeOwned>(&self, category: CacheCategory) -> Option<Vec<T>> {
        let cache = self.cache.as_ref()?;
        let hit = cache.get(category);
        match &hit {
            Some(_) => debug!("Cache hit: {}", category.key()),
            None => debug!("Cache miss: {}", category.key()),
        }
        hit
    }

    /// Store data in cache
    fn set_cached<T: Serialize>(&self, category: CacheCategory, data: &[T]) {
        if let Some(cache) = &self.cache
            && let Err(e) = cache.put(category, data)
        {
            warn!("Failed to cache {}: {}", category.key(), e);
        }
    }

    /// Project repositories, from cache while valid.
    ///
    /// An empty result (every lookup failed) is cached like any other.
    pub async fn repositories(&self, ids: &[RepoId]) -> Vec<RepositoryMetadata> {
        if let Some(cached) = self.get_cached(CacheCategory::Repositories) {
            return cached;
        }

        let repos = self.content.fetch_repositories_batch(ids).await;
        self.set_cached(CacheCategory::Repositories, &repos);
        repos
    }

    /// Write-up directory listing, from cache while valid.
    pub async fn writeups(&self, owner: &str, repo: &str, branch: &str) -> Vec<WriteupDir> {
        if let Some(cached) = self.get_cached(CacheCategory::Writeups) {
            return cached;
        }

        let dirs = self.content.fetch_directory_listing(owner, repo, branch).await;
        self.set_cached(CacheCategory::Writeups, &dirs);
        dirs
    }
}
