//! Mock hosting API client for testing
//!
//! Provides a mock implementation of [`RepoHostApi`] for unit testing
//! without making real API calls.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use super::models::{
    CommitDetail, CommitPerson, CommitSummary, ContentFile, ContentItem, RepoId,
    RepositoryMetadata, TreeEntry,
};
use super::{ApiResult, RepoHostApi};
use crate::error::ApiError;

/// Mock API client for testing.
///
/// Configure expected responses via builder methods, then use in tests.
///
/// # Example
/// ```ignore
/// let mock = MockRepoHost::new()
///     .with_repository(repo("alice/dotfiles"))
///     .await;
///
/// let repo = mock.get_repository(&RepoId::new("alice", "dotfiles")).await?;
/// ```
#[derive(Default)]
pub struct MockRepoHost {
    /// Repositories keyed by `owner/name`; anything else is NotFound
    repositories: Arc<Mutex<HashMap<String, RepositoryMetadata>>>,
    /// Root listing of the write-ups repository
    contents: Arc<Mutex<Option<Vec<ContentItem>>>>,
    /// Latest commit date per path; `None` means no history
    commit_dates: Arc<Mutex<HashMap<String, Option<DateTime<Utc>>>>>,
    /// Paths whose commit lookup fails
    failing_commits: Arc<Mutex<Vec<String>>>,
    /// Recursive tree snapshot
    tree: Arc<Mutex<Option<Vec<TreeEntry>>>>,
    /// Number of leading get_tree calls that fail before succeeding
    tree_failures: Arc<Mutex<usize>>,
    /// Artificial latency added to every get_tree call
    tree_delay: Arc<Mutex<Option<Duration>>>,
    /// Raw documents keyed by full URL
    raw_documents: Arc<Mutex<HashMap<String, String>>>,
    /// Contents-API files keyed by path
    files: Arc<Mutex<HashMap<String, ContentFile>>>,
    /// Error to return (if any) - consumed on first use
    error: Arc<Mutex<Option<ApiError>>>,
    /// Track number of calls for verification
    call_count: Arc<Mutex<CallCounts>>,
}

/// Tracks API call counts for test verification
#[derive(Default, Debug, Clone)]
pub struct CallCounts {
    pub get_repository: usize,
    pub list_contents: usize,
    pub latest_commit: usize,
    pub get_tree: usize,
    pub get_file: usize,
    pub fetch_raw: usize,
}

impl CallCounts {
    /// Get total number of API calls made.
    pub fn total(&self) -> usize {
        self.get_repository
            + self.list_contents
            + self.latest_commit
            + self.get_tree
            + self.get_file
            + self.fetch_raw
    }
}

impl MockRepoHost {
    /// Create a new mock client with default (empty) responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a repository answered by get_repository.
    pub async fn with_repository(self, repo: RepositoryMetadata) -> Self {
        self.repositories
            .lock()
            .await
            .insert(repo.full_name.clone(), repo);
        self
    }

    /// Configure the root listing returned by list_contents.
    pub async fn with_contents(self, items: Vec<ContentItem>) -> Self {
        *self.contents.lock().await = Some(items);
        self
    }

    /// Configure the latest commit date for a path.
    pub async fn with_commit_date(self, path: &str, date: Option<DateTime<Utc>>) -> Self {
        self.commit_dates
            .lock()
            .await
            .insert(path.to_string(), date);
        self
    }

    /// Make the commit lookup for a path fail.
    pub async fn with_failing_commit(self, path: &str) -> Self {
        self.failing_commits.lock().await.push(path.to_string());
        self
    }

    /// Configure the tree snapshot returned by get_tree.
    pub async fn with_tree(self, entries: Vec<TreeEntry>) -> Self {
        *self.tree.lock().await = Some(entries);
        self
    }

    /// Fail the first `count` get_tree calls with a network error.
    pub async fn with_tree_failures(self, count: usize) -> Self {
        *self.tree_failures.lock().await = count;
        self
    }

    /// Delay every get_tree call.
    pub async fn with_tree_delay(self, delay: Duration) -> Self {
        *self.tree_delay.lock().await = Some(delay);
        self
    }

    /// Serve a raw document at `url`.
    pub async fn with_raw_document(self, url: &str, body: &str) -> Self {
        self.raw_documents
            .lock()
            .await
            .insert(url.to_string(), body.to_string());
        self
    }

    /// Serve a contents-API file.
    pub async fn with_file(self, file: ContentFile) -> Self {
        self.files.lock().await.insert(file.path.clone(), file);
        self
    }

    /// Configure an error to return on the next API call.
    /// The error is consumed after one use.
    pub async fn with_error(self, error: ApiError) -> Self {
        *self.error.lock().await = Some(error);
        self
    }

    /// Get the call counts for verification in tests.
    pub async fn call_counts(&self) -> CallCounts {
        self.call_count.lock().await.clone()
    }

    /// Check if there's a pending error and consume it.
    async fn check_error(&self) -> ApiResult<()> {
        match self.error.lock().await.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RepoHostApi for MockRepoHost {
    async fn get_repository(&self, id: &RepoId) -> ApiResult<RepositoryMetadata> {
        self.call_count.lock().await.get_repository += 1;
        self.check_error().await?;

        self.repositories
            .lock()
            .await
            .get(&id.to_string())
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("repository {}", id)))
    }

    async fn list_contents(&self, owner: &str, repo: &str) -> ApiResult<Vec<ContentItem>> {
        self.call_count.lock().await.list_contents += 1;
        self.check_error().await?;

        self.contents
            .lock()
            .await
            .clone()
            .ok_or_else(|| ApiError::NotFound(format!("contents of {}/{}", owner, repo)))
    }

    async fn latest_commit(
        &self,
        _owner: &str,
        _repo: &str,
        path: &str,
    ) -> ApiResult<Option<CommitSummary>> {
        self.call_count.lock().await.latest_commit += 1;
        self.check_error().await?;

        if self.failing_commits.lock().await.iter().any(|p| p == path) {
            return Err(ApiError::Status {
                status: 500,
                message: "Internal Server Error".to_string(),
            });
        }

        let date = self.commit_dates.lock().await.get(path).copied().flatten();
        Ok(date.map(|date| CommitSummary {
            commit: CommitDetail {
                committer: Some(CommitPerson { date: Some(date) }),
            },
        }))
    }

    async fn get_tree(
        &self,
        owner: &str,
        repo: &str,
        _git_ref: &str,
    ) -> ApiResult<Vec<TreeEntry>> {
        self.call_count.lock().await.get_tree += 1;

        let delay = *self.tree_delay.lock().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.check_error().await?;

        {
            let mut failures = self.tree_failures.lock().await;
            if *failures > 0 {
                *failures -= 1;
                return Err(ApiError::Network("connection reset".to_string()));
            }
        }

        self.tree
            .lock()
            .await
            .clone()
            .ok_or_else(|| ApiError::malformed(format!("tree of {}/{}", owner, repo), "missing tree data"))
    }

    async fn get_file(
        &self,
        _owner: &str,
        _repo: &str,
        path: &str,
        _git_ref: &str,
    ) -> ApiResult<ContentFile> {
        self.call_count.lock().await.get_file += 1;
        self.check_error().await?;

        self.files
            .lock()
            .await
            .get(path)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("file {}", path)))
    }

    async fn fetch_raw(&self, url: &str) -> ApiResult<String> {
        self.call_count.lock().await.fetch_raw += 1;
        self.check_error().await?;

        self.raw_documents
            .lock()
            .await
            .get(url)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(url.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::models::EntryKind;

    fn repo(full_name: &str) -> RepositoryMetadata {
        let name = full_name.split('/').nth(1).unwrap_or(full_name).to_string();
        RepositoryMetadata {
            name,
            full_name: full_name.to_string(),
            description: None,
            html_url: format!("https://github.com/{}", full_name),
            topics: vec![],
            stargazers_count: 0,
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_mock_client_default_empty() {
        let mock = MockRepoHost::new();

        let err = mock
            .get_repository(&RepoId::new("alice", "dotfiles"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
        assert!(mock.list_contents("alice", "CTF").await.is_err());
    }

    #[tokio::test]
    async fn test_mock_client_with_repository() {
        let mock = MockRepoHost::new()
            .with_repository(repo("alice/dotfiles"))
            .await;

        let found = mock
            .get_repository(&RepoId::new("alice", "dotfiles"))
            .await
            .unwrap();
        assert_eq!(found.name, "dotfiles");
    }

    #[tokio::test]
    async fn test_mock_client_with_error() {
        let mock = MockRepoHost::new()
            .with_repository(repo("alice/dotfiles"))
            .await
            .with_error(ApiError::Network("down".to_string()))
            .await;
        let id = RepoId::new("alice", "dotfiles");

        // First call returns error
        assert!(mock.get_repository(&id).await.is_err());
        // Second call succeeds (error consumed)
        assert!(mock.get_repository(&id).await.is_ok());
    }

    #[tokio::test]
    async fn test_mock_client_tree_failures() {
        let mock = MockRepoHost::new()
            .with_tree(vec![TreeEntry::blob("README.md")])
            .await
            .with_tree_failures(2)
            .await;

        assert!(mock.get_tree("a", "b", "main").await.is_err());
        assert!(mock.get_tree("a", "b", "main").await.is_err());
        let tree = mock.get_tree("a", "b", "main").await.unwrap();
        assert_eq!(tree[0].kind, EntryKind::Blob);
        assert_eq!(mock.call_counts().await.get_tree, 3);
    }

    #[tokio::test]
    async fn test_mock_client_commit_dates() {
        let date = Utc::now();
        let mock = MockRepoHost::new()
            .with_commit_date("pwn", Some(date))
            .await
            .with_commit_date("misc", None)
            .await
            .with_failing_commit("web")
            .await;

        let pwn = mock.latest_commit("a", "b", "pwn").await.unwrap();
        assert_eq!(pwn.and_then(|c| c.committed_at()), Some(date));
        assert!(mock.latest_commit("a", "b", "misc").await.unwrap().is_none());
        assert!(mock.latest_commit("a", "b", "web").await.is_err());
    }

    #[tokio::test]
    async fn test_mock_client_call_counts() {
        let mock = MockRepoHost::new();

        let _ = mock.fetch_raw("https://raw/x").await;
        let _ = mock.fetch_raw("https://raw/y").await;
        let _ = mock.get_file("a", "b", "c", "main").await;

        let counts = mock.call_counts().await;
        assert_eq!(counts.fetch_raw, 2);
        assert_eq!(counts.get_file, 1);
        assert_eq!(counts.total(), 3);
    }
}
