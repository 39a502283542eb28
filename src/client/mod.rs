//! Repository-hosting API client

use async_trait::async_trait;

use crate::error::ApiError;

pub mod github;
#[cfg(test)]
pub mod mock;
pub mod models;
pub mod parallel;
pub mod rate_limit;
pub mod retry;

pub use github::{ClientMode, GitHubClient};
#[cfg(test)]
pub use mock::MockRepoHost;
pub use models::{
    CommitSummary, ContentFile, ContentItem, ContentKind, EntryKind, RepoId, RepositoryMetadata,
    TreeEntry,
};

/// Result of a single hosting API call, before any failure is absorbed
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Read operations consumed from the repository-hosting API.
///
/// Every method performs exactly one request. Retry and failure absorption
/// live one layer up in [`crate::content::ContentClient`].
#[async_trait]
pub trait RepoHostApi: Send + Sync {
    /// `GET /repos/{owner}/{repo}`
    async fn get_repository(&self, id: &RepoId) -> ApiResult<RepositoryMetadata>;

    /// `GET /repos/{owner}/{repo}/contents`
    async fn list_contents(&self, owner: &str, repo: &str) -> ApiResult<Vec<ContentItem>>;

    /// Most recent commit touching `path`, if any
    async fn latest_commit(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
    ) -> ApiResult<Option<CommitSummary>>;

    /// Recursive snapshot of the tree at `git_ref`
    async fn get_tree(&self, owner: &str, repo: &str, git_ref: &str)
    -> ApiResult<Vec<TreeEntry>>;

    /// A single file through the contents API (base64 body)
    async fn get_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        git_ref: &str,
    ) -> ApiResult<ContentFile>;

    /// Plain GET of a raw-content URL
    async fn fetch_raw(&self, url: &str) -> ApiResult<String>;
}
