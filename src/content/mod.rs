//! Content operations on top of the hosting API
//!
//! Every operation here absorbs remote failures: callers get an empty or
//! absent result (or [`Document::Failed`]) instead of an error, and the
//! failure is logged.

use std::sync::Arc;

use log::{debug, warn};

use crate::client::parallel::{DEFAULT_MAX_CONCURRENT, fetch_all_ordered};
use crate::client::retry::{RetryPolicy, retry};
use crate::client::{ContentKind, RepoHostApi, RepoId, RepositoryMetadata};
use crate::tree::{TreeNode, build_tree};

pub mod document;
pub mod listing;
pub mod urls;

pub use document::{Document, DocumentRequest};
pub use listing::{WriteupDir, sort_by_last_commit};
pub use urls::{FileLocation, UrlTemplates};

/// Remote content client
pub struct ContentClient<C> {
    client: Arc<C>,
    templates: UrlTemplates,
    tree_policy: RetryPolicy,
}

impl<C> Clone for ContentClient<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            templates: self.templates.clone(),
            tree_policy: self.tree_policy.clone(),
        }
    }
}

impl<C: RepoHostApi + 'static> ContentClient<C> {
    pub fn new(client: Arc<C>, templates: UrlTemplates) -> Self {
        Self {
            client,
            templates,
            tree_policy: RetryPolicy::tree_snapshot(),
        }
    }

    /// Override the retry schedule of [`Self::fetch_full_tree`].
    pub fn with_tree_policy(mut self, policy: RetryPolicy) -> Self {
        self.tree_policy = policy;
        self
    }

    pub fn templates(&self) -> &UrlTemplates {
        &self.templates
    }

    /// Metadata of one repository, or `None` on any failure.
    pub async fn fetch_repository(&self, id: &RepoId) -> Option<RepositoryMetadata> {
        match self.client.get_repository(id).await {
            Ok(repo) => Some(repo),
            Err(e) => {
                warn!("Skipping repository {}: {}", id, e);
                None
            }
        }
    }

    /// Metadata of every repository that could be fetched, in input order.
    ///
    /// All lookups are in flight before any is awaited.
    pub async fn fetch_repositories_batch(&self, ids: &[RepoId]) -> Vec<RepositoryMetadata> {
        let this = self.clone();
        let results = fetch_all_ordered(
            ids.to_vec(),
            move |id| {
                let this = this.clone();
                async move { this.fetch_repository(&id).await }
            },
            DEFAULT_MAX_CONCURRENT.max(ids.len()),
        )
        .await;

        let found: Vec<RepositoryMetadata> = results.into_iter().flatten().collect();
        debug!("Fetched {}/{} repositories", found.len(), ids.len());
        found
    }

    /// Top-level directories of a repository, most recently committed first.
    ///
    /// A failed listing yields an empty list; a failed commit lookup leaves
    /// that directory without a date.
    pub async fn fetch_directory_listing(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Vec<WriteupDir> {
        let items = match self.client.list_contents(owner, repo).await {
            Ok(items) => items,
            Err(e) => {
                warn!("Could not list {}/{}: {}", owner, repo, e);
                return Vec::new();
            }
        };

        let dirs: Vec<_> = items
            .into_iter()
            .filter(|item| item.kind == ContentKind::Dir)
            .collect();

        let client = Arc::clone(&self.client);
        let templates = self.templates.clone();
        let (owner_s, repo_s, branch_s) = (owner.to_string(), repo.to_string(), branch.to_string());
        let concurrency = DEFAULT_MAX_CONCURRENT.max(dirs.len());

        let mut listing = fetch_all_ordered(
            dirs,
            move |item| {
                let client = Arc::clone(&client);
                let templates = templates.clone();
                let (owner, repo, branch) = (owner_s.clone(), repo_s.clone(), branch_s.clone());
                async move {
                    let last_commit_date = match client.latest_commit(&owner, &repo, &item.path).await {
                        Ok(commit) => commit.and_then(|c| c.committed_at()),
                        Err(e) => {
                            debug!("No commit date for {}: {}", item.path, e);
                            None
                        }
                    };
                    let html_url = item.html_url.unwrap_or_else(|| {
                        templates.web_dir_url(&FileLocation::new(owner, repo, branch, item.path.as_str()))
                    });
                    WriteupDir {
                        name: item.name,
                        path: item.path,
                        html_url,
                        last_commit_date,
                    }
                }
            },
            concurrency,
        )
        .await;

        sort_by_last_commit(&mut listing);
        listing
    }

    /// Full recursive tree of a repository as a forest.
    ///
    /// Retries per the tree policy; returns an empty forest once every
    /// attempt has failed.
    pub async fn fetch_full_tree(&self, owner: &str, repo: &str, git_ref: &str) -> Vec<TreeNode> {
        let context = format!("tree of {}/{}", owner, repo);
        let snapshot = retry(&self.tree_policy, &context, || {
            self.client.get_tree(owner, repo, git_ref)
        })
        .await;

        match snapshot {
            Ok(entries) => build_tree(&entries),
            Err(_) => Vec::new(),
        }
    }

    /// Load a markdown document.
    ///
    /// The raw URL is tried first, then the contents API. Relative image
    /// sources in the loaded text are rewritten to absolute raw URLs.
    pub async fn fetch_document(&self, request: &DocumentRequest) -> Document {
        if request.is_blank() {
            warn!("No document path or URL given");
            return Document::Failed { web_url: None };
        }

        let location = match request {
            DocumentRequest::Url(url) => match self.templates.parse(url) {
                Some(location) => location,
                None => {
                    warn!("Cannot map {} to a raw content URL", url);
                    return Document::Failed { web_url: None };
                }
            },
            DocumentRequest::Location(location) => location.clone(),
        };

        let raw_url = self.templates.raw_url(&location);
        let web_url = self.templates.web_url(&location);

        let content = match self.client.fetch_raw(&raw_url).await {
            Ok(content) => Some(content),
            Err(e) => {
                debug!("Raw fetch failed ({}), trying contents API", e);
                self.fetch_via_contents_api(&location).await
            }
        };

        match content {
            Some(content) => Document::Loaded {
                content: self.templates.rewrite_relative_images(&location, &content),
                web_url,
            },
            None => Document::Failed {
                web_url: Some(web_url),
            },
        }
    }

    async fn fetch_via_contents_api(&self, loc: &FileLocation) -> Option<String> {
        let file = self
            .client
            .get_file(&loc.owner, &loc.repo, &loc.path, &loc.branch)
            .await
            .map_err(|e| warn!("Could not load {}: {}", loc.path, e))
            .ok()?;

        file.decode()
            .map_err(|e| warn!("Could not decode {}: {}", loc.path, e))
            .ok()
    }
}
