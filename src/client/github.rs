//! GitHub-compatible hosting API client

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client as HttpClient, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;

use super::models::{
    CommitSummary, ContentFile, ContentItem, RepoId, RepositoryMetadata, TreeEntry, TreeResponse,
};
use super::rate_limit::{EndpointCategory, RateLimiterSet};
use super::{ApiResult, RepoHostApi};
use crate::error::{ApiError, Result};

/// Media type requested from the API
const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";

/// Transport-level timeout for every request
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Where the client runs, which decides whether a credential may be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientMode {
    /// Trusted execution: the bearer token is attached when present
    Server { token: Option<String> },
    /// Output may reach an untrusted consumer: never attach a credential
    Public,
}

impl ClientMode {
    fn token(&self) -> Option<&str> {
        match self {
            ClientMode::Server { token } => token.as_deref(),
            ClientMode::Public => None,
        }
    }
}

/// Hosting API client
pub struct GitHubClient {
    http: HttpClient,
    api_base: Url,
    mode: ClientMode,
    rate_limiters: RateLimiterSet,
}

impl GitHubClient {
    /// Create a client for `api_base` (e.g. `https://api.github.com`).
    pub fn new(api_base: &str, user_agent: &str, mode: ClientMode) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_MEDIA_TYPE));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(user_agent)
                .map_err(|e| ApiError::Network(format!("Invalid user agent: {}", e)))?,
        );

        let http = HttpClient::builder()
            .timeout(REQUEST_TIMEOUT)
            .default_headers(headers)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let api_base = Url::parse(api_base)
            .map_err(|e| ApiError::Network(format!("Invalid API host {}: {}", api_base, e)))?;
        if api_base.cannot_be_a_base() {
            return Err(ApiError::Network(format!("Invalid API host {}", api_base)).into());
        }

        Ok(Self {
            http,
            api_base,
            mode,
            rate_limiters: RateLimiterSet::new(),
        })
    }

    /// Whether requests carry a bearer credential
    pub fn is_authenticated(&self) -> bool {
        self.mode.token().is_some()
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.mode.token() {
            Some(token) => builder.header(AUTHORIZATION, format!("Bearer {}", token)),
            None => builder,
        }
    }

    /// Endpoint URL for `segments` below the API base.
    ///
    /// Each segment is percent-encoded on its own, so a `/` inside one stays
    /// a literal separator only where the caller split on it.
    fn endpoint<'a>(
        &self,
        segments: impl IntoIterator<Item = &'a str>,
        query: &[(&str, &str)],
    ) -> ApiResult<Url> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::Network(format!("Invalid API host {}", self.api_base)))?
            .pop_if_empty()
            .extend(segments);
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    /// GET an API URL and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        category: EndpointCategory,
        context: &str,
    ) -> ApiResult<T> {
        let response = self.send(url, category, context).await?;

        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::malformed(context, e))?;
        serde_json::from_slice(&body).map_err(|e| ApiError::malformed(context, e))
    }

    async fn send(&self, url: Url, category: EndpointCategory, context: &str) -> ApiResult<Response> {
        self.rate_limiters.wait_for(category).await;

        debug!("GET {}", url);

        let response = self
            .authorize(self.http.get(url))
            .send()
            .await
            .map_err(ApiError::from)?;

        self.check_status(response, category, context).await
    }

    /// Map the response status onto the failure taxonomy.
    async fn check_status(
        &self,
        response: Response,
        category: EndpointCategory,
        context: &str,
    ) -> ApiResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        match status {
            StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => {
                self.rate_limiters.activate(category);
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .map(Duration::from_secs);
                Err(ApiError::RateLimited {
                    context: context.to_string(),
                    retry_after,
                })
            }
            StatusCode::NOT_FOUND => Err(ApiError::NotFound(context.to_string())),
            _ => Err(ApiError::Status {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown").to_string(),
            }),
        }
    }
}

#[async_trait]
impl RepoHostApi for GitHubClient {
    async fn get_repository(&self, id: &RepoId) -> ApiResult<RepositoryMetadata> {
        let url = self.endpoint(["repos", id.owner.as_str(), id.name.as_str()], &[])?;
        self.get_json(url, EndpointCategory::Repository, &format!("repository {}", id))
            .await
    }

    async fn list_contents(&self, owner: &str, repo: &str) -> ApiResult<Vec<ContentItem>> {
        let url = self.endpoint(["repos", owner, repo, "contents"], &[])?;
        self.get_json(
            url,
            EndpointCategory::Contents,
            &format!("contents of {}/{}", owner, repo),
        )
        .await
    }

    async fn latest_commit(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
    ) -> ApiResult<Option<CommitSummary>> {
        let url = self.endpoint(
            ["repos", owner, repo, "commits"],
            &[("path", path), ("per_page", "1")],
        )?;
        let commits: Vec<CommitSummary> = self
            .get_json(url, EndpointCategory::Commits, &format!("commits for {}", path))
            .await?;
        Ok(commits.into_iter().next())
    }

    async fn get_tree(
        &self,
        owner: &str,
        repo: &str,
        git_ref: &str,
    ) -> ApiResult<Vec<TreeEntry>> {
        // Branch names may contain `/`; the host resolves them segment-wise
        let segments = ["repos", owner, repo, "git", "trees"]
            .into_iter()
            .chain(git_ref.split('/'));
        let url = self.endpoint(segments, &[("recursive", "1")])?;
        let context = format!("tree of {}/{}", owner, repo);
        let response: TreeResponse = self
            .get_json(url, EndpointCategory::Trees, &context)
            .await?;

        if response.truncated {
            log::warn!("Tree of {}/{} was truncated by the host", owner, repo);
        }

        response
            .tree
            .ok_or_else(|| ApiError::malformed(context, "missing tree data"))
    }

    async fn get_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        git_ref: &str,
    ) -> ApiResult<ContentFile> {
        let segments = ["repos", owner, repo, "contents"]
            .into_iter()
            .chain(path.split('/').filter(|s| !s.is_empty()));
        let url = self.endpoint(segments, &[("ref", git_ref)])?;
        self.get_json(url, EndpointCategory::Contents, &format!("file {}", path))
            .await
    }

    async fn fetch_raw(&self, url: &str) -> ApiResult<String> {
        self.rate_limiters.wait_for(EndpointCategory::Raw).await;
        debug!("GET {}", url);

        // Raw hosts serve public files; the credential stays with the API host
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(ApiError::from)?;
        let response = self
            .check_status(response, EndpointCategory::Raw, url)
            .await?;

        response
            .text()
            .await
            .map_err(|e| ApiError::malformed(url, e))
    }
}
