//! URL templates for raw, web, and API forms of a repository file
//!
//! All conversions go through [`FileLocation`], parsed against the configured
//! hosts, so tests can point every template at a local server.

use std::ops::Range;

use pulldown_cmark::{CowStr, Event, LinkType, Options, Parser, Tag, TagEnd};
use reqwest::Url;

/// A file inside a repository at a given branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileLocation {
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub path: String,
}

impl FileLocation {
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        branch: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            branch: branch.into(),
            path: path.into().trim_matches('/').to_string(),
        }
    }
}

/// Hosts the templates are expanded against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplates {
    api_host: String,
    raw_host: String,
    web_host: String,
}

impl UrlTemplates {
    pub fn new(api_host: &str, raw_host: &str, web_host: &str) -> Self {
        Self {
            api_host: api_host.trim_end_matches('/').to_string(),
            raw_host: raw_host.trim_end_matches('/').to_string(),
            web_host: web_host.trim_end_matches('/').to_string(),
        }
    }

    /// `{raw_host}/{owner}/{repo}/{branch}/{path}`
    pub fn raw_url(&self, loc: &FileLocation) -> String {
        format!(
            "{}/{}/{}/{}/{}",
            self.raw_host, loc.owner, loc.repo, loc.branch, loc.path
        )
    }

    /// `{web_host}/{owner}/{repo}/blob/{branch}/{path}`
    pub fn web_url(&self, loc: &FileLocation) -> String {
        format!(
            "{}/{}/{}/blob/{}/{}",
            self.web_host, loc.owner, loc.repo, loc.branch, loc.path
        )
    }

    /// `{web_host}/{owner}/{repo}/tree/{branch}/{path}`, the page of a directory
    pub fn web_dir_url(&self, loc: &FileLocation) -> String {
        format!(
            "{}/{}/{}/tree/{}/{}",
            self.web_host, loc.owner, loc.repo, loc.branch, loc.path
        )
    }

    /// `{api_host}/repos/{owner}/{repo}/contents/{path}?ref={branch}`
    pub fn api_url(&self, loc: &FileLocation) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}?ref={}",
            self.api_host, loc.owner, loc.repo, loc.path, loc.branch
        )
    }

    /// Parse a raw-content URL.
    pub fn parse_raw(&self, url: &str) -> Option<FileLocation> {
        let rest = strip_host(url, &self.raw_host)?;
        let mut parts = rest.splitn(4, '/');
        let owner = parts.next()?;
        let repo = parts.next()?;
        let branch = parts.next()?;
        let path = parts.next()?;
        non_empty(FileLocation::new(owner, repo, branch, path))
    }

    /// Parse a web (`/blob/`) URL.
    pub fn parse_web(&self, url: &str) -> Option<FileLocation> {
        let rest = strip_host(url, &self.web_host)?;
        let mut parts = rest.splitn(5, '/');
        let owner = parts.next()?;
        let repo = parts.next()?;
        if parts.next()? != "blob" {
            return None;
        }
        let branch = parts.next()?;
        let path = parts.next()?;
        non_empty(FileLocation::new(owner, repo, branch, path))
    }

    /// Parse a URL in either raw or web form.
    pub fn parse(&self, url: &str) -> Option<FileLocation> {
        self.parse_raw(url).or_else(|| self.parse_web(url))
    }

    /// Raw form of a raw or web URL. A raw URL converts to itself.
    pub fn to_raw(&self, url: &str) -> Option<String> {
        if self.parse_raw(url).is_some() {
            return Some(url.trim().to_string());
        }
        self.parse_web(url).map(|loc| self.raw_url(&loc))
    }

    /// Web form of a raw or web URL. A web URL converts to itself.
    pub fn to_web(&self, url: &str) -> Option<String> {
        if self.parse_web(url).is_some() {
            return Some(url.trim().to_string());
        }
        self.parse_raw(url).map(|loc| self.web_url(&loc))
    }

    /// Resolve an image source found in the document at `doc`.
    ///
    /// Absolute (`http...`) and root-relative (`/...`) sources are returned
    /// untouched; anything else is resolved against the document's directory
    /// on the raw host.
    pub fn resolve_asset_url(&self, doc: &FileLocation, src: &str) -> String {
        if src.is_empty() || src.starts_with("http") || src.starts_with('/') {
            return src.to_string();
        }

        Url::parse(&self.raw_url(doc))
            .and_then(|base| base.join(src))
            .map(String::from)
            .unwrap_or_else(|_| src.to_string())
    }

    /// Rewrite the destination of every relative inline image in `markdown`.
    ///
    /// Only images the markdown parser recognises are touched; image syntax
    /// inside code spans and fenced blocks is left as written. Everything
    /// outside the rewritten destinations is copied byte for byte.
    pub fn rewrite_relative_images(&self, doc: &FileLocation, markdown: &str) -> String {
        let mut edits: Vec<(Range<usize>, String)> = Vec::new();
        // Images still open, innermost last. Reference-style images have no
        // destination in their own span and are left alone.
        let mut open: Vec<OpenImage<'_>> = Vec::new();

        for (event, range) in Parser::new_ext(markdown, markdown_options()).into_offset_iter() {
            match event {
                Event::Start(Tag::Image {
                    link_type,
                    dest_url,
                    ..
                }) => {
                    if let Some(parent) = open.last_mut() {
                        parent.alt_end = parent.alt_end.max(range.end);
                    }
                    open.push(OpenImage {
                        dest: (link_type == LinkType::Inline).then_some(dest_url),
                        alt_end: range.start + 2,
                    });
                }
                Event::End(TagEnd::Image) => {
                    let Some(image) = open.pop() else { continue };
                    let Some(dest) = image.dest else { continue };
                    if let Some(span) = locate(markdown, image.alt_end..range.end, &dest) {
                        let resolved = self.resolve_asset_url(doc, &dest);
                        if resolved != dest.as_ref() {
                            edits.push((span, resolved));
                        }
                    }
                }
                _ => {
                    if let Some(image) = open.last_mut() {
                        image.alt_end = image.alt_end.max(range.end);
                    }
                }
            }
        }

        edits.sort_by_key(|(span, _)| span.start);

        let mut out = String::with_capacity(markdown.len());
        let mut cursor = 0;
        for (span, resolved) in edits {
            out.push_str(&markdown[cursor..span.start]);
            out.push_str(&resolved);
            cursor = span.end;
        }
        out.push_str(&markdown[cursor..]);
        out
    }
}

struct OpenImage<'a> {
    dest: Option<CowStr<'a>>,
    /// End of the alt text seen so far; the destination follows it
    alt_end: usize,
}

fn markdown_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
}

/// Byte range of `dest` inside `markdown[within]`, if it appears verbatim.
///
/// Destinations written with backslash escapes or entities do not, and are
/// left unchanged.
fn locate(markdown: &str, within: Range<usize>, dest: &str) -> Option<Range<usize>> {
    if dest.is_empty() {
        return None;
    }
    let offset = markdown.get(within.clone())?.find(dest)?;
    let start = within.start + offset;
    Some(start..start + dest.len())
}

fn strip_host<'a>(url: &'a str, host: &str) -> Option<&'a str> {
    url.trim()
        .strip_prefix(host)?
        .strip_prefix('/')
        .map(|rest| rest.split(['?', '#']).next().unwrap_or(rest))
}

fn non_empty(loc: FileLocation) -> Option<FileLocation> {
    let complete = [&loc.owner, &loc.repo, &loc.branch, &loc.path]
        .iter()
        .all(|part| !part.is_empty());
    complete.then_some(loc)
}
