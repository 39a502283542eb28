//! Markdown document requests and outcomes

use super::urls::FileLocation;

/// What to load
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentRequest {
    /// A raw or web URL of the file
    Url(String),
    /// A repository-relative location
    Location(FileLocation),
}

impl DocumentRequest {
    /// Whether the request names nothing at all
    pub fn is_blank(&self) -> bool {
        match self {
            DocumentRequest::Url(url) => url.trim().is_empty(),
            DocumentRequest::Location(loc) => loc.path.trim().is_empty(),
        }
    }
}

/// Outcome of a document fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Document {
    Loaded {
        content: String,
        /// Where the source can be viewed on the web host
        web_url: String,
    },
    /// The document could not be loaded. `web_url` is set whenever the
    /// request could be mapped to a location.
    Failed { web_url: Option<String> },
}

impl Document {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Document::Loaded { .. })
    }

    pub fn web_url(&self) -> Option<&str> {
        match self {
            Document::Loaded { web_url, .. } => Some(web_url),
            Document::Failed { web_url } => web_url.as_deref(),
        }
    }
}
