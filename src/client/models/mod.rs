//! Hosting API data models
//!
//! Wire types returned by the repository-hosting API, organized by resource.

mod commit;
mod contents;
mod repo;
mod tree;

pub use commit::{CommitDetail, CommitPerson, CommitSummary};
pub use contents::{ContentFile, ContentItem, ContentKind};
pub use repo::{RepoId, RepositoryMetadata};
pub use tree::{EntryKind, TreeEntry, TreeResponse};
