//! Git tree models

use serde::{Deserialize, Serialize};

/// Kind of a tree entry on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Blob,
    Tree,
    /// Submodule pointers and anything newer than this client
    #[serde(other)]
    Other,
}

/// A single entry of a recursive tree snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
}

impl TreeEntry {
    pub fn new(path: impl Into<String>, kind: EntryKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    pub fn blob(path: impl Into<String>) -> Self {
        Self::new(path, EntryKind::Blob)
    }

    pub fn tree(path: impl Into<String>) -> Self {
        Self::new(path, EntryKind::Tree)
    }
}

/// Response of `GET /repos/{owner}/{repo}/git/trees/{ref}?recursive=1`
///
/// `tree` stays optional so a missing field can be reported as malformed
/// rather than silently producing an empty forest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeResponse {
    #[serde(default)]
    pub sha: Option<String>,
    #[serde(default)]
    pub tree: Option<Vec<TreeEntry>>,
    #[serde(default)]
    pub truncated: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_response_deserialize() {
        let json = r#"{
            "sha": "abc",
            "tree": [
                {"path": "web", "mode": "040000", "type": "tree", "sha": "1"},
                {"path": "web/README.md", "mode": "100644", "type": "blob", "sha": "2", "size": 10},
                {"path": "vendored", "mode": "160000", "type": "commit", "sha": "3"}
            ],
            "truncated": false
        }"#;
        let response: TreeResponse = serde_json::from_str(json).unwrap();
        let tree = response.tree.unwrap();
        assert_eq!(tree[0], TreeEntry::tree("web"));
        assert_eq!(tree[1], TreeEntry::blob("web/README.md"));
        assert_eq!(tree[2].kind, EntryKind::Other);
    }

    #[test]
    fn test_tree_response_missing_tree() {
        let response: TreeResponse = serde_json::from_str(r#"{"message": "oops"}"#).unwrap();
        assert!(response.tree.is_none());
    }
}
