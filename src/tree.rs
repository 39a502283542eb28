//! Hierarchical view of a flat repository snapshot
//!
//! The hosting API returns a recursive tree as a flat list of slash-separated
//! paths. [`build_tree`] turns that list into a forest of directories, marking
//! each directory that carries a `README.md` as index-bearing.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::client::models::{EntryKind, TreeEntry};

/// Index file that turns a directory into a page
pub const README_NAME: &str = "README.md";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Dir,
}

/// A node of the write-up forest.
///
/// `children` and `has_readme` are only present on directories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    /// Last path segment
    pub name: String,
    /// Full slash-separated path, unique within a snapshot
    pub path: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TreeNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_readme: Option<bool>,
}

impl TreeNode {
    pub fn is_dir(&self) -> bool {
        self.kind == NodeKind::Dir
    }

    /// Whether this directory has a direct `README.md` child
    pub fn has_readme(&self) -> bool {
        self.has_readme.unwrap_or(false)
    }

    pub fn children(&self) -> &[TreeNode] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// Look up a descendant (or this node) by full path.
    pub fn find(&self, path: &str) -> Option<&TreeNode> {
        if self.path == path {
            return Some(self);
        }
        let prefix = format!("{}/", self.path);
        if !path.starts_with(&prefix) {
            return None;
        }
        self.children().iter().find_map(|child| child.find(path))
    }

    /// Path of the index document of an index-bearing directory.
    ///
    /// Uses the child's actual spelling, so `Readme.md` is returned as is.
    pub fn readme_path(&self) -> Option<String> {
        if !self.has_readme() {
            return None;
        }
        self.children()
            .iter()
            .find(|child| !child.is_dir() && is_readme(&child.name))
            .map(|child| child.path.clone())
    }

    /// Number of nodes in this subtree, including this one
    pub fn size(&self) -> usize {
        1 + self.children().iter().map(TreeNode::size).sum::<usize>()
    }
}

/// Find a node anywhere in a forest.
pub fn find_in_forest<'a>(forest: &'a [TreeNode], path: &str) -> Option<&'a TreeNode> {
    let path = path.trim_matches('/');
    forest.iter().find_map(|root| root.find(path))
}

fn is_readme(name: &str) -> bool {
    name.eq_ignore_ascii_case(README_NAME)
}

/// Path minus its last segment, or `None` for a top-level path.
fn parent_path(path: &str) -> Option<&str> {
    path.rsplit_once('/').map(|(parent, _)| parent)
}

fn last_segment(path: &str) -> &str {
    path.rsplit_once('/').map_or(path, |(_, name)| name)
}

/// Build the forest for a flat tree snapshot.
///
/// Roots are the directory entries without a `/` in their path; top-level
/// files are dropped. Every other entry hangs off the entry at its parent
/// path, in input order. Entries whose parent is missing or is a file are
/// dropped. The result does not depend on whether parents precede their
/// children in `entries`.
pub fn build_tree(entries: &[TreeEntry]) -> Vec<TreeNode> {
    // First occurrence wins if the host ever repeats a path
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(entries.len());
    for (i, entry) in entries.iter().enumerate() {
        index.entry(entry.path.as_str()).or_insert(i);
    }

    let mut children: HashMap<usize, Vec<usize>> = HashMap::new();
    let mut roots = Vec::new();

    for (i, entry) in entries.iter().enumerate() {
        if index.get(entry.path.as_str()) != Some(&i) {
            continue;
        }
        match parent_path(&entry.path) {
            None => {
                if entry.kind == EntryKind::Tree {
                    roots.push(i);
                }
            }
            Some(parent) => {
                if let Some(&p) = index.get(parent)
                    && entries[p].kind == EntryKind::Tree
                {
                    children.entry(p).or_default().push(i);
                }
            }
        }
    }

    roots
        .into_iter()
        .map(|i| assemble(entries, &children, i))
        .collect()
}

fn assemble(entries: &[TreeEntry], children: &HashMap<usize, Vec<usize>>, i: usize) -> TreeNode {
    let entry = &entries[i];
    let name = last_segment(&entry.path).to_string();

    if entry.kind != EntryKind::Tree {
        return TreeNode {
            name,
            path: entry.path.clone(),
            kind: NodeKind::File,
            children: None,
            has_readme: None,
        };
    }

    let nodes: Vec<TreeNode> = children
        .get(&i)
        .map(|ids| {
            ids.iter()
                .map(|&child| assemble(entries, children, child))
                .collect()
        })
        .unwrap_or_default();

    let has_readme = nodes
        .iter()
        .any(|child| !child.is_dir() && is_readme(&child.name));

    TreeNode {
        name,
        path: entry.path.clone(),
        kind: NodeKind::Dir,
        children: Some(nodes),
        has_readme: Some(has_readme),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk<'a>(node: &'a TreeNode, out: &mut Vec<&'a TreeNode>) {
        out.push(node);
        for child in node.children() {
            walk(child, out);
        }
    }

    fn all_nodes(forest: &[TreeNode]) -> Vec<&TreeNode> {
        let mut out = Vec::new();
        for root in forest {
            walk(root, &mut out);
        }
        out
    }

    fn sample() -> Vec<TreeEntry> {
        vec![
            TreeEntry::tree("a"),
            TreeEntry::blob("a/README.md"),
            TreeEntry::tree("a/b"),
        ]
    }

    #[test]
    fn test_readme_marks_direct_parent_only() {
        let forest = build_tree(&sample());

        assert_eq!(forest.len(), 1);
        let a = &forest[0];
        assert_eq!(a.has_readme, Some(true));
        let b = a.find("a/b").unwrap();
        assert_eq!(b.has_readme, Some(false));
        assert!(b.children().is_empty());
    }

    #[test]
    fn test_readme_match_is_case_insensitive() {
        let forest = build_tree(&[TreeEntry::tree("x"), TreeEntry::blob("x/readme.MD")]);
        assert!(forest[0].has_readme());
        assert_eq!(forest[0].readme_path().as_deref(), Some("x/readme.MD"));
    }

    #[test]
    fn test_readme_directory_does_not_count() {
        let forest = build_tree(&[TreeEntry::tree("x"), TreeEntry::tree("x/README.md")]);
        assert!(!forest[0].has_readme());
        assert!(forest[0].readme_path().is_none());
    }

    #[test]
    fn test_top_level_files_are_dropped() {
        let forest = build_tree(&[
            TreeEntry::blob("README.md"),
            TreeEntry::tree("pwn"),
            TreeEntry::blob("LICENSE"),
        ]);

        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].path, "pwn");
    }

    #[test]
    fn test_orphans_and_children_of_files_are_dropped() {
        let forest = build_tree(&[
            TreeEntry::tree("web"),
            TreeEntry::blob("web/exploit.py"),
            TreeEntry::blob("web/exploit.py/impossible"),
            TreeEntry::blob("missing/parent.md"),
        ]);

        let nodes = all_nodes(&forest);
        let paths: Vec<&str> = nodes.iter().map(|n| n.path.as_str()).collect();
        assert_eq!(paths, vec!["web", "web/exploit.py"]);
        assert!(forest[0].find("web/exploit.py").unwrap().children.is_none());
    }

    #[test]
    fn test_child_before_parent_still_attaches() {
        let forward = build_tree(&sample());
        let reversed: Vec<TreeEntry> = sample().into_iter().rev().collect();
        let backward = build_tree(&reversed);

        let a = &backward[0];
        assert!(a.has_readme());
        assert_eq!(a.children().len(), 2);
        // Same structure; only sibling order follows input order
        assert_eq!(forward[0].size(), backward[0].size());
    }

    #[test]
    fn test_child_order_follows_input() {
        let forest = build_tree(&[
            TreeEntry::tree("crypto"),
            TreeEntry::blob("crypto/zeta.py"),
            TreeEntry::blob("crypto/alpha.py"),
            TreeEntry::blob("crypto/README.md"),
        ]);

        let names: Vec<&str> = forest[0].children().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["zeta.py", "alpha.py", "README.md"]);
    }

    #[test]
    fn test_parent_path_invariant() {
        let entries = vec![
            TreeEntry::tree("rev"),
            TreeEntry::tree("rev/2023"),
            TreeEntry::tree("rev/2023/crackme"),
            TreeEntry::blob("rev/2023/crackme/README.md"),
            TreeEntry::blob("rev/2023/crackme/solve.py"),
            TreeEntry::tree("misc"),
        ];
        let forest = build_tree(&entries);

        fn check(node: &TreeNode) {
            assert_eq!(node.name, last_segment(&node.path));
            for child in node.children() {
                assert_eq!(parent_path(&child.path), Some(node.path.as_str()));
                check(child);
            }
        }
        for root in &forest {
            assert!(!root.path.contains('/'));
            check(root);
        }
        assert_eq!(all_nodes(&forest).len(), entries.len());
    }

    #[test]
    fn test_files_have_no_children_or_flag() {
        let forest = build_tree(&sample());
        let readme = forest[0].find("a/README.md").unwrap();
        assert_eq!(readme.kind, NodeKind::File);
        assert!(readme.children.is_none());
        assert!(readme.has_readme.is_none());
    }

    #[test]
    fn test_submodule_entries_are_files() {
        let forest = build_tree(&[
            TreeEntry::tree("tools"),
            TreeEntry::new("tools/pwndbg", EntryKind::Other),
        ]);
        assert_eq!(forest[0].children()[0].kind, NodeKind::File);
    }

    #[test]
    fn test_find_in_forest() {
        let forest = build_tree(&[
            TreeEntry::tree("pwn"),
            TreeEntry::tree("pwn/heap"),
            TreeEntry::tree("web"),
            TreeEntry::tree("web/heapdump"),
        ]);

        assert_eq!(find_in_forest(&forest, "/web/heapdump/").unwrap().name, "heapdump");
        assert_eq!(find_in_forest(&forest, "pwn/heap").unwrap().path, "pwn/heap");
        assert!(find_in_forest(&forest, "pwn/heapdump").is_none());
    }

    #[test]
    fn test_empty_input() {
        assert!(build_tree(&[]).is_empty());
    }

    #[test]
    fn test_serializes_without_file_only_fields() {
        let forest = build_tree(&sample());
        let json = serde_json::to_value(&forest).unwrap();

        assert_eq!(json[0]["type"], "dir");
        assert_eq!(json[0]["has_readme"], true);
        let readme = &json[0]["children"][0];
        assert_eq!(readme["type"], "file");
        assert!(readme.get("children").is_none());
        assert!(readme.get("has_readme").is_none());
    }
}
