//! Indented rendering of the write-up forest

use colored::Colorize;

use crate::tree::TreeNode;

/// Render `forest` with box-drawing guides, one node per line.
///
/// Directories end with `/`; index-bearing directories are tagged `[page]`.
/// `max_depth` limits how many levels below the roots are shown.
pub fn render_forest(forest: &[TreeNode], max_depth: Option<usize>) -> String {
    if forest.is_empty() {
        return "No write-ups found.".to_string();
    }

    let mut lines = Vec::new();
    for root in forest {
        lines.push(label(root));
        render_children(root, "", 1, max_depth, &mut lines);
    }
    lines.join("\n")
}

fn render_children(
    node: &TreeNode,
    prefix: &str,
    depth: usize,
    max_depth: Option<usize>,
    lines: &mut Vec<String>,
) {
    if max_depth.is_some_and(|max| depth > max) {
        return;
    }

    let children = node.children();
    for (i, child) in children.iter().enumerate() {
        let last = i + 1 == children.len();
        let branch = if last { "└── " } else { "├── " };
        lines.push(format!("{}{}{}", prefix, branch, label(child)));

        if child.is_dir() {
            let guide = if last { "    " } else { "│   " };
            render_children(child, &format!("{}{}", prefix, guide), depth + 1, max_depth, lines);
        }
    }
}

fn label(node: &TreeNode) -> String {
    if !node.is_dir() {
        return node.name.clone();
    }
    let name = format!("{}/", node.name).bold().to_string();
    if node.has_readme() {
        format!("{} {}", name, "[page]".green())
    } else {
        name
    }
}
