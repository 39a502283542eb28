//! Write-up commands

use crate::cli::args::GlobalOptions;
use crate::cli::{CommandContext, OutputFormat, document};
use crate::content::{DocumentRequest, FileLocation};
use crate::error::{Error, Result};
use crate::models::WriteupDisplay;
use crate::output::Formattable;
use crate::output::json::format_json;
use crate::output::progress::Spinner;
use crate::output::tree::render_forest;
use crate::tree::{README_NAME, TreeNode, find_in_forest};

/// List top-level write-up directories, most recent first.
pub async fn list(opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let writeups = ctx.config.require_writeups()?;

    let spinner = Spinner::start(ctx.format, "Fetching write-ups...");
    let dirs = ctx
        .content
        .writeups(&writeups.owner, &writeups.repo, &writeups.branch)
        .await;
    spinner.finish();

    let display: Vec<WriteupDisplay> = dirs.iter().map(WriteupDisplay::from).collect();
    display.print(ctx.format)
}

/// Show the full write-up tree.
pub async fn tree(opts: &GlobalOptions, depth: Option<usize>) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let writeups = ctx.config.require_writeups()?;

    let spinner = Spinner::start(ctx.format, "Fetching repository tree...");
    let forest = ctx
        .content
        .content()
        .fetch_full_tree(&writeups.owner, &writeups.repo, &writeups.branch)
        .await;
    spinner.finish();

    match ctx.format {
        OutputFormat::Json => println!("{}", format_json(&forest)?),
        OutputFormat::Pretty | OutputFormat::Table => println!("{}", render_forest(&forest, depth)),
    }
    Ok(())
}

/// Print one write-up.
///
/// `target` is a raw or web URL, a file path, or a directory path; a
/// directory opens its `README.md`.
pub async fn show(opts: &GlobalOptions, target: &str) -> Result<()> {
    let ctx = CommandContext::new(opts)?;

    let request = if is_url(target) {
        DocumentRequest::Url(target.trim().to_string())
    } else {
        let writeups = ctx.config.require_writeups()?;

        let spinner = Spinner::start(ctx.format, "Fetching repository tree...");
        let forest = ctx
            .content
            .content()
            .fetch_full_tree(&writeups.owner, &writeups.repo, &writeups.branch)
            .await;
        spinner.finish();

        let path = resolve_document_path(&forest, target)?;

        DocumentRequest::Location(FileLocation::new(
            writeups.owner.as_str(),
            writeups.repo.as_str(),
            writeups.branch.as_str(),
            path,
        ))
    };

    let spinner = Spinner::start(ctx.format, "Fetching write-up...");
    let doc = ctx.content.content().fetch_document(&request).await;
    spinner.finish();

    document::print(&doc, ctx.format)
}

fn is_url(target: &str) -> bool {
    let target = target.trim();
    target.starts_with("http://") || target.starts_with("https://")
}

/// Repository path of the document to show for `target`.
///
/// The tree decides whether `target` is a directory. Only when the tree
/// could not be fetched does the name itself decide: a last segment with an
/// extension is taken as a file, anything else as a directory.
fn resolve_document_path(forest: &[TreeNode], target: &str) -> Result<String> {
    let path = target.trim().trim_matches('/');

    if forest.is_empty() {
        return Ok(if looks_like_file(path) || path.is_empty() {
            path.to_string()
        } else {
            format!("{}/{}", path, README_NAME)
        });
    }

    match find_in_forest(forest, path) {
        Some(node) if node.is_dir() => node.readme_path().ok_or_else(|| {
            Error::Other(format!("'{}' is a directory without a README.md", path))
        }),
        Some(node) => Ok(node.path.clone()),
        None => Ok(path.to_string()),
    }
}

fn looks_like_file(path: &str) -> bool {
    path.rsplit('/')
        .next()
        .and_then(|name| name.rsplit_once('.'))
        .is_some_and(|(stem, ext)| !stem.is_empty() && !ext.is_empty())
}
