//! Project repository commands

use crate::cli::args::GlobalOptions;
use crate::cli::{CommandContext, document};
use crate::client::RepoId;
use crate::config::DEFAULT_BRANCH;
use crate::content::{DocumentRequest, FileLocation};
use crate::error::Result;
use crate::models::ProjectDisplay;
use crate::output::Formattable;
use crate::output::progress::Spinner;
use crate::tree::README_NAME;

/// List configured project repositories, in configured order.
///
/// Repositories that cannot be fetched are left out.
pub async fn list(opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let ids = ctx.config.repository_ids()?;

    let spinner = Spinner::start(ctx.format, "Fetching repositories...");
    let repos = ctx.content.repositories(&ids).await;
    spinner.finish();

    let display: Vec<ProjectDisplay> = repos.iter().map(ProjectDisplay::from).collect();
    display.print(ctx.format)
}

/// Print the README of one project repository.
pub async fn readme(opts: &GlobalOptions, repo: &str) -> Result<()> {
    let id: RepoId = repo.parse()?;
    let ctx = CommandContext::new(opts)?;

    let request =
        DocumentRequest::Location(FileLocation::new(id.owner, id.name, DEFAULT_BRANCH, README_NAME));

    let spinner = Spinner::start(ctx.format, "Fetching README...");
    let doc = ctx.content.content().fetch_document(&request).await;
    spinner.finish();

    document::print(&doc, ctx.format)
}
