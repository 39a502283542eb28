//! Init command implementation

use colored::Colorize;
use dialoguer::{Confirm, Input, theme::ColorfulTheme};
use log::warn;

use crate::cache::LocalCache;
use crate::cli::args::GlobalOptions;
use crate::client::RepoId;
use crate::config::{Config, DEFAULT_BRANCH, WriteupsRepo};
use crate::error::Result;

/// Run the init command
///
/// Existing values are offered as defaults, so re-running `init` edits the
/// configuration in place.
pub fn run(opts: &GlobalOptions) -> Result<()> {
    println!("{}", "Welcome to folio!".bold().green());
    println!("Let's set up the repositories your portfolio reads from.\n");

    let theme = ColorfulTheme::default();
    let mut config = Config::load_at(opts.config_ref()).unwrap_or_default();

    let repositories: String = Input::with_theme(&theme)
        .with_prompt("Project repositories (owner/name, comma separated)")
        .with_initial_text(config.repositories.join(", "))
        .allow_empty(true)
        .validate_with(|input: &String| -> std::result::Result<(), String> {
            parse_repository_list(input)
                .map(|_| ())
                .map_err(|e| e.to_string())
        })
        .interact_text()?;
    config.repositories = parse_repository_list(&repositories)?
        .iter()
        .map(ToString::to_string)
        .collect();

    let has_writeups = Confirm::with_theme(&theme)
        .with_prompt("Do you publish CTF write-ups from a repository?")
        .default(config.writeups.is_some())
        .interact()?;

    config.writeups = if has_writeups {
        let current = config.writeups.as_ref().map(WriteupsRepo::full_name);
        let mut prompt = Input::<String>::with_theme(&theme)
            .with_prompt("Write-ups repository (owner/name)")
            .validate_with(|input: &String| -> std::result::Result<(), String> {
                input
                    .parse::<RepoId>()
                    .map(|_| ())
                    .map_err(|e| e.to_string())
            });
        if let Some(current) = current {
            prompt = prompt.default(current);
        }
        let id: RepoId = prompt.interact_text()?.parse()?;

        let branch: String = Input::with_theme(&theme)
            .with_prompt("Branch")
            .default(
                config
                    .writeups
                    .as_ref()
                    .map(|w| w.branch.clone())
                    .unwrap_or_else(|| DEFAULT_BRANCH.to_string()),
            )
            .interact_text()?;

        Some(WriteupsRepo {
            owner: id.owner,
            repo: id.name,
            branch,
        })
    } else {
        None
    };

    config.validate()?;
    config.save_at(opts.config_ref())?;

    // Cached listings may belong to the previous repositories
    if let Err(e) = LocalCache::open_default().invalidate_all() {
        warn!("Failed to clear cache after init: {}", e);
    }

    let config_path = Config::resolve_path(opts.config_ref())?;
    println!(
        "\n{} Configuration saved to: {}",
        "✓".green(),
        config_path.display()
    );

    println!("\n{}", "You're all set! Try running:".bold());
    println!("  {} - Show configuration status", "folio status".cyan());
    println!("  {} - List your projects", "folio projects list".cyan());
    if config.writeups.is_some() {
        println!("  {} - Browse write-ups", "folio writeup tree".cyan());
    }

    Ok(())
}

/// Parse a comma or whitespace separated list of `owner/name` identifiers.
pub fn parse_repository_list(input: &str) -> Result<Vec<RepoId>> {
    input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(|part| part.parse::<RepoId>().map_err(Into::into))
        .collect()
}
