//! CLI command definitions and handlers

use clap::{Parser, Subcommand};
pub use clap_complete::Shell;

pub mod args;
pub mod cache;
pub mod completions;
pub mod context;
pub mod document;
pub mod init;
pub mod projects;
pub mod status;
pub mod writeup;

pub use args::{GlobalOptions, OutputFormat};
pub use context::CommandContext;

/// folio - content engine for a personal portfolio
#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (pretty, table, json)
    #[arg(
        long,
        global = true,
        env = "FOLIO_FORMAT",
        default_value = "pretty",
        hide_env = true,
        hide_possible_values = true
    )]
    pub format: OutputFormat,

    /// Override config file location
    #[arg(long, global = true, env = "FOLIO_CONFIG", hide_env = true)]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true, env = "FOLIO_DEBUG", hide_env = true)]
    pub debug: bool,

    /// Bypass cache, fetch fresh data from the API
    #[arg(long, global = true, env = "FOLIO_NO_CACHE", hide_env = true)]
    pub no_cache: bool,

    /// Never send the GITHUB_TOKEN credential
    #[arg(long, global = true, env = "FOLIO_ANONYMOUS", hide_env = true)]
    pub anonymous: bool,

    /// Hosting API base URL
    #[arg(long, global = true, env = "FOLIO_API_HOST", hide = true)]
    pub api_host: Option<String>,

    /// Raw content host
    #[arg(long, global = true, env = "FOLIO_RAW_HOST", hide = true)]
    pub raw_host: Option<String>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the folio configuration
    Init,

    /// Show configuration, credential and cache status
    Status,

    /// Display version information
    Version,

    /// Project repositories
    #[command(subcommand)]
    Projects(ProjectsCommands),

    /// CTF write-ups
    #[command(subcommand)]
    Writeup(WriteupCommands),

    /// Manage the local listing cache
    #[command(subcommand)]
    Cache(CacheCommands),

    /// Generate shell completions
    #[command(after_help = "\
Examples:
  bash:   folio completion bash > /etc/bash_completion.d/folio
  zsh:    folio completion zsh > \"${fpath[1]}/_folio\"
  fish:   folio completion fish > ~/.config/fish/completions/folio.fish")]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Project subcommands
#[derive(Subcommand, Debug)]
pub enum ProjectsCommands {
    /// List the configured project repositories
    List,

    /// Print a project's README
    Readme {
        /// Repository in owner/name form
        repo: String,
    },
}

/// Write-up subcommands
#[derive(Subcommand, Debug)]
pub enum WriteupCommands {
    /// List top-level write-up directories, most recent first
    List,

    /// Show the full write-up tree
    Tree {
        /// Only show this many levels below the top
        #[arg(long)]
        depth: Option<usize>,
    },

    /// Print a write-up; a directory opens its README.md
    Show {
        /// Path inside the write-ups repository, or a raw/web URL
        path: String,
    },
}

/// Cache subcommands
#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// Show validity of each cached listing
    Status,

    /// Remove all cached listings
    Clear,

    /// Print the cache database path
    Path,
}
