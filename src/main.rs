//! folio - content engine for a personal portfolio site

use clap::Parser;

mod cache;
mod cli;
mod client;
mod config;
mod content;
mod error;
mod models;
mod output;
mod tree;

use cli::{CacheCommands, Cli, Commands, GlobalOptions, ProjectsCommands, WriteupCommands};
use error::Result;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let opts = GlobalOptions::from_cli(&cli);

    match cli.command {
        Commands::Init => cli::init::run(&opts),
        Commands::Status => cli::status::run(&opts),
        Commands::Version => {
            println!("folio version {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::Projects(cmd) => match cmd {
            ProjectsCommands::List => cli::projects::list(&opts).await,
            ProjectsCommands::Readme { repo } => cli::projects::readme(&opts, &repo).await,
        },
        Commands::Writeup(cmd) => match cmd {
            WriteupCommands::List => cli::writeup::list(&opts).await,
            WriteupCommands::Tree { depth } => cli::writeup::tree(&opts, depth).await,
            WriteupCommands::Show { path } => cli::writeup::show(&opts, &path).await,
        },
        Commands::Cache(cmd) => match cmd {
            CacheCommands::Status => cli::cache::status(opts.format),
            CacheCommands::Clear => cli::cache::clear(opts.format),
            CacheCommands::Path => cli::cache::path(),
        },
        Commands::Completion { shell } => {
            cli::completions::run(shell);
            Ok(())
        }
    }
}

/// `--debug` lowers the default filter to `debug`; `RUST_LOG` wins over both.
fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}
