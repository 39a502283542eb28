//! Status command implementation

use colored::Colorize;
use sha2::{Digest, Sha256};

use crate::cache::LocalCache;
use crate::cli::args::GlobalOptions;
use crate::cli::context::TOKEN_ENV;
use crate::config::Config;
use crate::error::Result;

/// Run the status command to display configuration status
pub fn run(opts: &GlobalOptions) -> Result<()> {
    println!("{}\n", "folio Configuration Status".bold());

    let config_path = Config::resolve_path(opts.config_ref())?;

    match Config::load_at(opts.config_ref()) {
        Ok(config) => {
            println!("Config file: {}", config_path.display().to_string().cyan());
            println!();

            if config.repositories.is_empty() {
                println!("{} No project repositories configured", "○".dimmed());
            } else {
                println!(
                    "{} {} project repositories: {}",
                    "✓".green(),
                    config.repositories.len(),
                    config.repositories.join(", ")
                );
            }

            match &config.writeups {
                Some(writeups) => println!(
                    "{} Write-ups: {} ({})",
                    "✓".green(),
                    writeups.full_name(),
                    writeups.branch
                ),
                None => {
                    println!("{} No write-ups repository configured", "○".dimmed());
                    println!("  → Run 'folio init' to set one");
                }
            }

            if config.api_host.is_some() || opts.api_host.is_some() {
                let host = opts.api_host.as_deref().unwrap_or(config.api_host());
                println!("{} Custom API host: {}", "○".dimmed(), host.cyan());
            }
        }
        Err(e) => {
            println!("{} {}", "✗".red(), e);
            println!();
            println!("Run {} to create a configuration file.", "folio init".cyan());
        }
    }

    println!();
    if opts.anonymous {
        println!("{} Anonymous mode: credential not sent", "○".dimmed());
    } else {
        match std::env::var(TOKEN_ENV).ok().as_deref().and_then(fingerprint) {
            Some(fp) => println!("{} {} set (sha256 {})", "✓".green(), TOKEN_ENV, fp),
            None => println!(
                "{} {} not set (unauthenticated rate limits apply)",
                "○".dimmed(),
                TOKEN_ENV
            ),
        }
    }

    if !opts.no_cache {
        println!();
        let cache = LocalCache::open_default();
        for (category, valid) in cache.status() {
            if valid {
                println!("{} Cached {} valid", "✓".green(), category);
            } else {
                println!("{} Cached {} missing or expired", "○".dimmed(), category);
            }
        }
    }

    println!();
    Ok(())
}

/// Short SHA-256 fingerprint of a credential, so it can be identified
/// without being shown.
pub fn fingerprint(token: &str) -> Option<String> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }
    let digest = Sha256::digest(token.as_bytes());
    Some(
        digest
            .iter()
            .take(4)
            .map(|b| format!("{:02x}", b))
            .collect(),
    )
}
