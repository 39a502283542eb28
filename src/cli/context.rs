//! Command execution context
//!
//! Provides a unified context for command execution, eliminating boilerplate
//! for config loading, credential lookup, and client initialization.

use std::sync::Arc;

use log::debug;

use crate::cache::{CachedContent, LocalCache};
use crate::cli::OutputFormat;
use crate::cli::args::GlobalOptions;
use crate::client::{ClientMode, GitHubClient};
use crate::config::Config;
use crate::content::{ContentClient, UrlTemplates};
use crate::error::Result;

/// Environment variable holding the optional hosting credential
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Context for command execution containing config, client, and runtime options.
pub struct CommandContext {
    /// Loaded and validated configuration
    pub config: Config,
    /// Content client behind the read-through cache
    pub content: CachedContent<GitHubClient>,
    /// Output format preference
    pub format: OutputFormat,
}

impl CommandContext {
    /// Create a new command context with full initialization.
    ///
    /// # Errors
    /// Returns error if config cannot be loaded or the HTTP client cannot be
    /// built.
    pub fn new(opts: &GlobalOptions) -> Result<Self> {
        let config = Config::load_at(opts.config_ref())?;
        Self::with_config(opts, config)
    }

    /// Build a context around an already loaded configuration.
    pub fn with_config(opts: &GlobalOptions, config: Config) -> Result<Self> {
        let api_host = opts.api_host.as_deref().unwrap_or(config.api_host());
        let raw_host = opts.raw_host.as_deref().unwrap_or(config.raw_host());
        let templates = UrlTemplates::new(api_host, raw_host, config.web_host());

        let mode = client_mode(opts.anonymous, std::env::var(TOKEN_ENV).ok());
        debug!(
            "API host {}, raw host {}, authenticated: {}",
            api_host,
            raw_host,
            matches!(mode, ClientMode::Server { token: Some(_) })
        );

        let client = GitHubClient::new(api_host, &config.user_agent(), mode)?;
        let content = ContentClient::new(Arc::new(client), templates);

        // Wrap with caching layer (disabled if --no-cache)
        let cache = (!opts.no_cache).then(LocalCache::open_default);

        Ok(Self {
            config,
            content: CachedContent::new(content, cache),
            format: opts.format,
        })
    }
}

/// Credential mode for this invocation.
///
/// `--anonymous` wins over any token; a blank token counts as absent.
pub fn client_mode(anonymous: bool, token: Option<String>) -> ClientMode {
    if anonymous {
        return ClientMode::Public;
    }
    let token = token
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());
    ClientMode::Server { token }
}
