//! Configuration management for folio

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::client::models::RepoId;
use crate::error::{ConfigError, Result};

/// Default hosting API base URL
pub const DEFAULT_API_HOST: &str = "https://api.github.com";

/// Default raw-content host
pub const DEFAULT_RAW_HOST: &str = "https://raw.githubusercontent.com";

/// Default web host used for "view on GitHub" links
pub const DEFAULT_WEB_HOST: &str = "https://github.com";

/// Default branch of the write-ups repository
pub const DEFAULT_BRANCH: &str = "main";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Project repositories shown on the projects page (`owner/name`)
    #[serde(default)]
    pub repositories: Vec<String>,

    /// Repository holding the CTF write-ups
    #[serde(skip_serializing_if = "Option::is_none")]
    pub writeups: Option<WriteupsRepo>,

    /// Hosting API base URL override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_host: Option<String>,

    /// Raw content host override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_host: Option<String>,

    /// Web host override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_host: Option<String>,

    /// Identifying User-Agent sent with every request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

/// Location of the write-ups repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteupsRepo {
    pub owner: String,
    pub repo: String,
    #[serde(default = "default_branch")]
    pub branch: String,
}

fn default_branch() -> String {
    DEFAULT_BRANCH.to_string()
}

impl WriteupsRepo {
    /// `owner/repo` form
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::Invalid(
            "Could not determine home directory".to_string(),
        ))?;

        Ok(home.join(".folio").join("config.yaml"))
    }

    /// Resolve an optional override into a concrete config path
    pub fn resolve_path(path: Option<&str>) -> Result<PathBuf> {
        match path {
            Some(p) => Ok(PathBuf::from(p)),
            None => Self::default_path(),
        }
    }

    /// Load configuration from an optional override path
    pub fn load_at(path: Option<&str>) -> Result<Self> {
        Self::load_from(Self::resolve_path(path)?)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: PathBuf) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound.into());
        }

        let contents = std::fs::read_to_string(&path)?;
        let config: Config = serde_yaml::from_str(&contents).map_err(ConfigError::from)?;
        config.validate()?;

        Ok(config)
    }

    /// Save configuration to an optional override path
    pub fn save_at(&self, path: Option<&str>) -> Result<()> {
        self.save_to(Self::resolve_path(path)?)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents =
            serde_yaml::to_string(self).map_err(|e| ConfigError::SaveError(e.to_string()))?;

        std::fs::write(&path, contents)?;

        // The file may point at private repositories; keep it owner-only
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(&path)?.permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(&path, perms)?;
        }

        Ok(())
    }

    /// Check identifiers up front so a typo fails before any network call
    pub fn validate(&self) -> Result<()> {
        self.repository_ids()?;
        if let Some(ref writeups) = self.writeups
            && (writeups.owner.trim().is_empty() || writeups.repo.trim().is_empty())
        {
            return Err(ConfigError::InvalidRepository(writeups.full_name()).into());
        }
        Ok(())
    }

    /// Parsed project repository identifiers, in configured order
    pub fn repository_ids(&self) -> Result<Vec<RepoId>> {
        self.repositories
            .iter()
            .map(|raw| raw.parse::<RepoId>().map_err(Into::into))
            .collect()
    }

    /// The write-ups repository, or an error telling the user to configure it
    pub fn require_writeups(&self) -> Result<&WriteupsRepo> {
        self.writeups
            .as_ref()
            .ok_or_else(|| ConfigError::MissingWriteups.into())
    }

    pub fn api_host(&self) -> &str {
        self.api_host.as_deref().unwrap_or(DEFAULT_API_HOST)
    }

    pub fn raw_host(&self) -> &str {
        self.raw_host.as_deref().unwrap_or(DEFAULT_RAW_HOST)
    }

    pub fn web_host(&self) -> &str {
        self.web_host.as_deref().unwrap_or(DEFAULT_WEB_HOST)
    }

    /// Identifying header value, defaulting to the crate name and version
    pub fn user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| format!("folio/{}", env!("CARGO_PKG_VERSION")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.repositories.is_empty());
        assert!(config.writeups.is_none());
        assert_eq!(config.api_host(), DEFAULT_API_HOST);
        assert_eq!(config.raw_host(), DEFAULT_RAW_HOST);
        assert_eq!(config.web_host(), DEFAULT_WEB_HOST);
        assert!(config.user_agent().starts_with("folio/"));
    }

    #[test]
    fn test_require_writeups_missing() {
        let config = Config::default();
        assert!(config.require_writeups().is_err());
    }

    #[test]
    fn test_branch_defaults_to_main() {
        let yaml = "writeups:\n  owner: alice\n  repo: CTF-WriteUps\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        let writeups = config.require_writeups().unwrap();
        assert_eq!(writeups.branch, "main");
        assert_eq!(writeups.full_name(), "alice/CTF-WriteUps");
    }

    #[test]
    fn test_repository_ids_keep_order() {
        let config = Config {
            repositories: vec!["b/two".to_string(), "a/one".to_string()],
            ..Default::default()
        };
        let ids = config.repository_ids().unwrap();
        assert_eq!(ids[0].to_string(), "b/two");
        assert_eq!(ids[1].to_string(), "a/one");
    }

    #[test]
    fn test_invalid_repository_rejected() {
        let config = Config {
            repositories: vec!["not-a-repo".to_string()],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.yaml");

        let config = Config {
            repositories: vec!["alice/dotfiles".to_string()],
            writeups: Some(WriteupsRepo {
                owner: "alice".to_string(),
                repo: "CTF-WriteUps".to_string(),
                branch: "main".to_string(),
            }),
            api_host: Some("http://localhost:1234".to_string()),
            ..Default::default()
        };
        config.save_to(path.clone()).unwrap();

        let loaded = Config::load_from(path).unwrap();
        assert_eq!(loaded.repositories, vec!["alice/dotfiles"]);
        assert_eq!(loaded.api_host(), "http://localhost:1234");
        assert_eq!(loaded.writeups, config.writeups);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = Config::load_from(dir.path().join("absent.yaml"));
        assert!(matches!(
            result,
            Err(crate::error::Error::Config(ConfigError::NotFound))
        ));
    }
}
