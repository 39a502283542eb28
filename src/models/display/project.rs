//! Project repository display model

use serde::Serialize;
use tabled::Tabled;

use crate::client::RepositoryMetadata;
use crate::output::formatters::{MISSING, format_display_date, format_list, truncate};

/// Project display model for table/JSON output.
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct ProjectDisplay {
    #[tabled(rename = "REPO")]
    pub full_name: String,

    #[tabled(rename = "DESCRIPTION")]
    pub description: String,

    #[tabled(rename = "TOPICS")]
    pub topics: String,

    #[tabled(rename = "STARS")]
    pub stars: u64,

    /// Last update as `dd - mm - yyyy`
    #[tabled(rename = "UPDATED")]
    pub updated: String,

    #[tabled(rename = "URL")]
    pub url: String,
}

impl From<&RepositoryMetadata> for ProjectDisplay {
    fn from(repo: &RepositoryMetadata) -> Self {
        let description = repo
            .description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .map(|d| truncate(d, 60))
            .unwrap_or_else(|| MISSING.to_string());

        Self {
            full_name: repo.full_name.clone(),
            description,
            topics: format_list(&repo.topics),
            stars: repo.stargazers_count,
            updated: format_display_date(&repo.updated_at),
            url: repo.html_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn repo(description: Option<&str>) -> RepositoryMetadata {
        RepositoryMetadata {
            name: "dotfiles".to_string(),
            full_name: "alice/dotfiles".to_string(),
            description: description.map(str::to_string),
            html_url: "https://github.com/alice/dotfiles".to_string(),
            topics: vec!["linux".to_string(), "hyprland".to_string()],
            stargazers_count: 42,
            updated_at: Utc.with_ymd_and_hms(2024, 11, 5, 10, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_project_display_from_metadata() {
        let display = ProjectDisplay::from(&repo(Some("My desktop setup")));

        assert_eq!(display.full_name, "alice/dotfiles");
        assert_eq!(display.description, "My desktop setup");
        assert_eq!(display.topics, "linux, hyprland");
        assert_eq!(display.stars, 42);
        assert_eq!(display.updated, "05 - 11 - 2024");
    }

    #[test]
    fn test_project_display_missing_description() {
        assert_eq!(ProjectDisplay::from(&repo(None)).description, "--");
        assert_eq!(ProjectDisplay::from(&repo(Some("  "))).description, "--");
    }
}
