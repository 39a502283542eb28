//! Write-up directory display model

use serde::Serialize;
use tabled::Tabled;

use crate::content::WriteupDir;
use crate::output::formatters::format_optional_date;

/// Write-up directory display model for table/JSON output.
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct WriteupDisplay {
    #[tabled(rename = "NAME")]
    pub name: String,

    /// Date of the latest commit touching the directory, or `--`
    #[tabled(rename = "UPDATED")]
    pub updated: String,

    #[tabled(rename = "URL")]
    pub url: String,
}

impl From<&WriteupDir> for WriteupDisplay {
    fn from(dir: &WriteupDir) -> Self {
        Self {
            name: dir.name.clone(),
            updated: format_optional_date(dir.last_commit_date.as_ref()),
            url: dir.html_url.clone(),
        }
    }
}
