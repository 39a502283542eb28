//! Commit models (only the fields the listing needs)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One element of `GET /repos/{owner}/{repo}/commits`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitSummary {
    pub commit: CommitDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitDetail {
    pub committer: Option<CommitPerson>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitPerson {
    pub date: Option<DateTime<Utc>>,
}

impl CommitSummary {
    /// Committer date, if the host reported one
    pub fn committed_at(&self) -> Option<DateTime<Utc>> {
        self.commit.committer.as_ref().and_then(|c| c.date)
    }
}
