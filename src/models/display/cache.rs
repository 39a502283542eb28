//! Cache status display model

use serde::Serialize;
use tabled::Tabled;

use crate::cache::CacheCategory;

/// One cache category for table/JSON output.
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct CacheStatusDisplay {
    #[tabled(rename = "CATEGORY")]
    pub category: String,

    #[tabled(rename = "KEY")]
    pub key: String,

    #[tabled(rename = "VALID")]
    pub valid: bool,
}

impl From<(CacheCategory, bool)> for CacheStatusDisplay {
    fn from((category, valid): (CacheCategory, bool)) -> Self {
        Self {
            category: category.to_string(),
            key: category.key().to_string(),
            valid,
        }
    }
}
