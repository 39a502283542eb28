//! Top-level write-up directories and their ordering

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A top-level directory of the write-ups repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteupDir {
    pub name: String,
    pub path: String,
    pub html_url: String,
    /// Most recent commit touching `path`, if it could be determined
    #[serde(default)]
    pub last_commit_date: Option<DateTime<Utc>>,
}

/// Most recent first; directories without a known date go last.
pub fn compare_by_last_commit(a: &WriteupDir, b: &WriteupDir) -> Ordering {
    match (a.last_commit_date, b.last_commit_date) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable sort, so equal dates keep their listing order.
pub fn sort_by_last_commit(dirs: &mut [WriteupDir]) {
    dirs.sort_by(compare_by_last_commit);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn dir(name: &str, date: Option<(i32, u32, u32, u32)>) -> WriteupDir {
        WriteupDir {
            name: name.to_string(),
            path: name.to_string(),
            html_url: format!("https://github.com/alice/CTF/tree/main/{}", name),
            last_commit_date: date
                .and_then(|(y, m, d, h)| Utc.with_ymd_and_hms(y, m, d, h, 0, 0).single()),
        }
    }

    fn names(dirs: &[WriteupDir]) -> Vec<&str> {
        dirs.iter().map(|d| d.name.as_str()).collect()
    }

    #[test]
    fn test_known_dates_descending_unknown_last() {
        let mut dirs = vec![
            dir("old", Some((2023, 1, 1, 0))),
            dir("unknown-1", None),
            dir("new", Some((2024, 6, 1, 0))),
            dir("unknown-2", None),
            dir("mid", Some((2023, 9, 15, 0))),
        ];

        sort_by_last_commit(&mut dirs);

        assert_eq!(names(&dirs), vec!["new", "mid", "old", "unknown-1", "unknown-2"]);
    }

    #[test]
    fn test_same_day_compared_at_full_precision() {
        let mut dirs = vec![
            dir("morning", Some((2024, 3, 9, 8))),
            dir("evening", Some((2024, 3, 9, 20))),
        ];

        sort_by_last_commit(&mut dirs);

        assert_eq!(names(&dirs), vec!["evening", "morning"]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let mut dirs = vec![
            dir("b", Some((2024, 1, 1, 0))),
            dir("a", Some((2024, 1, 1, 0))),
            dir("c", None),
        ];

        sort_by_last_commit(&mut dirs);

        assert_eq!(names(&dirs), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_cache_payload_roundtrip_keeps_missing_date() {
        let json = r#"{"name": "pwn", "path": "pwn", "html_url": "u"}"#;
        let parsed: WriteupDir = serde_json::from_str(json).unwrap();
        assert!(parsed.last_commit_date.is_none());
    }
}
