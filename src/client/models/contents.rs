//! Contents API models

use base64::{Engine as _, engine::general_purpose};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Kind of an item in a contents listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    File,
    Dir,
    Symlink,
    Submodule,
    #[serde(other)]
    Unknown,
}

/// One item of `GET /repos/{owner}/{repo}/contents`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentItem {
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(rename = "type")]
    pub kind: ContentKind,
}

/// A single file from the contents API, with its body base64-encoded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentFile {
    pub path: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub encoding: Option<String>,
}

impl ContentFile {
    /// Decode the file body into text.
    ///
    /// The host wraps base64 at 60 columns, so whitespace is stripped first.
    pub fn decode(&self) -> Result<String, ApiError> {
        let context = format!("file {}", self.path);
        match self.encoding.as_deref() {
            Some("base64") | None => {
                let compact: String = self
                    .content
                    .chars()
                    .filter(|c| !c.is_whitespace())
                    .collect();
                let bytes = general_purpose::STANDARD
                    .decode(compact.as_bytes())
                    .map_err(|e| ApiError::malformed(&context, e))?;
                String::from_utf8(bytes).map_err(|e| ApiError::malformed(&context, e))
            }
            Some(other) => Err(ApiError::malformed(
                context,
                format!("unsupported content encoding {}", other),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureReason;

    #[test]
    fn test_content_item_kinds() {
        let json = r#"[
            {"name": "pwn", "path": "pwn", "type": "dir", "html_url": "https://github.com/a/b/tree/main/pwn"},
            {"name": "README.md", "path": "README.md", "type": "file"},
            {"name": "weird", "path": "weird", "type": "portal"}
        ]"#;
        let items: Vec<ContentItem> = serde_json::from_str(json).unwrap();
        assert_eq!(items[0].kind, ContentKind::Dir);
        assert_eq!(items[1].kind, ContentKind::File);
        assert_eq!(items[2].kind, ContentKind::Unknown);
    }

    #[test]
    fn test_decode_wrapped_base64() {
        let file = ContentFile {
            path: "README.md".to_string(),
            content: "IyBIZWxs\nbyB3b3Js\nZA==\n".to_string(),
            encoding: Some("base64".to_string()),
        };
        assert_eq!(file.decode().unwrap(), "# Hello world");
    }

    #[test]
    fn test_decode_rejects_unknown_encoding() {
        let file = ContentFile {
            path: "big.bin".to_string(),
            content: String::new(),
            encoding: Some("none".to_string()),
        };
        let err = file.decode().unwrap_err();
        assert_eq!(err.reason(), FailureReason::Malformed);
        assert!(err.to_string().contains("big.bin"));
    }

    #[test]
    fn test_decode_invalid_base64_is_malformed() {
        let file = ContentFile {
            path: "pwn/README.md".to_string(),
            content: "not base64 at all!".to_string(),
            encoding: Some("base64".to_string()),
        };
        let err = file.decode().unwrap_err();
        assert!(matches!(err, ApiError::Malformed { .. }));
    }
}
