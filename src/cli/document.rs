//! Shared printing of markdown documents

use colored::Colorize;
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::content::Document;
use crate::error::{Error, Result};
use crate::output::json::format_json;

#[derive(Serialize)]
struct DocumentJson<'a> {
    web_url: &'a str,
    content: &'a str,
}

/// Print a loaded document, or turn a failure into an error carrying the
/// external link.
pub fn print(document: &Document, format: OutputFormat) -> Result<()> {
    match document {
        Document::Loaded { content, web_url } => {
            match format {
                OutputFormat::Json => {
                    println!("{}", format_json(&DocumentJson { web_url, content })?);
                }
                OutputFormat::Table => println!("{}", content),
                OutputFormat::Pretty => {
                    println!("{}", content.trim_end());
                    eprintln!("\n{} {}", "View on GitHub:".dimmed(), web_url.cyan());
                }
            }
            Ok(())
        }
        Document::Failed {
            web_url: Some(web_url),
        } => Err(Error::ContentUnavailable {
            web_url: web_url.clone(),
        }),
        Document::Failed { web_url: None } => Err(Error::Other(
            "Document location could not be determined".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_with_link() {
        let doc = Document::Failed {
            web_url: Some("https://github.com/o/r/blob/main/a.md".to_string()),
        };
        match print(&doc, OutputFormat::Pretty) {
            Err(Error::ContentUnavailable { web_url }) => {
                assert_eq!(web_url, "https://github.com/o/r/blob/main/a.md")
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_failed_without_link() {
        let doc = Document::Failed { web_url: None };
        assert!(matches!(
            print(&doc, OutputFormat::Json),
            Err(Error::Other(_))
        ));
    }

    #[test]
    fn test_loaded_prints() {
        let doc = Document::Loaded {
            content: "# Hi".to_string(),
            web_url: "https://github.com/o/r/blob/main/README.md".to_string(),
        };
        assert!(print(&doc, OutputFormat::Table).is_ok());
    }
}
