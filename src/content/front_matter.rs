//! Front-matter parsing for content files.
//!
//! A content file is a `+++`-delimited TOML header followed by freeform
//! markdown body text:
//!
//! ```text
//! +++
//! title = "Hello World"
//! emoji = "👋"
//! date = "2024-06-01"
//! +++
//!
//! Body text starts here.
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Delimiter line separating the header from the body.
const DELIMITER: &str = "+++";

/// Front-matter errors. The offending file is attached by the caller.
#[derive(Debug, Error)]
pub enum FrontMatterError {
    #[error("missing opening `+++` delimiter")]
    MissingOpeningDelimiter,

    #[error("missing closing `+++` delimiter")]
    MissingClosingDelimiter,

    #[error("invalid front matter")]
    Toml(#[from] toml::de::Error),
}

/// Structured metadata header of a content document.
///
/// Known fields are typed; anything else lands in `extra` untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrontMatter {
    /// Document title.
    pub title: String,

    /// URL-path-safe identifier. Absent means the category index document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,

    /// Emoji prefixed to the page title in the document head.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,

    /// Publication date as ISO 8601 string (e.g., "2024-01-15").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    /// Unpublished documents are excluded from listings entirely.
    #[serde(default = "default_published")]
    pub published: bool,

    /// Arbitrary author-defined fields.
    #[serde(flatten)]
    pub extra: HashMap<String, toml::Value>,
}

fn default_published() -> bool {
    true
}

/// Split a raw file into its header and body parts.
///
/// The header is everything between the first and second `+++` lines; the
/// body is everything after the closing delimiter line.
pub fn split(raw: &str) -> Result<(&str, &str), FrontMatterError> {
    let rest = raw
        .strip_prefix(DELIMITER)
        .and_then(|r| r.strip_prefix('\n').or_else(|| r.strip_prefix("\r\n")))
        .ok_or(FrontMatterError::MissingOpeningDelimiter)?;

    // Closing delimiter must sit on its own line
    let close = format!("\n{DELIMITER}");
    let end = rest
        .find(&close)
        .ok_or(FrontMatterError::MissingClosingDelimiter)?;

    let header = rest[..end].trim_end_matches('\r');
    let body = rest[end + close.len()..].trim_start_matches(['\r', '\n']);
    Ok((header, body))
}

/// Parse a raw file into front matter and body.
pub fn parse(raw: &str) -> Result<(FrontMatter, String), FrontMatterError> {
    let (header, body) = split(raw)?;
    let front: FrontMatter = toml::from_str(header)?;
    Ok((front, body.to_owned()))
}
