pub mod flat;
pub mod free_text;
pub mod lines;
pub mod segments;
pub mod structured;
pub mod writer;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde_json::Value;

use crate::error::{ParseError, Result, SkippedRecord};
use crate::model::Feed;

const BYTE_ORDER_MARK: char = '\u{FEFF}';

/// Source encodings the dispatcher knows how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// Sigil-delimited broadcast text.
    FreeText,
    /// One `|`-separated article per line.
    FlatRecord,
    /// JSON array of strings/objects.
    Structured,
}

impl Format {
    /// Format implied by a file extension; unknown or missing → free text.
    pub fn from_path(path: &Path) -> Format {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("json") => Format::Structured,
            Some("psv") | Some("pipe") => Format::FlatRecord,
            _ => Format::FreeText,
        }
    }

    /// A declared format always wins over the path hint.
    pub fn resolve(declared: Option<Format>, path: Option<&Path>) -> Format {
        declared
            .or_else(|| path.map(Format::from_path))
            .unwrap_or(Format::FreeText)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Format::FreeText => "free-text",
            Format::FlatRecord => "flat-record",
            Format::Structured => "structured",
        })
    }
}

impl FromStr for Format {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "free-text" | "text" | "txt" => Ok(Format::FreeText),
            "flat-record" | "flat" | "pipe" | "psv" => Ok(Format::FlatRecord),
            "structured" | "json" => Ok(Format::Structured),
            other => Err(ParseError::UnknownFormat(other.to_string())),
        }
    }
}

/// Raw input: text, or a value that was already decoded from JSON.
#[derive(Debug, Clone, Copy)]
pub enum Content<'a> {
    Text(&'a str),
    Value(&'a Value),
}

impl<'a> From<&'a str> for Content<'a> {
    fn from(text: &'a str) -> Self {
        Content::Text(text)
    }
}

impl<'a> From<&'a String> for Content<'a> {
    fn from(text: &'a String) -> Self {
        Content::Text(text)
    }
}

impl<'a> From<&'a Value> for Content<'a> {
    fn from(value: &'a Value) -> Self {
        Content::Value(value)
    }
}

/// Feed plus the records that were dropped on the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parsed {
    pub feed: Feed,
    pub skipped: Vec<SkippedRecord>,
}

/// Parse `content` with the adapter selected by `format`.
///
/// Malformed individual records are skipped. The only hard failure is an
/// input that is not a value of the selected format at all.
pub fn parse<'a>(content: impl Into<Content<'a>>, format: Format) -> Result<Feed> {
    parse_detailed(content, format).map(|p| p.feed)
}

/// Like [`parse`], also returning what was skipped.
pub fn parse_detailed<'a>(content: impl Into<Content<'a>>, format: Format) -> Result<Parsed> {
    let content = strip_bom(content.into());
    let mut skipped = Vec::new();

    let feed = match format {
        Format::FreeText => Feed::Broadcasts(free_text::parse(as_text(content, format)?)),
        Format::FlatRecord => Feed::Articles(flat::parse(as_text(content, format)?, &mut skipped)),
        Format::Structured => match content {
            Content::Value(value) => structured::parse(value, &mut skipped)?,
            Content::Text(text) => {
                let value: Value =
                    serde_json::from_str(text).map_err(|e| ParseError::MalformedInput {
                        format,
                        reason: e.to_string(),
                    })?;
                structured::parse(&value, &mut skipped)?
            }
        },
    };

    tracing::debug!(
        %format,
        kind = feed.kind(),
        records = feed.len(),
        skipped = skipped.len(),
        "parsed feed"
    );
    Ok(Parsed { feed, skipped })
}

/// Shortcut for already-decoded structured input.
pub fn parse_value(value: &Value) -> Result<Feed> {
    parse(value, Format::Structured)
}

/// Drop one leading UTF-8 byte-order mark from text input.
fn strip_bom(content: Content<'_>) -> Content<'_> {
    match content {
        Content::Text(text) => Content::Text(text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text)),
        other => other,
    }
}

fn as_text(content: Content<'_>, format: Format) -> Result<&str> {
    match content {
        Content::Text(text) => Ok(text),
        Content::Value(Value::String(text)) => Ok(text.as_str()),
        Content::Value(_) => Err(ParseError::MalformedInput {
            format,
            reason: "expected text, found a structured value".to_string(),
        }),
    }
}
