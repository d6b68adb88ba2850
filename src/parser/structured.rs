use serde_json::{Map, Value};

use crate::error::{ParseError, Result, SkippedRecord};
use crate::model::{Article, Broadcast, Feed, Utterance};

use super::flat::{build_article, ArticleIds};
use super::lines::next_role;
use super::Format;

const TITLE_KEYS: &[&str] = &["title", "name"];
const HOST_KEYS: &[&str] = &["host", "speaker"];
const DIALOG_KEYS: &[&str] = &["dialog", "dialogue", "utterances", "lines"];
const IMAGE_KEYS: &[&str] = &["images", "image"];
const UTTERANCE_NAME_KEYS: &[&str] = &["name", "speaker"];
const ARTICLE_MARKER_KEYS: &[&str] = &["id", "excerpt"];
/// Wrapper keys accepted when the document is an object around the array.
const WRAPPER_KEYS: &[&str] = &["posts", "items", "broadcasts", "articles"];

/// Normalize an already-parsed array of strings/objects into one feed kind.
pub fn parse(value: &Value, skipped: &mut Vec<SkippedRecord>) -> Result<Feed> {
    let entries = entries(value)?;

    let article_shaped = entries
        .iter()
        .find_map(Value::as_object)
        .is_some_and(|obj| ARTICLE_MARKER_KEYS.iter().any(|k| obj.contains_key(*k)));

    if article_shaped {
        Ok(Feed::Articles(parse_articles(entries, skipped)))
    } else {
        Ok(Feed::Broadcasts(parse_broadcasts(entries, skipped)))
    }
}

fn entries(value: &Value) -> Result<&[Value]> {
    match value {
        Value::Array(items) => Ok(items.as_slice()),
        Value::Object(obj) => {
            if let Some(items) = WRAPPER_KEYS.iter().find_map(|k| obj.get(*k).and_then(Value::as_array)) {
                Ok(items.as_slice())
            } else if TITLE_KEYS.iter().any(|k| obj.contains_key(*k)) {
                // a single post on its own
                Ok(std::slice::from_ref(value))
            } else {
                Err(malformed("object has no array of records"))
            }
        }
        other => Err(malformed(format!("expected an array, found {}", kind_of(other)))),
    }
}

fn parse_broadcasts(entries: &[Value], skipped: &mut Vec<SkippedRecord>) -> Vec<Broadcast> {
    let mut out = Vec::with_capacity(entries.len());
    for (idx, entry) in entries.iter().enumerate() {
        match entry {
            Value::String(title) if !title.trim().is_empty() => {
                out.push(Broadcast::titled(title.trim()));
            }
            Value::Object(obj) => match broadcast_from_object(obj) {
                Some(b) => out.push(b),
                None => skipped.push(SkippedRecord::new(idx, "object without a title")),
            },
            other => skipped.push(SkippedRecord::new(
                idx,
                format!("unsupported element: {}", kind_of(other)),
            )),
        }
    }
    out
}

fn broadcast_from_object(obj: &Map<String, Value>) -> Option<Broadcast> {
    let title = text_field(obj, TITLE_KEYS)?;
    let host = text_field(obj, HOST_KEYS);

    let mut turns = 0usize;
    let utterances: Vec<Utterance> = first_present(obj, DIALOG_KEYS)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| utterance_from_value(item, &mut turns))
                .collect()
        })
        .unwrap_or_default();

    let images = match first_present(obj, IMAGE_KEYS) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
        Some(Value::String(path)) if !path.trim().is_empty() => vec![path.trim().to_string()],
        _ => Vec::new(),
    };

    Some(Broadcast {
        title,
        host,
        utterances,
        images,
    })
}

/// Bare strings are anonymous; objects may carry a speaker name. Entries
/// without text are dropped and do not advance `turns`.
fn utterance_from_value(item: &Value, turns: &mut usize) -> Option<Utterance> {
    let (speaker_name, text) = match item {
        Value::String(text) => (None, text.trim().to_string()),
        Value::Object(obj) => (
            text_field(obj, UTTERANCE_NAME_KEYS),
            text_field(obj, &["text"]).unwrap_or_default(),
        ),
        _ => return None,
    };
    if text.is_empty() {
        return None;
    }

    let role = next_role(speaker_name.as_deref(), turns);

    Some(Utterance {
        speaker_name,
        text,
        role,
    })
}

fn parse_articles(entries: &[Value], skipped: &mut Vec<SkippedRecord>) -> Vec<Article> {
    let mut ids = ArticleIds::default();
    let mut out = Vec::new();

    for (idx, entry) in entries.iter().enumerate() {
        let Some(obj) = entry.as_object() else {
            skipped.push(SkippedRecord::new(
                idx,
                format!("unsupported element: {}", kind_of(entry)),
            ));
            continue;
        };
        let Some(article) = article_from_object(obj) else {
            skipped.push(SkippedRecord::new(idx, "missing required article field"));
            continue;
        };
        match ids.admit(&article.id) {
            Ok(()) => out.push(article),
            Err(reason) => skipped.push(SkippedRecord::new(idx, reason)),
        }
    }
    out
}

fn article_from_object(obj: &Map<String, Value>) -> Option<Article> {
    let id = text_field(obj, &["id"])?;
    let title = text_field(obj, &["title"])?;
    let date = text_field(obj, &["date"])?;
    let author = text_field(obj, &["author"])?;
    let excerpt = text_field(obj, &["excerpt"])?;
    let image = text_field(obj, &["image"]);
    let content = text_field(obj, &["content"]);
    Some(build_article(
        &id,
        &title,
        &date,
        &author,
        &excerpt,
        image.as_deref(),
        content.as_deref(),
    ))
}

fn first_present<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|k| obj.get(*k).filter(|v| !v.is_null()))
}

/// First non-empty string (or number, for ids) under any of `keys`.
fn text_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| match obj.get(*k)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn malformed(reason: impl Into<String>) -> ParseError {
    ParseError::MalformedInput {
        format: Format::Structured,
        reason: reason.into(),
    }
}
