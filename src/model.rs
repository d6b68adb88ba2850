use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::search;

/// Coarse speaker category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Host-like.
    Primary,
    /// Guest-like.
    Counterpart,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Utterance {
    pub speaker_name: Option<String>,
    pub text: String,
    pub role: Role,
}

/// One on-air segment: title, optional host, dialogue and image references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Broadcast {
    pub title: String,
    pub host: Option<String>,
    pub utterances: Vec<Utterance>,
    pub images: Vec<String>,
}

impl Broadcast {
    pub fn titled(title: impl Into<String>) -> Self {
        Broadcast {
            title: title.into(),
            host: None,
            utterances: Vec::new(),
            images: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub date: String,
    pub author: String,
    pub excerpt: String,
    pub image: String,
    /// May contain `<br>` line-break markers.
    pub content: String,
}

const DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

impl Article {
    /// Publication timestamp, or `None` when `date` is not in a known shape.
    pub fn published(&self) -> Option<NaiveDateTime> {
        let date = self.date.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(date) {
            return Some(dt.naive_utc());
        }
        for fmt in DATE_TIME_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(date, fmt) {
                return Some(dt);
            }
        }
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    }
}

/// The unified record set returned by one parse. A feed holds a single
/// record kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "records", rename_all = "lowercase")]
pub enum Feed {
    Broadcasts(Vec<Broadcast>),
    Articles(Vec<Article>),
}

impl Feed {
    pub fn len(&self) -> usize {
        match self {
            Feed::Broadcasts(b) => b.len(),
            Feed::Articles(a) => a.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Feed::Broadcasts(_) => "broadcasts",
            Feed::Articles(_) => "articles",
        }
    }

    pub fn titles(&self) -> Vec<&str> {
        match self {
            Feed::Broadcasts(b) => b.iter().map(|r| r.title.as_str()).collect(),
            Feed::Articles(a) => a.iter().map(|r| r.title.as_str()).collect(),
        }
    }

    /// Records matching `query`, in source order.
    pub fn filter(&self, query: &str) -> Feed {
        match self {
            Feed::Broadcasts(b) => Feed::Broadcasts(
                b.iter().filter(|r| search::matches(*r, query)).cloned().collect(),
            ),
            Feed::Articles(a) => Feed::Articles(
                a.iter().filter(|r| search::matches(*r, query)).cloned().collect(),
            ),
        }
    }

    /// Orders articles newest first; undated articles go last, ties keep
    /// source order. Broadcasts carry no date and are left untouched.
    pub fn sort_newest_first(&mut self) {
        if let Feed::Articles(a) = self {
            a.sort_by_key(|r| std::cmp::Reverse(r.published()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(id: &str, date: &str) -> Article {
        Article {
            id: id.to_string(),
            title: format!("Title {}", id),
            date: date.to_string(),
            author: "Author".to_string(),
            excerpt: "Excerpt".to_string(),
            image: "img.jpg".to_string(),
            content: "Body".to_string(),
        }
    }

    #[test]
    fn published_accepts_known_shapes() {
        assert!(article("1", "2025-01-01").published().is_some());
        assert!(article("1", "2025-01-01 10:30:00").published().is_some());
        assert!(article("1", "2025-01-01T10:30:00").published().is_some());
        assert!(article("1", "2025-01-01T10:30:00+02:00").published().is_some());
        assert!(article("1", "yesterday").published().is_none());
    }

    #[test]
    fn newest_first_puts_undated_last() {
        let mut feed = Feed::Articles(vec![
            article("a", "2024-05-01"),
            article("b", "not a date"),
            article("c", "2025-01-01"),
        ]);
        feed.sort_newest_first();
        let Feed::Articles(a) = feed else { panic!("kind changed") };
        let ids: Vec<&str> = a.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn feed_serializes_with_kind_tag() {
        let feed = Feed::Broadcasts(vec![Broadcast::titled("📡 One")]);
        let json = serde_json::to_value(&feed).unwrap();
        assert_eq!(json["kind"], "broadcasts");
        assert_eq!(json["records"][0]["title"], "📡 One");
        assert!(json["records"][0]["host"].is_null());
    }
}
