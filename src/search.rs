use crate::model::{Article, Broadcast};

/// Anything the free-text filter can look into.
pub trait Searchable {
    /// Every textual field of the record, joined by newlines.
    fn haystack(&self) -> String;
}

impl Searchable for Broadcast {
    fn haystack(&self) -> String {
        let mut parts: Vec<&str> = vec![self.title.as_str()];
        if let Some(host) = &self.host {
            parts.push(host.as_str());
        }
        for u in &self.utterances {
            if let Some(name) = &u.speaker_name {
                parts.push(name.as_str());
            }
            parts.push(u.text.as_str());
        }
        parts.join("\n")
    }
}

impl Searchable for Article {
    fn haystack(&self) -> String {
        [
            self.title.as_str(),
            self.author.as_str(),
            self.excerpt.as_str(),
            self.content.as_str(),
        ]
        .join("\n")
    }
}

/// Case-insensitive substring match. An empty query matches everything.
pub fn matches<R: Searchable + ?Sized>(record: &R, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    record
        .haystack()
        .to_lowercase()
        .contains(&query.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Role, Utterance};

    fn sample() -> Broadcast {
        Broadcast {
            title: "📡 Morning Show".to_string(),
            host: Some("Olena".to_string()),
            utterances: vec![Utterance {
                speaker_name: Some("Guest".to_string()),
                text: "Weather is CLEAR today".to_string(),
                role: Role::Counterpart,
            }],
            images: vec!["images/secret.png".to_string()],
        }
    }

    #[test]
    fn empty_query_always_matches() {
        assert!(matches(&sample(), ""));
        assert!(matches(&Broadcast::titled("x"), ""));
    }

    #[test]
    fn case_folded_fields() {
        let b = sample();
        assert!(matches(&b, "morning"));
        assert!(matches(&b, "OLENA"));
        assert!(matches(&b, "guest"));
        assert!(matches(&b, "clear today"));
        assert!(!matches(&b, "evening"));
    }

    #[test]
    fn images_are_not_searched() {
        assert!(!matches(&sample(), "secret"));
    }

    #[test]
    fn no_match_across_field_boundary() {
        // "Show" ends the title, "Olena" starts the host line
        assert!(!matches(&sample(), "show olena"));
    }

    #[test]
    fn cyrillic_case_folding() {
        let b = Broadcast::titled("📡 Ранковий ЕФІР");
        assert!(matches(&b, "ефір"));
    }

    #[test]
    fn article_fields() {
        let a = Article {
            id: "1".to_string(),
            title: "Title".to_string(),
            date: "2025-01-01".to_string(),
            author: "Jane Doe".to_string(),
            excerpt: "Short".to_string(),
            image: "img.jpg".to_string(),
            content: "Long<br>body".to_string(),
        };
        assert!(matches(&a, "jane"));
        assert!(matches(&a, "LONG"));
        assert!(!matches(&a, "img"));
        assert!(!matches(&a, "2025"));
    }
}
