use std::collections::HashSet;

use crate::error::SkippedRecord;
use crate::model::Article;

pub const FIELD_SEPARATOR: char = '|';
pub const COMMENT_PREFIX: char = '#';
pub const MIN_FIELDS: usize = 6;
pub const PLACEHOLDER_IMAGE: &str = "images/placeholder.jpg";
pub const LINE_BREAK: &str = "<br>";
const ESCAPED_NEWLINE: &str = "\\n";

/// Pipe-delimited records → articles. Comment and blank lines are ignored;
/// short lines and repeated ids are skipped and reported.
pub fn parse(raw: &str, skipped: &mut Vec<SkippedRecord>) -> Vec<Article> {
    let mut ids = ArticleIds::default();
    let mut articles = Vec::new();

    for (idx, line) in raw.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with(COMMENT_PREFIX) {
            continue;
        }
        let line_no = idx + 1;

        let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
        if fields.len() < MIN_FIELDS {
            skipped.push(SkippedRecord::new(
                line_no,
                format!("expected at least {} fields, found {}", MIN_FIELDS, fields.len()),
            ));
            continue;
        }

        let content = (fields.len() > MIN_FIELDS).then(|| fields[MIN_FIELDS..].join(&FIELD_SEPARATOR.to_string()));
        let article = build_article(
            fields[0],
            fields[1],
            fields[2],
            fields[3],
            fields[4],
            Some(fields[5]),
            content.as_deref(),
        );

        match ids.admit(&article.id) {
            Ok(()) => articles.push(article),
            Err(reason) => skipped.push(SkippedRecord::new(line_no, reason)),
        }
    }

    articles
}

/// Assemble an article from raw fields, applying the image placeholder,
/// the excerpt fallback for content and line-break conversion.
pub(crate) fn build_article(
    id: &str,
    title: &str,
    date: &str,
    author: &str,
    excerpt: &str,
    image: Option<&str>,
    content: Option<&str>,
) -> Article {
    let excerpt = excerpt.trim();
    let image = image.map(str::trim).filter(|i| !i.is_empty()).unwrap_or(PLACEHOLDER_IMAGE);
    let content = content.map(str::trim).filter(|c| !c.is_empty()).unwrap_or(excerpt);

    Article {
        id: id.trim().to_string(),
        title: title.trim().to_string(),
        date: date.trim().to_string(),
        author: author.trim().to_string(),
        excerpt: excerpt.to_string(),
        image: image.to_string(),
        content: content.replace(ESCAPED_NEWLINE, LINE_BREAK),
    }
}

/// Tracks ids already loaded from one document; first occurrence wins.
#[derive(Default)]
pub(crate) struct ArticleIds {
    seen: HashSet<String>,
}

impl ArticleIds {
    pub(crate) fn admit(&mut self, id: &str) -> Result<(), String> {
        if id.is_empty() {
            return Err("missing id".to_string());
        }
        if !self.seen.insert(id.to_string()) {
            return Err(format!("duplicate id {}", id));
        }
        Ok(())
    }
}
