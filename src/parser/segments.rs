pub const TITLE_SIGIL: char = '📡';
pub const HOST_MARKER: char = '🎙';
const VARIATION_SELECTOR: char = '\u{FE0F}';

/// One broadcast's raw pieces before dialogue classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment<'a> {
    pub title: String,
    pub host: Option<String>,
    pub body: Vec<&'a str>,
}

/// Split a document right before every line that starts with the sigil.
/// Text ahead of the first sigil line is not a segment and is dropped.
pub fn split_segments(raw: &str) -> Vec<&str> {
    let mut starts = Vec::new();
    let mut offset = 0;
    for line in raw.split_inclusive('\n') {
        if line.trim_start().starts_with(TITLE_SIGIL) {
            starts.push(offset);
        }
        offset += line.len();
    }

    if let Some(&first) = starts.first() {
        if !raw[..first].trim().is_empty() {
            tracing::debug!(bytes = first, "dropping text before first segment");
        }
    }

    starts
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(raw.len());
            raw[start..end].trim()
        })
        .filter(|s| !s.is_empty())
        .collect()
}

/// Break one segment into title, optional host line, and body lines.
/// Returns `None` only for a segment with no non-blank lines.
pub fn read_segment(segment: &str) -> Option<Segment<'_>> {
    let mut lines = segment.lines().map(str::trim).filter(|l| !l.is_empty()).peekable();

    let title = normalize_title(lines.next()?);
    let host = match lines.peek() {
        Some(line) if line.starts_with(HOST_MARKER) => {
            let host = strip_host_marker(line).to_string();
            lines.next();
            Some(host).filter(|h| !h.is_empty())
        }
        _ => None,
    };

    Some(Segment {
        title,
        host,
        body: lines.collect(),
    })
}

/// Prefix the sigil onto a title that lacks it.
pub fn normalize_title(title: &str) -> String {
    let title = title.trim();
    if title.starts_with(TITLE_SIGIL) {
        title.to_string()
    } else {
        format!("{} {}", TITLE_SIGIL, title)
    }
}

fn strip_host_marker(line: &str) -> &str {
    line.trim_start_matches(HOST_MARKER)
        .trim_start_matches(VARIATION_SELECTOR)
        .trim()
}
