use std::fmt::Write;

use crate::model::Broadcast;

use super::lines::QUOTE_DASH;
use super::segments::{normalize_title, HOST_MARKER};

/// Serialize broadcasts back into the sigil-delimited text format.
///
/// Images are written before the dialogue as `![](path)` lines and every
/// utterance gets the quotation dash, so re-parsing the output yields the same
/// records for anything the free-text parser produced.
pub fn write_free_text(broadcasts: &[Broadcast]) -> String {
    let mut out = String::new();
    for (i, b) in broadcasts.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        write_broadcast(&mut out, b);
    }
    out
}

fn write_broadcast(out: &mut String, b: &Broadcast) {
    let _ = writeln!(out, "{}", normalize_title(&b.title));
    if let Some(host) = &b.host {
        let _ = writeln!(out, "{} {}", HOST_MARKER, host);
    }
    for image in &b.images {
        let _ = writeln!(out, "![]({})", image);
    }
    for u in &b.utterances {
        match &u.speaker_name {
            Some(name) => {
                let _ = writeln!(out, "{} {}: {}", QUOTE_DASH, name, u.text);
            }
            None => {
                let _ = writeln!(out, "{} {}", QUOTE_DASH, u.text);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::free_text;

    #[test]
    fn layout() {
        let parsed = free_text::parse("📡 T\n🎙 Ann\n— Host: hi\n![](a.png)\n— plain");
        let text = write_free_text(&parsed);
        assert_eq!(text, "📡 T\n🎙 Ann\n![](a.png)\n— Host: hi\n— plain\n");
    }

    #[test]
    fn adds_missing_sigil() {
        let text = write_free_text(&[Broadcast::titled("Bare")]);
        assert_eq!(text, "📡 Bare\n");
    }

    #[test]
    fn efir_fixture_survives_rewrite() {
        let raw = std::fs::read_to_string("tests/fixtures/efir.txt").unwrap();
        let first = free_text::parse(&raw);
        let second = free_text::parse(&write_free_text(&first));
        assert_eq!(first, second);
    }
}
