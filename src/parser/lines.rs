use std::sync::LazyLock;

use regex::Regex;

use crate::model::{Role, Utterance};

pub const QUOTE_DASH: char = '—';
pub const HOST_KEYWORD: &str = "host";

static IMAGE_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^!\[\]\((.+\.(?:png|jpe?g|webp|gif))\)$").unwrap());
static IMAGE_KV_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^image:\s*(.+\.(?:png|jpe?g|webp|gif))$").unwrap());
static SPEAKER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^([^:]{1,60}):\s*(.*)$").unwrap());

/// Image path from `![](path.ext)` or `image: path.ext`, if the line is one.
pub fn detect_image(line: &str) -> Option<String> {
    IMAGE_LINK_RE
        .captures(line)
        .or_else(|| IMAGE_KV_RE.captures(line))
        .map(|caps| caps[1].trim().to_string())
        .filter(|path| !path.is_empty())
}

/// Classify one trimmed body line as a dialogue utterance.
///
/// `turns` counts the utterances already emitted in the current segment and
/// drives the role of anonymous lines: even → primary, odd → counterpart.
/// It is advanced for every utterance returned. Lines that are empty once the
/// dash is stripped yield `None` and leave the counter alone.
pub fn classify(line: &str, turns: &mut usize) -> Option<Utterance> {
    let stripped = strip_dash(line.trim());

    let (speaker_name, text) = match split_speaker(stripped) {
        Some((name, text)) => (Some(name.to_string()), text),
        None => (None, stripped),
    };
    if text.is_empty() {
        return None;
    }

    let role = next_role(speaker_name.as_deref(), turns);

    Some(Utterance {
        speaker_name,
        text: text.to_string(),
        role,
    })
}

/// Role for the next utterance of a segment. A host keyword in the name
/// wins; anonymous lines alternate on `turns`, which is then advanced.
pub fn next_role(speaker_name: Option<&str>, turns: &mut usize) -> Role {
    let role = match speaker_name {
        Some(name) => role_for_name(name),
        None if *turns % 2 == 0 => Role::Primary,
        None => Role::Counterpart,
    };
    *turns += 1;
    role
}

/// Named speakers are primary when their name mentions the host keyword.
pub fn role_for_name(name: &str) -> Role {
    if name.to_lowercase().contains(HOST_KEYWORD) {
        Role::Primary
    } else {
        Role::Counterpart
    }
}

fn strip_dash(line: &str) -> &str {
    match line.strip_prefix(QUOTE_DASH) {
        Some(rest) => rest.trim_start(),
        None => line,
    }
}

/// `Name: text` split; the name must survive trimming.
fn split_speaker(line: &str) -> Option<(&str, &str)> {
    let caps = SPEAKER_RE.captures(line)?;
    let name = caps.get(1)?.as_str().trim();
    if name.is_empty() {
        return None;
    }
    Some((name, caps.get(2)?.as_str().trim()))
}
