use crate::model::Broadcast;

use super::lines::{classify, detect_image};
use super::segments::{read_segment, split_segments, Segment};

/// Sigil-delimited text → broadcasts, one per segment, in document order.
pub fn parse(raw: &str) -> Vec<Broadcast> {
    split_segments(raw)
        .into_iter()
        .filter_map(read_segment)
        .map(build_broadcast)
        .collect()
}

fn build_broadcast(segment: Segment<'_>) -> Broadcast {
    let mut images = Vec::new();
    let mut utterances = Vec::with_capacity(segment.body.len());
    let mut turns = 0usize;

    for line in segment.body {
        if let Some(path) = detect_image(line) {
            images.push(path);
        } else if let Some(utterance) = classify(line, &mut turns) {
            utterances.push(utterance);
        }
    }

    tracing::trace!(
        title = %segment.title,
        utterances = utterances.len(),
        images = images.len(),
        "segment parsed"
    );

    Broadcast {
        title: segment.title,
        host: segment.host,
        utterances,
        images,
    }
}
