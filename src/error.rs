use thiserror::Error;

use crate::parser::Format;

/// Failures that abort a whole parse. Individual malformed records never
/// end up here; they are reported as [`SkippedRecord`]s instead.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The input as a whole is not a value the selected format can read.
    #[error("malformed {format} input: {reason}")]
    MalformedInput { format: Format, reason: String },

    #[error("unknown format {0:?}, expected free-text, flat-record or structured")]
    UnknownFormat(String),
}

pub type Result<T> = std::result::Result<T, ParseError>;

/// A record dropped while the rest of the document kept parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    /// 1-based line number for flat records, 0-based element index for
    /// structured input.
    pub position: usize,
    pub reason: String,
}

impl SkippedRecord {
    pub fn new(position: usize, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        tracing::debug!(position, reason = %reason, "skipping record");
        SkippedRecord { position, reason }
    }
}
