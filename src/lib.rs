//! Format-detecting parser for broadcast transcripts and article feeds.
//!
//! Three encodings of the same content are supported: sigil-delimited free
//! text, pipe-delimited flat records and JSON arrays. Each is normalized into
//! a [`Feed`] of [`Broadcast`]s or [`Article`]s which can then be filtered
//! with [`matches`].

pub mod error;
pub mod model;
pub mod parser;
pub mod search;

pub use error::{ParseError, Result, SkippedRecord};
pub use model::{Article, Broadcast, Feed, Role, Utterance};
pub use parser::writer::write_free_text;
pub use parser::{parse, parse_detailed, parse_value, Content, Format, Parsed};
pub use search::{matches, Searchable};
