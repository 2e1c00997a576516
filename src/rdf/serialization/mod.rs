//! Turtle interchange
//!
//! The export writes the full triple set as Turtle with a `@prefix` header;
//! the import parses Turtle back into triples via rio. Export followed by
//! import yields the same triple set.

mod turtle;

pub use turtle::{parse_turtle, write_turtle};

use thiserror::Error;

/// Errors from parsing interchange text
#[derive(Error, Debug)]
pub enum ParseError {
    /// Malformed syntax
    #[error("turtle syntax error: {0}")]
    Syntax(String),

    /// Term outside the store's data model
    #[error("unsupported term: {0}")]
    UnsupportedTerm(String),
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Errors from producing interchange text
#[derive(Error, Debug)]
pub enum SerializeError {
    /// Identifier not expressible as a valid IRI even after sanitization
    #[error("identifier not serializable as an IRI: {0}")]
    UnserializableIri(String),

    /// Output formatting failed
    #[error("serialization failed: {0}")]
    Format(String),
}

pub type SerializeResult<T> = Result<T, SerializeError>;
