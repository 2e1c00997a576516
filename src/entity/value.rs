//! Property values and their literal codec
//!
//! Entity properties are scalar values from a closed set; each kind maps to
//! an XSD datatype for storage as an RDF literal.

use crate::rdf::{Iri, Literal};
use chrono::{DateTime, Utc};
use std::fmt;
use thiserror::Error;

/// XSD datatype IRIs used by the codec
pub mod xsd {
    pub const STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
    pub const INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
    pub const DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
    pub const BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
    pub const DATE_TIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";
}

/// Codec errors
#[derive(Error, Debug)]
pub enum ValueError {
    /// Stored literal has a datatype the property does not accept
    #[error("unexpected datatype for {kind} value: {datatype}")]
    UnexpectedDatatype {
        kind: ValueKind,
        datatype: String,
    },

    /// Lexical form does not parse as the expected kind
    #[error("malformed {kind} literal: {lexical}")]
    Malformed { kind: ValueKind, lexical: String },
}

pub type ValueResult<T> = Result<T, ValueError>;

/// The kind of a property value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    String,
    Integer,
    Float,
    Boolean,
    DateTime,
}

impl ValueKind {
    /// XSD datatype IRI this kind is stored under
    pub fn datatype(&self) -> &'static str {
        match self {
            ValueKind::String => xsd::STRING,
            ValueKind::Integer => xsd::INTEGER,
            ValueKind::Float => xsd::DOUBLE,
            ValueKind::Boolean => xsd::BOOLEAN,
            ValueKind::DateTime => xsd::DATE_TIME,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::String => "string",
            ValueKind::Integer => "integer",
            ValueKind::Float => "float",
            ValueKind::Boolean => "boolean",
            ValueKind::DateTime => "datetime",
        };
        write!(f, "{}", name)
    }
}

/// A scalar property value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    DateTime(DateTime<Utc>),
}

impl Value {
    /// The kind of this value
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::String(_) => ValueKind::String,
            Value::Integer(_) => ValueKind::Integer,
            Value::Float(_) => ValueKind::Float,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::DateTime(_) => ValueKind::DateTime,
        }
    }

    /// Get the string if this is one
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the integer if this is one
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Get the float if this is one
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Get the boolean if this is one
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Get the datetime if this is one
    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    /// Encode as an RDF literal
    pub fn to_literal(&self) -> Literal {
        match self {
            Value::String(s) => Literal::new_string(s.clone()),
            Value::Integer(i) => typed_literal(i.to_string(), xsd::INTEGER),
            Value::Float(f) => typed_literal(f.to_string(), xsd::DOUBLE),
            Value::Boolean(b) => typed_literal(b.to_string(), xsd::BOOLEAN),
            Value::DateTime(dt) => typed_literal(
                dt.to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
                xsd::DATE_TIME,
            ),
        }
    }

    /// Decode a literal expected to hold a value of `kind`
    pub fn from_literal(literal: &Literal, kind: ValueKind) -> ValueResult<Self> {
        let datatype = literal.datatype();
        if datatype.as_str() != kind.datatype() {
            return Err(ValueError::UnexpectedDatatype {
                kind,
                datatype: datatype.as_str().to_string(),
            });
        }
        let lexical = literal.value();
        let malformed = || ValueError::Malformed {
            kind,
            lexical: lexical.to_string(),
        };
        match kind {
            ValueKind::String => Ok(Value::String(lexical.to_string())),
            ValueKind::Integer => lexical
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|_| malformed()),
            ValueKind::Float => lexical
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| malformed()),
            ValueKind::Boolean => lexical
                .parse::<bool>()
                .map(Value::Boolean)
                .map_err(|_| malformed()),
            ValueKind::DateTime => DateTime::parse_from_rfc3339(lexical)
                .map(|dt| Value::DateTime(dt.with_timezone(&Utc)))
                .map_err(|_| malformed()),
        }
    }
}

// xsd constants are valid IRIs
fn typed_literal(lexical: String, datatype: &str) -> Literal {
    match Iri::new(datatype) {
        Ok(dt) => Literal::new_typed(lexical, dt),
        Err(_) => Literal::new_string(lexical),
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(fl) => write!(f, "{}", fl),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::DateTime(dt) => write!(f, "{}", dt.to_rfc3339()),
        }
    }
}

// Convenience conversions
impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(dt: DateTime<Utc>) -> Self {
        Value::DateTime(dt)
    }
}
