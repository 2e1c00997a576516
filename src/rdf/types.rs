//! RDF triple primitives
//!
//! Thin wrappers around the oxrdf types. Subjects and predicates are always
//! IRIs in this store; objects are IRIs or literals. Blank nodes are not
//! part of the data model.

use oxrdf::{Literal as OxLiteral, NamedNode as OxNamedNode};
use std::fmt;
use thiserror::Error;

/// Errors from constructing RDF terms
#[derive(Error, Debug)]
pub enum RdfError {
    /// Invalid IRI
    #[error("invalid IRI: {0}")]
    InvalidIri(String),

    /// Invalid literal
    #[error("invalid literal: {0}")]
    InvalidLiteral(String),
}

pub type RdfResult<T> = Result<T, RdfError>;

/// An IRI reference
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Iri(OxNamedNode);

impl Iri {
    /// Create a new IRI, validating the string form
    pub fn new(iri: impl Into<String>) -> RdfResult<Self> {
        OxNamedNode::new(iri.into())
            .map(Self)
            .map_err(|e| RdfError::InvalidIri(e.to_string()))
    }

    /// Get the IRI string
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Get the inner oxrdf node
    pub fn inner(&self) -> &OxNamedNode {
        &self.0
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.as_str())
    }
}

impl From<OxNamedNode> for Iri {
    fn from(node: OxNamedNode) -> Self {
        Self(node)
    }
}

impl From<Iri> for OxNamedNode {
    fn from(iri: Iri) -> Self {
        iri.0
    }
}

/// An RDF literal with a datatype or language tag
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Literal(OxLiteral);

impl Literal {
    /// Create a plain string literal
    pub fn new_string(value: impl Into<String>) -> Self {
        Self(OxLiteral::new_simple_literal(value))
    }

    /// Create a typed literal
    pub fn new_typed(value: impl Into<String>, datatype: Iri) -> Self {
        Self(OxLiteral::new_typed_literal(value, datatype.0))
    }

    /// Create a language-tagged literal
    pub fn new_language_tagged(
        value: impl Into<String>,
        language: impl Into<String>,
    ) -> RdfResult<Self> {
        OxLiteral::new_language_tagged_literal(value, language)
            .map(Self)
            .map_err(|e| RdfError::InvalidLiteral(e.to_string()))
    }

    /// Get the lexical value
    pub fn value(&self) -> &str {
        self.0.value()
    }

    /// Get the language tag if present
    pub fn language(&self) -> Option<&str> {
        self.0.language()
    }

    /// Get the datatype IRI
    pub fn datatype(&self) -> Iri {
        Iri(self.0.datatype().into_owned())
    }

    /// Get the inner oxrdf literal
    pub fn inner(&self) -> &OxLiteral {
        &self.0
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(lang) = self.language() {
            write!(f, "\"{}\"@{}", self.value(), lang)
        } else {
            write!(f, "\"{}\"^^{}", self.value(), self.datatype())
        }
    }
}

impl From<OxLiteral> for Literal {
    fn from(lit: OxLiteral) -> Self {
        Self(lit)
    }
}

impl From<Literal> for OxLiteral {
    fn from(lit: Literal) -> Self {
        lit.0
    }
}

/// Object position of a triple: an IRI or a literal
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    /// IRI reference
    Iri(Iri),
    /// Literal value
    Literal(Literal),
}

impl Term {
    /// Check if this is an IRI
    pub fn is_iri(&self) -> bool {
        matches!(self, Term::Iri(_))
    }

    /// Check if this is a literal
    pub fn is_literal(&self) -> bool {
        matches!(self, Term::Literal(_))
    }

    /// Get the IRI if this is one
    pub fn as_iri(&self) -> Option<&Iri> {
        match self {
            Term::Iri(iri) => Some(iri),
            Term::Literal(_) => None,
        }
    }

    /// Get the literal if this is one
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Term::Literal(lit) => Some(lit),
            Term::Iri(_) => None,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri(iri) => write!(f, "{}", iri),
            Term::Literal(lit) => write!(f, "{}", lit),
        }
    }
}

impl From<Iri> for Term {
    fn from(iri: Iri) -> Self {
        Term::Iri(iri)
    }
}

impl From<Literal> for Term {
    fn from(lit: Literal) -> Self {
        Term::Literal(lit)
    }
}

/// A subject-predicate-object statement
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Triple {
    /// Subject
    pub subject: Iri,
    /// Predicate
    pub predicate: Iri,
    /// Object
    pub object: Term,
}

impl Triple {
    /// Create a new triple
    pub fn new(subject: Iri, predicate: Iri, object: impl Into<Term>) -> Self {
        Self {
            subject,
            predicate,
            object: object.into(),
        }
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
    }
}

/// Triple pattern for queries; `None` positions are wildcards
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TriplePattern {
    /// Subject (None = any)
    pub subject: Option<Iri>,
    /// Predicate (None = any)
    pub predicate: Option<Iri>,
    /// Object (None = any)
    pub object: Option<Term>,
}

impl TriplePattern {
    /// Create a new pattern
    pub fn new(subject: Option<Iri>, predicate: Option<Iri>, object: Option<Term>) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }

    /// Check if a triple matches this pattern
    pub fn matches(&self, triple: &Triple) -> bool {
        if let Some(ref s) = self.subject {
            if s != &triple.subject {
                return false;
            }
        }
        if let Some(ref p) = self.predicate {
            if p != &triple.predicate {
                return false;
            }
        }
        if let Some(ref o) = self.object {
            if o != &triple.object {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iri() {
        let iri = Iri::new("http://example.org/alice").unwrap();
        assert_eq!(iri.as_str(), "http://example.org/alice");
        assert_eq!(iri.to_string(), "<http://example.org/alice>");
    }

    #[test]
    fn test_invalid_iri() {
        assert!(Iri::new("not an iri").is_err());
    }

    #[test]
    fn test_literal() {
        let lit = Literal::new_string("Alice");
        assert_eq!(lit.value(), "Alice");
        assert_eq!(
            lit.datatype().as_str(),
            "http://www.w3.org/2001/XMLSchema#string"
        );

        let lit = Literal::new_language_tagged("Alice", "en").unwrap();
        assert_eq!(lit.language(), Some("en"));
    }

    #[test]
    fn test_typed_literal() {
        let dt = Iri::new("http://www.w3.org/2001/XMLSchema#integer").unwrap();
        let lit = Literal::new_typed("42", dt.clone());
        assert_eq!(lit.value(), "42");
        assert_eq!(lit.datatype(), dt);
    }

    #[test]
    fn test_pattern_matching() {
        let subject = Iri::new("http://example.org/alice").unwrap();
        let predicate = Iri::new("http://example.org/schema/name").unwrap();
        let triple = Triple::new(subject.clone(), predicate, Literal::new_string("Alice"));

        let pattern = TriplePattern::new(Some(subject), None, None);
        assert!(pattern.matches(&triple));

        let other = Iri::new("http://example.org/bob").unwrap();
        let pattern = TriplePattern::new(Some(other), None, None);
        assert!(!pattern.matches(&triple));

        assert!(TriplePattern::default().matches(&triple));
    }
}
