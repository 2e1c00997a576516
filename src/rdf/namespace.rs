//! Namespace prefix management
//!
//! Prefix table used for compact IRI notation in the Turtle export. The
//! `rdf` and `xsd` prefixes are always present; domain prefixes come from
//! the schema.

use std::collections::HashMap;
use thiserror::Error;

/// The rdf:type predicate IRI
pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

/// The rdf:type predicate as a parsed [`Iri`](super::types::Iri)
pub fn rdf_type_iri() -> super::types::Iri {
    super::types::Iri::new(RDF_TYPE).expect("rdf:type is a valid IRI")
}

/// Prefix errors
#[derive(Error, Debug)]
pub enum PrefixError {
    /// Unknown prefix
    #[error("unknown prefix: {0}")]
    UnknownPrefix(String),

    /// Not a compact IRI
    #[error("not a compact IRI: {0}")]
    NotCompact(String),
}

pub type PrefixResult<T> = Result<T, PrefixError>;

/// Prefix -> namespace IRI table
#[derive(Debug, Clone)]
pub struct NamespaceManager {
    prefixes: HashMap<String, String>,
}

impl NamespaceManager {
    /// Create a manager holding the fixed `rdf` and `xsd` prefixes
    pub fn new() -> Self {
        let mut mgr = Self {
            prefixes: HashMap::new(),
        };
        mgr.add_prefix("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#");
        mgr.add_prefix("xsd", "http://www.w3.org/2001/XMLSchema#");
        mgr
    }

    /// Register a prefix
    pub fn add_prefix(&mut self, prefix: impl Into<String>, iri: impl Into<String>) {
        self.prefixes.insert(prefix.into(), iri.into());
    }

    /// Get the namespace IRI for a prefix
    pub fn get_iri(&self, prefix: &str) -> PrefixResult<&str> {
        self.prefixes
            .get(prefix)
            .map(|s| s.as_str())
            .ok_or_else(|| PrefixError::UnknownPrefix(prefix.to_string()))
    }

    /// Expand a compact IRI (prefix:local) to its full form
    pub fn expand(&self, compact_iri: &str) -> PrefixResult<String> {
        let Some(pos) = compact_iri.find(':') else {
            return Err(PrefixError::NotCompact(compact_iri.to_string()));
        };
        let prefix = &compact_iri[..pos];
        let local = &compact_iri[pos + 1..];
        let iri = self.get_iri(prefix)?;
        Ok(format!("{}{}", iri, local))
    }

    /// Compact an IRI using the longest matching registered namespace
    pub fn compact(&self, iri: &str) -> Option<(String, String)> {
        let mut best: Option<(&str, &str)> = None;
        for (prefix, namespace_iri) in &self.prefixes {
            if iri.starts_with(namespace_iri.as_str()) {
                match best {
                    Some((_, current)) if current.len() >= namespace_iri.len() => {}
                    _ => best = Some((prefix, namespace_iri)),
                }
            }
        }
        best.map(|(prefix, namespace_iri)| {
            (
                prefix.to_string(),
                iri[namespace_iri.len()..].to_string(),
            )
        })
    }

    /// All registered (prefix, namespace IRI) pairs, sorted by prefix
    pub fn prefixes(&self) -> Vec<(String, String)> {
        let mut out: Vec<(String, String)> = self
            .prefixes
            .iter()
            .map(|(prefix, iri)| (prefix.clone(), iri.clone()))
            .collect();
        out.sort();
        out
    }
}

impl Default for NamespaceManager {
    fn default() -> Self {
        Self::new()
    }
}
