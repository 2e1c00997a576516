//! SPARQL parsing via spargebra
//!
//! The algebra tree is reduced to a flat list of triple patterns plus the
//! projected variables. Anything that does not reduce to a basic graph
//! pattern is rejected.

use super::{SparqlError, SparqlResult};
use crate::rdf::{Iri, Literal};
use spargebra::algebra::GraphPattern;
use spargebra::term::{NamedNodePattern, TermPattern};
use spargebra::Query;

/// One position of a triple pattern
#[derive(Debug, Clone, PartialEq)]
pub enum PatternTerm {
    /// Unbound variable
    Variable(String),
    /// Constant IRI
    Iri(Iri),
    /// Constant literal
    Literal(Literal),
}

/// A subject-predicate-object pattern
#[derive(Debug, Clone, PartialEq)]
pub struct PatternTriple {
    pub subject: PatternTerm,
    pub predicate: PatternTerm,
    pub object: PatternTerm,
}

impl PatternTriple {
    /// Number of constant positions; used for join ordering
    pub(crate) fn bound_positions(&self) -> usize {
        [&self.subject, &self.predicate, &self.object]
            .iter()
            .filter(|t| !matches!(t, PatternTerm::Variable(_)))
            .count()
    }
}

/// A parsed SELECT query
#[derive(Debug, Clone)]
pub struct SelectQuery {
    /// Projected variable names, in declaration order
    pub variables: Vec<String>,
    /// Basic graph pattern
    pub patterns: Vec<PatternTriple>,
    /// Whether duplicate rows are removed
    pub distinct: bool,
}

/// Parse a SELECT query string
pub fn parse_select(query: &str) -> SparqlResult<SelectQuery> {
    let parsed =
        Query::parse(query, None).map_err(|e| SparqlError::Parse(e.to_string()))?;
    let Query::Select { pattern, .. } = parsed else {
        return Err(SparqlError::Unsupported(
            "only SELECT queries are supported".to_string(),
        ));
    };
    reduce_root(&pattern, false)
}

fn reduce_root(pattern: &GraphPattern, distinct: bool) -> SparqlResult<SelectQuery> {
    match pattern {
        GraphPattern::Distinct { inner } => reduce_root(inner, true),
        GraphPattern::Reduced { inner } => reduce_root(inner, distinct),
        GraphPattern::Project { inner, variables } => {
            let patterns = reduce_bgp(inner)?;
            Ok(SelectQuery {
                variables: variables.iter().map(|v| v.as_str().to_string()).collect(),
                patterns,
                distinct,
            })
        }
        other => {
            // SELECT * without an explicit projection
            let patterns = reduce_bgp(other)?;
            let mut variables = Vec::new();
            for pattern in &patterns {
                for term in [&pattern.subject, &pattern.predicate, &pattern.object] {
                    if let PatternTerm::Variable(name) = term {
                        if !variables.contains(name) {
                            variables.push(name.clone());
                        }
                    }
                }
            }
            Ok(SelectQuery {
                variables,
                patterns,
                distinct,
            })
        }
    }
}

fn reduce_bgp(pattern: &GraphPattern) -> SparqlResult<Vec<PatternTriple>> {
    match pattern {
        GraphPattern::Bgp { patterns } => patterns.iter().map(convert_pattern).collect(),
        GraphPattern::Join { left, right } => {
            let mut patterns = reduce_bgp(left)?;
            patterns.extend(reduce_bgp(right)?);
            Ok(patterns)
        }
        other => Err(SparqlError::Unsupported(feature_name(other).to_string())),
    }
}

fn feature_name(pattern: &GraphPattern) -> &'static str {
    match pattern {
        GraphPattern::Path { .. } => "property paths",
        GraphPattern::Filter { .. } => "FILTER",
        GraphPattern::Union { .. } => "UNION",
        GraphPattern::Graph { .. } => "GRAPH",
        GraphPattern::Extend { .. } => "BIND",
        GraphPattern::Minus { .. } => "MINUS",
        GraphPattern::Values { .. } => "VALUES",
        GraphPattern::OrderBy { .. } => "ORDER BY",
        GraphPattern::Group { .. } => "aggregation",
        GraphPattern::Service { .. } => "SERVICE",
        GraphPattern::Slice { .. } => "LIMIT/OFFSET",
        _ => "this graph pattern",
    }
}

fn convert_pattern(pattern: &spargebra::term::TriplePattern) -> SparqlResult<PatternTriple> {
    Ok(PatternTriple {
        subject: convert_term(&pattern.subject)?,
        predicate: convert_named(&pattern.predicate),
        object: convert_term(&pattern.object)?,
    })
}

fn convert_term(term: &TermPattern) -> SparqlResult<PatternTerm> {
    match term {
        TermPattern::Variable(v) => Ok(PatternTerm::Variable(v.as_str().to_string())),
        TermPattern::NamedNode(n) => Ok(PatternTerm::Iri(n.clone().into())),
        TermPattern::Literal(l) => Ok(PatternTerm::Literal(l.clone().into())),
        TermPattern::BlankNode(_) => Err(SparqlError::Unsupported(
            "blank nodes in patterns".to_string(),
        )),
        #[allow(unreachable_patterns)]
        _ => Err(SparqlError::Unsupported("embedded triples".to_string())),
    }
}

fn convert_named(pattern: &NamedNodePattern) -> PatternTerm {
    match pattern {
        NamedNodePattern::Variable(v) => PatternTerm::Variable(v.as_str().to_string()),
        NamedNodePattern::NamedNode(n) => PatternTerm::Iri(n.clone().into()),
    }
}
