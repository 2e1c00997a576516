//! SPARQL SELECT over basic graph patterns
//!
//! Queries are parsed with spargebra and evaluated directly against the
//! triple store by binding-propagating joins. Only the SELECT form over a
//! basic graph pattern (optionally DISTINCT) is supported; everything else
//! is reported as unsupported rather than silently misevaluated.

mod executor;
mod parser;
mod results;

pub use executor::evaluate;
pub use parser::{parse_select, PatternTerm, PatternTriple, SelectQuery};
pub use results::{Bindings, Row};

use crate::rdf::TripleStore;
use thiserror::Error;

/// Query errors
#[derive(Error, Debug)]
pub enum SparqlError {
    /// Syntax error
    #[error("SPARQL parse error: {0}")]
    Parse(String),

    /// Feature outside the supported SELECT-over-BGP subset
    #[error("unsupported SPARQL feature: {0}")]
    Unsupported(String),
}

pub type SparqlResult<T> = Result<T, SparqlError>;

/// Parse and evaluate a SELECT query, returning tabular bindings
pub fn select(store: &TripleStore, query: &str) -> SparqlResult<Bindings> {
    let parsed = parse_select(query)?;
    Ok(evaluate(store, &parsed))
}
