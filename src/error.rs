//! Store-level error type
//!
//! Module errors compose into [`StoreError`]; every failure is local to a
//! single commit or query call.

use crate::entity::{EntityError, IdError, SchemaError};
use crate::persistence::SnapshotError;
use crate::rdf::{ParseError, RdfError, SerializeError};
use crate::sparql::SparqlError;
use thiserror::Error;

/// Errors surfaced by store and session operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// A commit saw a stale version token; the session must be discarded
    /// and the work re-applied on fresh reads
    #[error("commit conflict on entity {id}: version token is stale")]
    Conflict { id: String },

    /// Dereferenced identifier is not in the store
    #[error("entity not found: {id}")]
    NotFound { id: String },

    #[error(transparent)]
    Entity(#[from] EntityError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Identifier(#[from] IdError),

    #[error(transparent)]
    Rdf(#[from] RdfError),

    #[error(transparent)]
    Serialize(#[from] SerializeError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Query(#[from] SparqlError),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

pub type StoreResult<T> = Result<T, StoreError>;
