//! Trestle
//!
//! An embedded entity-graph store. Typed entities are projected onto an
//! indexed RDF triple store through a schema declared at startup; sessions
//! batch mutations and commit them with optimistic version checks.
//!
//! # Architecture
//!
//! - [`rdf`] — triple primitives, the indexed triple store, namespace
//!   prefixes, and Turtle interchange
//! - [`entity`] — schema registry, property values, identifier generation,
//!   and the entity ↔ triple projection
//! - [`session`] — change tracking and optimistic commit
//! - [`sparql`] — SELECT queries over basic graph patterns
//! - [`persistence`] — connection descriptors and snapshot files
//!
//! # Example
//!
//! ```
//! use trestle::{Schema, Store, StoreConfig, TypeDef, ValueKind};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut schema = Schema::new();
//! schema.add_namespace("top", "http://example.org/topics/");
//! schema.register(
//!     TypeDef::new("Topic", "http://example.org/types/Topic", "http://example.org/topics/")?
//!         .required("name", "http://example.org/schema/topicName", ValueKind::String)?,
//! )?;
//!
//! let dir = tempfile::tempdir()?;
//! let store = Store::open(StoreConfig::new(dir.path(), "demo"), schema)?;
//!
//! let mut session = store.session();
//! let topic = session.create("Topic")?;
//! session.set(topic.id(), "name", "Knowledge Graphs")?;
//! session.commit()?;
//!
//! let loaded = store.get(topic.id())?;
//! assert_eq!(loaded.get("name").unwrap().as_str(), Some("Knowledge Graphs"));
//! # Ok(())
//! # }
//! ```

#![warn(clippy::all)]

pub mod entity;
pub mod error;
pub mod persistence;
pub mod query;
pub mod rdf;
pub mod session;
pub mod sparql;
pub mod store;

// Re-export main types for convenience
pub use entity::{
    Entity, EntityError, Schema, SchemaError, TypeDef, Value, ValueError, ValueKind,
};
pub use error::{StoreError, StoreResult};
pub use persistence::{SnapshotError, StoreConfig};
pub use query::EntityCursor;
pub use rdf::{Iri, Literal, Term, Triple, TriplePattern};
pub use session::{EntityState, Session};
pub use sparql::{Bindings, SparqlError};
pub use store::Store;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
